use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of notification kinds. Every kind maps to an email template
/// in mail::mails; kinds without a dedicated template fall back to the
/// generic one.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
pub enum NotificationKind {
    JobApproved,
    JobRejected,
    ProposalReceived,
    ProposalAccepted,
    ProposalRejected,
    ProposalWithdrawn,
    ContractCreated,
    ContractStatusChanged,
    ChangeRequestProposed,
    ChangeRequestApproved,
    ChangeRequestRejected,
    ReviewPending,
    ReviewReceived,
}

impl NotificationKind {
    pub fn to_str(&self) -> &'static str {
        match self {
            NotificationKind::JobApproved => "job_approved",
            NotificationKind::JobRejected => "job_rejected",
            NotificationKind::ProposalReceived => "proposal_received",
            NotificationKind::ProposalAccepted => "proposal_accepted",
            NotificationKind::ProposalRejected => "proposal_rejected",
            NotificationKind::ProposalWithdrawn => "proposal_withdrawn",
            NotificationKind::ContractCreated => "contract_created",
            NotificationKind::ContractStatusChanged => "contract_status_changed",
            NotificationKind::ChangeRequestProposed => "change_request_proposed",
            NotificationKind::ChangeRequestApproved => "change_request_approved",
            NotificationKind::ChangeRequestRejected => "change_request_rejected",
            NotificationKind::ReviewPending => "review_pending",
            NotificationKind::ReviewReceived => "review_received",
        }
    }

    /// Kinds that stay in-app only: the email worker marks them sent
    /// without dispatching anything.
    pub fn skips_email(&self) -> bool {
        matches!(
            self,
            NotificationKind::ProposalWithdrawn | NotificationKind::ReviewReceived
        )
    }

    /// Kinds that warrant immediate attention from the recipient.
    pub fn is_urgent(&self) -> bool {
        matches!(
            self,
            NotificationKind::JobRejected
                | NotificationKind::ChangeRequestProposed
                | NotificationKind::ChangeRequestApproved
                | NotificationKind::ChangeRequestRejected
        )
    }
}

/// Insert payload for the notification outbox.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_user_id: Uuid,
    pub sender_user_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub job_id: Option<Uuid>,
    pub proposal_id: Option<Uuid>,
    pub contract_id: Option<Uuid>,
    pub review_id: Option<Uuid>,
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_user_id: Uuid,
    pub sender_user_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub job_id: Option<Uuid>,
    pub proposal_id: Option<Uuid>,
    pub contract_id: Option<Uuid>,
    pub review_id: Option<Uuid>,
    pub data: Option<serde_json::Value>,
    pub is_read: Option<bool>,       // Database has DEFAULT FALSE, can be NULL
    pub is_urgent: Option<bool>,     // Database has DEFAULT FALSE, can be NULL
    pub is_email_sent: Option<bool>, // Database has DEFAULT FALSE, can be NULL
    pub email_attempts: Option<i32>, // Database has DEFAULT 0, can be NULL
    pub created_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [NotificationKind; 13] = [
        NotificationKind::JobApproved,
        NotificationKind::JobRejected,
        NotificationKind::ProposalReceived,
        NotificationKind::ProposalAccepted,
        NotificationKind::ProposalRejected,
        NotificationKind::ProposalWithdrawn,
        NotificationKind::ContractCreated,
        NotificationKind::ContractStatusChanged,
        NotificationKind::ChangeRequestProposed,
        NotificationKind::ChangeRequestApproved,
        NotificationKind::ChangeRequestRejected,
        NotificationKind::ReviewPending,
        NotificationKind::ReviewReceived,
    ];

    #[test]
    fn kind_strings_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for kind in ALL_KINDS {
            assert!(seen.insert(kind.to_str()), "duplicate: {}", kind.to_str());
        }
    }

    #[test]
    fn skip_list_is_in_app_only() {
        assert!(NotificationKind::ProposalWithdrawn.skips_email());
        assert!(NotificationKind::ReviewReceived.skips_email());
        assert!(!NotificationKind::JobRejected.skips_email());
        assert!(!NotificationKind::ChangeRequestProposed.skips_email());
    }
}
