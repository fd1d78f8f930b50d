use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "contract_status", rename_all = "snake_case")]
pub enum ContractStatus {
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl ContractStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ContractStatus::Pending => "pending",
            ContractStatus::Active => "active",
            ContractStatus::Completed => "completed",
            ContractStatus::Cancelled => "cancelled",
        }
    }

    /// Allowed edges: Pending -> Active -> Completed, with Pending/Active
    /// -> Cancelled as the escape transition. Completed and Cancelled are
    /// terminal.
    pub fn can_transition_to(&self, next: ContractStatus) -> bool {
        matches!(
            (self, next),
            (ContractStatus::Pending, ContractStatus::Active)
                | (ContractStatus::Active, ContractStatus::Completed)
                | (ContractStatus::Pending, ContractStatus::Cancelled)
                | (ContractStatus::Active, ContractStatus::Cancelled)
        )
    }

    /// Contract terms can only be renegotiated while the contract is live.
    pub fn is_editable(&self) -> bool {
        matches!(self, ContractStatus::Pending | ContractStatus::Active)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "payment_type", rename_all = "snake_case")]
pub enum PaymentType {
    Fixed,
    Hourly,
}

impl PaymentType {
    pub fn to_str(&self) -> &str {
        match self {
            PaymentType::Fixed => "fixed",
            PaymentType::Hourly => "hourly",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "change_request_status", rename_all = "snake_case")]
pub enum ChangeRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl ChangeRequestStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ChangeRequestStatus::Pending => "pending",
            ChangeRequestStatus::Approved => "approved",
            ChangeRequestStatus::Rejected => "rejected",
        }
    }

    /// Approved and Rejected are terminal.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, ChangeRequestStatus::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contract {
    pub id: Uuid,
    pub job_id: Uuid,
    pub proposal_id: Uuid,
    pub client_id: Uuid,
    pub freelancer_id: Uuid,
    pub status: Option<ContractStatus>, // Database has DEFAULT 'pending', can be NULL
    pub payment_amount: BigDecimal,
    pub completion_requested_at: Option<DateTime<Utc>>,
    pub completion_requested_by: Option<Uuid>,
    pub is_active: Option<bool>, // soft-delete flag, DEFAULT TRUE
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Contract {
    pub fn is_party(&self, user_id: Uuid) -> bool {
        self.client_id == user_id || self.freelancer_id == user_id
    }

    /// The other side of the contract relative to `user_id`.
    pub fn counterparty(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.client_id {
            Some(self.freelancer_id)
        } else if user_id == self.freelancer_id {
            Some(self.client_id)
        } else {
            None
        }
    }
}

/// Immutable snapshot of contract terms. Exactly one version per contract
/// carries is_current_version = true; the schema backs this with a partial
/// unique index.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContractVersion {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub version_number: i32,
    pub title: String,
    pub description: String,
    pub payment_amount: BigDecimal,
    pub payment_type: PaymentType,
    pub deliverables: String,
    pub terms: String,
    pub additional_notes: Option<String>,
    pub is_current_version: bool,
    pub created_by: Uuid,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContractChangeRequest {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub from_version_id: Uuid,
    pub proposed_version_id: Uuid,
    pub status: Option<ChangeRequestStatus>, // Database has DEFAULT 'pending', can be NULL
    pub requested_by_user_id: Uuid,
    pub response_by_user_id: Option<Uuid>,
    pub change_reason: String,
    pub response_notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_status_edges() {
        assert!(ContractStatus::Pending.can_transition_to(ContractStatus::Active));
        assert!(ContractStatus::Active.can_transition_to(ContractStatus::Completed));
        assert!(ContractStatus::Pending.can_transition_to(ContractStatus::Cancelled));
        assert!(ContractStatus::Active.can_transition_to(ContractStatus::Cancelled));
    }

    #[test]
    fn forbidden_status_edges() {
        assert!(!ContractStatus::Pending.can_transition_to(ContractStatus::Completed));
        assert!(!ContractStatus::Completed.can_transition_to(ContractStatus::Active));
        assert!(!ContractStatus::Completed.can_transition_to(ContractStatus::Cancelled));
        assert!(!ContractStatus::Cancelled.can_transition_to(ContractStatus::Active));
        assert!(!ContractStatus::Cancelled.can_transition_to(ContractStatus::Pending));
        assert!(!ContractStatus::Active.can_transition_to(ContractStatus::Active));
    }

    #[test]
    fn editable_only_while_live() {
        assert!(ContractStatus::Pending.is_editable());
        assert!(ContractStatus::Active.is_editable());
        assert!(!ContractStatus::Completed.is_editable());
        assert!(!ContractStatus::Cancelled.is_editable());
    }

    #[test]
    fn resolved_requests_are_terminal() {
        assert!(!ChangeRequestStatus::Pending.is_resolved());
        assert!(ChangeRequestStatus::Approved.is_resolved());
        assert!(ChangeRequestStatus::Rejected.is_resolved());
    }

    #[test]
    fn enum_strings_match_db_enums() {
        assert_eq!(ContractStatus::Pending.to_str(), "pending");
        assert_eq!(PaymentType::Fixed.to_str(), "fixed");
        assert_eq!(PaymentType::Hourly.to_str(), "hourly");
        assert_eq!(ChangeRequestStatus::Approved.to_str(), "approved");
    }

    #[test]
    fn counterparty_resolution() {
        let client = Uuid::new_v4();
        let freelancer = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let contract = Contract {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            proposal_id: Uuid::new_v4(),
            client_id: client,
            freelancer_id: freelancer,
            status: Some(ContractStatus::Active),
            payment_amount: BigDecimal::from(500),
            completion_requested_at: None,
            completion_requested_by: None,
            is_active: Some(true),
            created_at: None,
            updated_at: None,
        };

        assert!(contract.is_party(client));
        assert!(contract.is_party(freelancer));
        assert!(!contract.is_party(stranger));
        assert_eq!(contract.counterparty(client), Some(freelancer));
        assert_eq!(contract.counterparty(freelancer), Some(client));
        assert_eq!(contract.counterparty(stranger), None);
    }
}
