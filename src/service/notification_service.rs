// service/notification_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{db::DBClient, notificationdb::NotificationExt},
    models::{
        contractmodel::{Contract, ContractChangeRequest, ContractStatus},
        jobmodel::{Job, Proposal},
        notificationmodel::*,
        reviewmodel::Review,
    },
    service::realtime::{NotificationEvent, NotificationHub},
};

/// Central fan-out point for user-facing events. Persists the
/// notification row (the durable outbox intent) and pushes a realtime
/// event; email is drained later by the background worker. Failures are
/// logged and swallowed here: a failed side effect never rolls back or
/// fails the primary operation.
#[derive(Debug, Clone)]
pub struct NotificationService {
    db_client: Arc<DBClient>,
    hub: Arc<NotificationHub>,
}

impl NotificationService {
    pub fn new(db_client: Arc<DBClient>, hub: Arc<NotificationHub>) -> Self {
        Self { db_client, hub }
    }

    async fn dispatch(&self, new: NewNotification) {
        let recipient = new.recipient_user_id;
        let kind = new.kind;

        match self.db_client.insert_notification(new).await {
            Ok(notification) => {
                self.hub
                    .publish(recipient, NotificationEvent::from(&notification))
                    .await;
            }
            Err(e) => {
                tracing::error!(
                    "Failed to store {} notification for user {}: {}",
                    kind.to_str(),
                    recipient,
                    e
                );
            }
        }
    }

    pub async fn notify_job_approved(&self, job: &Job, admin_id: Uuid) {
        self.dispatch(NewNotification {
            recipient_user_id: job.client_id,
            sender_user_id: Some(admin_id),
            kind: NotificationKind::JobApproved,
            title: "Job approved".to_string(),
            message: format!("Your job \"{}\" is now open for proposals", job.title),
            job_id: Some(job.id),
            proposal_id: None,
            contract_id: None,
            review_id: None,
            data: None,
        })
        .await
    }

    pub async fn notify_job_rejected(&self, job: &Job, admin_id: Uuid, reason: &str) {
        self.dispatch(NewNotification {
            recipient_user_id: job.client_id,
            sender_user_id: Some(admin_id),
            kind: NotificationKind::JobRejected,
            title: "Job rejected".to_string(),
            message: format!("Your job \"{}\" was rejected: {}", job.title, reason),
            job_id: Some(job.id),
            proposal_id: None,
            contract_id: None,
            review_id: None,
            data: Some(serde_json::json!({ "reason": reason })),
        })
        .await
    }

    pub async fn notify_proposal_received(
        &self,
        job: &Job,
        proposal: &Proposal,
        freelancer_name: &str,
    ) {
        self.dispatch(NewNotification {
            recipient_user_id: job.client_id,
            sender_user_id: Some(proposal.freelancer_id),
            kind: NotificationKind::ProposalReceived,
            title: "New proposal received".to_string(),
            message: format!(
                "{} submitted a proposal for your job \"{}\"",
                freelancer_name, job.title
            ),
            job_id: Some(job.id),
            proposal_id: Some(proposal.id),
            contract_id: None,
            review_id: None,
            data: Some(serde_json::json!({
                "proposed_amount": proposal.proposed_amount.to_string(),
                "estimated_days": proposal.estimated_days,
            })),
        })
        .await
    }

    pub async fn notify_proposal_accepted(&self, job: &Job, proposal: &Proposal) {
        self.dispatch(NewNotification {
            recipient_user_id: proposal.freelancer_id,
            sender_user_id: Some(job.client_id),
            kind: NotificationKind::ProposalAccepted,
            title: "Proposal accepted".to_string(),
            message: format!("Your proposal for \"{}\" was accepted", job.title),
            job_id: Some(job.id),
            proposal_id: Some(proposal.id),
            contract_id: None,
            review_id: None,
            data: None,
        })
        .await
    }

    pub async fn notify_proposal_rejected(&self, job: &Job, proposal: &Proposal) {
        self.dispatch(NewNotification {
            recipient_user_id: proposal.freelancer_id,
            sender_user_id: Some(job.client_id),
            kind: NotificationKind::ProposalRejected,
            title: "Proposal rejected".to_string(),
            message: format!("Your proposal for \"{}\" was not selected", job.title),
            job_id: Some(job.id),
            proposal_id: Some(proposal.id),
            contract_id: None,
            review_id: None,
            data: None,
        })
        .await
    }

    pub async fn notify_proposal_withdrawn(&self, job: &Job, proposal: &Proposal) {
        self.dispatch(NewNotification {
            recipient_user_id: job.client_id,
            sender_user_id: Some(proposal.freelancer_id),
            kind: NotificationKind::ProposalWithdrawn,
            title: "Proposal withdrawn".to_string(),
            message: format!("A proposal for your job \"{}\" was withdrawn", job.title),
            job_id: Some(job.id),
            proposal_id: Some(proposal.id),
            contract_id: None,
            review_id: None,
            data: None,
        })
        .await
    }

    /// Both parties get a contract-created notification.
    pub async fn notify_contract_created(&self, contract: &Contract, job: &Job) {
        for recipient in [contract.client_id, contract.freelancer_id] {
            self.dispatch(NewNotification {
                recipient_user_id: recipient,
                sender_user_id: None,
                kind: NotificationKind::ContractCreated,
                title: "Contract created".to_string(),
                message: format!("A contract for \"{}\" has been created", job.title),
                job_id: Some(job.id),
                proposal_id: Some(contract.proposal_id),
                contract_id: Some(contract.id),
                review_id: None,
                data: None,
            })
            .await;
        }
    }

    /// The counterparty of whoever changed the status gets notified.
    pub async fn notify_contract_status_changed(
        &self,
        contract: &Contract,
        status: ContractStatus,
        changed_by: Uuid,
        notes: Option<&str>,
    ) {
        let Some(recipient) = contract.counterparty(changed_by) else {
            return;
        };

        let message = match notes {
            Some(notes) if !notes.is_empty() => {
                format!("Your contract is now {}: {}", status.to_str(), notes)
            }
            _ => format!("Your contract is now {}", status.to_str()),
        };

        self.dispatch(NewNotification {
            recipient_user_id: recipient,
            sender_user_id: Some(changed_by),
            kind: NotificationKind::ContractStatusChanged,
            title: "Contract status updated".to_string(),
            message,
            job_id: Some(contract.job_id),
            proposal_id: None,
            contract_id: Some(contract.id),
            review_id: None,
            data: Some(serde_json::json!({ "status": status.to_str(), "notes": notes })),
        })
        .await
    }

    pub async fn notify_change_request_proposed(
        &self,
        contract: &Contract,
        request: &ContractChangeRequest,
    ) {
        let Some(recipient) = contract.counterparty(request.requested_by_user_id) else {
            return;
        };

        self.dispatch(NewNotification {
            recipient_user_id: recipient,
            sender_user_id: Some(request.requested_by_user_id),
            kind: NotificationKind::ChangeRequestProposed,
            title: "Contract change proposed".to_string(),
            message: format!(
                "The other party proposed changes to your contract: {}",
                request.change_reason
            ),
            job_id: Some(contract.job_id),
            proposal_id: None,
            contract_id: Some(contract.id),
            review_id: None,
            data: Some(serde_json::json!({
                "change_request_id": request.id,
                "reason": request.change_reason,
            })),
        })
        .await
    }

    /// The requester learns the outcome of their change request.
    pub async fn notify_change_request_resolved(
        &self,
        contract: &Contract,
        request: &ContractChangeRequest,
        approved: bool,
    ) {
        let kind = if approved {
            NotificationKind::ChangeRequestApproved
        } else {
            NotificationKind::ChangeRequestRejected
        };
        let outcome = if approved { "approved" } else { "rejected" };

        self.dispatch(NewNotification {
            recipient_user_id: request.requested_by_user_id,
            sender_user_id: request.response_by_user_id,
            kind,
            title: format!("Change request {}", outcome),
            message: format!("Your contract change request was {}", outcome),
            job_id: Some(contract.job_id),
            proposal_id: None,
            contract_id: Some(contract.id),
            review_id: None,
            data: Some(serde_json::json!({
                "change_request_id": request.id,
                "response_notes": request.response_notes,
            })),
        })
        .await
    }

    /// Completion makes both parties review-eligible.
    pub async fn notify_review_pending(&self, contract: &Contract) {
        for recipient in [contract.client_id, contract.freelancer_id] {
            self.dispatch(NewNotification {
                recipient_user_id: recipient,
                sender_user_id: None,
                kind: NotificationKind::ReviewPending,
                title: "Leave a review".to_string(),
                message: "Your contract is complete. Share how the collaboration went."
                    .to_string(),
                job_id: Some(contract.job_id),
                proposal_id: None,
                contract_id: Some(contract.id),
                review_id: None,
                data: None,
            })
            .await;
        }
    }

    pub async fn notify_review_received(&self, review: &Review) {
        self.dispatch(NewNotification {
            recipient_user_id: review.reviewee_id,
            sender_user_id: Some(review.reviewer_id),
            kind: NotificationKind::ReviewReceived,
            title: "New review received".to_string(),
            message: format!("You received a {}-star review", review.rating),
            job_id: Some(review.job_id),
            proposal_id: None,
            contract_id: Some(review.contract_id),
            review_id: Some(review.id),
            data: None,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPool;

    #[tokio::test]
    async fn notification_service_compiles() {
        let pool = PgPool::connect_lazy("postgres://localhost/worknest").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let hub = Arc::new(NotificationHub::new());
        let svc = NotificationService::new(db_client, hub);

        let review = Review {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            contract_id: Uuid::new_v4(),
            reviewer_id: Uuid::new_v4(),
            reviewee_id: Uuid::new_v4(),
            rating: 5,
            communication_rating: None,
            quality_rating: None,
            timeliness_rating: None,
            comment: "great".to_string(),
            created_at: None,
        };
        let _ = svc.notify_review_received(&review);
    }
}
