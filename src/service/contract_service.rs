// service/contract_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{contractdb::ContractExt, db::DBClient, jobdb::JobExt},
    dtos::contractdtos::{AcceptProposalDto, ContractDetailsDto, ContractHistoryDto},
    models::{
        contractmodel::*,
        jobmodel::{JobStatus, ProposalStatus},
    },
    service::{error::ServiceError, notification_service::NotificationService},
};

const DEFAULT_TERMS: &str = "Standard work agreement terms";

/// Contract lifecycle: creation from an accepted proposal and the
/// status state machine with its side effects.
#[derive(Debug, Clone)]
pub struct ContractService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl ContractService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    /// Accepting a proposal: the proposal flips to accepted, siblings are
    /// rejected, the job moves to in_progress and the contract is created
    /// with version 1 as its current version, all in one transaction.
    /// Notifications go out after the commit.
    pub async fn accept_proposal(
        &self,
        client_id: Uuid,
        proposal_id: Uuid,
        dto: AcceptProposalDto,
    ) -> Result<Contract, ServiceError> {
        let proposal = self
            .db_client
            .get_proposal_by_id(proposal_id)
            .await?
            .ok_or(ServiceError::ProposalNotFound(proposal_id))?;

        let job = self
            .db_client
            .get_job_by_id(proposal.job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(proposal.job_id))?;

        if job.client_id != client_id {
            return Err(ServiceError::UnauthorizedJobAccess(client_id, job.id));
        }

        let job_status = job.status.unwrap_or(JobStatus::PendingApproval);
        if job_status != JobStatus::Open {
            return Err(ServiceError::InvalidJobStatus(job.id, job_status, JobStatus::Open));
        }

        if !proposal.status.unwrap_or(ProposalStatus::Submitted).is_open() {
            return Err(ServiceError::Validation(
                "Proposal has already been resolved".to_string(),
            ));
        }

        let rejected_siblings: Vec<_> = self
            .db_client
            .get_proposals_for_job(job.id)
            .await?
            .into_iter()
            .filter(|p| p.id != proposal.id && p.status == Some(ProposalStatus::Submitted))
            .collect();

        let (contract, _initial_version) = self
            .db_client
            .create_contract_from_proposal(
                &job,
                &proposal,
                job.title.clone(),
                job.description.clone(),
                dto.payment_type.unwrap_or(PaymentType::Fixed),
                dto.deliverables.unwrap_or_else(|| job.description.clone()),
                dto.terms.unwrap_or_else(|| DEFAULT_TERMS.to_string()),
            )
            .await?;

        self.notification_service
            .notify_proposal_accepted(&job, &proposal)
            .await;
        for sibling in &rejected_siblings {
            self.notification_service
                .notify_proposal_rejected(&job, sibling)
                .await;
        }
        self.notification_service
            .notify_contract_created(&contract, &job)
            .await;

        Ok(contract)
    }

    pub async fn get_contract(
        &self,
        user_id: Uuid,
        contract_id: Uuid,
    ) -> Result<ContractDetailsDto, ServiceError> {
        let contract = self
            .db_client
            .get_contract_by_id(contract_id)
            .await?
            .ok_or(ServiceError::ContractNotFound(contract_id))?;

        if !contract.is_party(user_id) {
            return Err(ServiceError::NotAContractParty(user_id, contract_id));
        }

        let current_version = self.db_client.get_current_version(contract_id).await?;

        Ok(ContractDetailsDto {
            contract,
            current_version,
        })
    }

    pub async fn get_contracts_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contract>, ServiceError> {
        Ok(self
            .db_client
            .get_contracts_for_user(user_id, limit, offset)
            .await?)
    }

    /// Full version and change-request history of a contract.
    pub async fn get_history(
        &self,
        user_id: Uuid,
        contract_id: Uuid,
    ) -> Result<ContractHistoryDto, ServiceError> {
        let contract = self
            .db_client
            .get_contract_by_id(contract_id)
            .await?
            .ok_or(ServiceError::ContractNotFound(contract_id))?;

        if !contract.is_party(user_id) {
            return Err(ServiceError::NotAContractParty(user_id, contract_id));
        }

        let versions = self.db_client.get_versions_for_contract(contract_id).await?;
        let change_requests = self
            .db_client
            .get_change_requests_for_contract(contract_id)
            .await?;

        Ok(ContractHistoryDto {
            contract,
            versions,
            change_requests,
        })
    }

    /// Validates the requested transition against the state machine and
    /// persists it. Completion marks the underlying job completed and
    /// makes both parties review-eligible; cancellation leaves any
    /// existing reviews untouched.
    pub async fn update_status(
        &self,
        user_id: Uuid,
        contract_id: Uuid,
        new_status: ContractStatus,
        notes: Option<String>,
    ) -> Result<Contract, ServiceError> {
        let contract = self
            .db_client
            .get_contract_by_id(contract_id)
            .await?
            .ok_or(ServiceError::ContractNotFound(contract_id))?;

        if !contract.is_party(user_id) {
            return Err(ServiceError::NotAContractParty(user_id, contract_id));
        }

        let current = contract.status.unwrap_or(ContractStatus::Pending);
        if !current.can_transition_to(new_status) {
            return Err(ServiceError::InvalidStatusTransition(current, new_status));
        }

        if new_status == ContractStatus::Completed {
            self.db_client
                .mark_completion_requested(contract_id, user_id)
                .await?;
        }

        let updated = self
            .db_client
            .update_contract_status(contract_id, new_status)
            .await?;

        match new_status {
            ContractStatus::Completed => {
                self.db_client
                    .update_job_status(contract.job_id, JobStatus::Completed)
                    .await?;

                self.notification_service
                    .notify_contract_status_changed(&updated, new_status, user_id, notes.as_deref())
                    .await;
                self.notification_service.notify_review_pending(&updated).await;
            }
            ContractStatus::Cancelled => {
                self.db_client
                    .update_job_status(contract.job_id, JobStatus::Cancelled)
                    .await?;

                self.notification_service
                    .notify_contract_status_changed(&updated, new_status, user_id, notes.as_deref())
                    .await;
            }
            _ => {
                self.notification_service
                    .notify_contract_status_changed(&updated, new_status, user_id, notes.as_deref())
                    .await;
            }
        }

        Ok(updated)
    }

    pub async fn start_contract(
        &self,
        user_id: Uuid,
        contract_id: Uuid,
    ) -> Result<Contract, ServiceError> {
        self.update_status(user_id, contract_id, ContractStatus::Active, None)
            .await
    }

    pub async fn complete_contract(
        &self,
        user_id: Uuid,
        contract_id: Uuid,
    ) -> Result<Contract, ServiceError> {
        self.update_status(user_id, contract_id, ContractStatus::Completed, None)
            .await
    }

    pub async fn cancel_contract(
        &self,
        user_id: Uuid,
        contract_id: Uuid,
    ) -> Result<Contract, ServiceError> {
        self.update_status(user_id, contract_id, ContractStatus::Cancelled, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::realtime::NotificationHub;
    use sqlx::postgres::PgPool;

    #[tokio::test]
    async fn contract_service_compiles() {
        let pool = PgPool::connect_lazy("postgres://localhost/worknest").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let hub = Arc::new(NotificationHub::new());
        let notifications = Arc::new(NotificationService::new(db_client.clone(), hub));
        let svc = ContractService::new(db_client, notifications);

        let _ = svc.start_contract(Uuid::nil(), Uuid::nil());
        let _ = svc.complete_contract(Uuid::nil(), Uuid::nil());
        let _ = svc.cancel_contract(Uuid::nil(), Uuid::nil());
    }
}
