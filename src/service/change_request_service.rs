// service/change_request_service.rs
use std::sync::Arc;

use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::{
    db::{contractdb::ContractExt, db::DBClient},
    dtos::contractdtos::{ProposeChangesDto, RespondChangeRequestDto},
    models::contractmodel::*,
    service::{
        error::ServiceError, notification_service::NotificationService,
        version_service::VersionService,
    },
};

/// Propose/approve/reject workflow over contract terms. A request is
/// raised by one contract party and resolved by the other; approval
/// promotes the proposed version through the version manager's
/// transactional path.
#[derive(Debug, Clone)]
pub struct ChangeRequestService {
    db_client: Arc<DBClient>,
    version_service: Arc<VersionService>,
    notification_service: Arc<NotificationService>,
}

impl ChangeRequestService {
    pub fn new(
        db_client: Arc<DBClient>,
        version_service: Arc<VersionService>,
        notification_service: Arc<NotificationService>,
    ) -> Self {
        Self {
            db_client,
            version_service,
            notification_service,
        }
    }

    pub async fn propose_change(
        &self,
        user_id: Uuid,
        contract_id: Uuid,
        dto: ProposeChangesDto,
    ) -> Result<ContractChangeRequest, ServiceError> {
        let contract = self
            .db_client
            .get_contract_by_id(contract_id)
            .await?
            .ok_or(ServiceError::ContractNotFound(contract_id))?;

        if !contract.is_party(user_id) {
            return Err(ServiceError::NotAContractParty(user_id, contract_id));
        }

        let status = contract.status.unwrap_or(ContractStatus::Pending);
        if !status.is_editable() {
            return Err(ServiceError::ContractNotEditable(contract_id, status));
        }

        if dto.payment_amount <= 0.0 {
            return Err(ServiceError::Validation(
                "Payment amount must be positive".to_string(),
            ));
        }
        let payment_amount = BigDecimal::try_from(dto.payment_amount)
            .map_err(|_| ServiceError::Validation("Payment amount is not representable".to_string()))?;

        if self
            .db_client
            .get_pending_request_for_contract(contract_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::PendingRequestExists(contract_id));
        }

        let from_version = self
            .version_service
            .get_current_version(contract_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Validation(format!(
                    "Contract {} has no current version to change",
                    contract_id
                ))
            })?;

        let next_number = self
            .version_service
            .get_next_version_number(contract_id)
            .await?;

        let proposed = self
            .db_client
            .create_proposed_version(
                contract_id,
                next_number,
                dto.title,
                dto.description,
                payment_amount,
                dto.payment_type,
                dto.deliverables,
                dto.terms,
                dto.additional_notes,
                user_id,
            )
            .await?;

        let request = self
            .db_client
            .create_change_request(
                contract_id,
                from_version.id,
                proposed.id,
                user_id,
                dto.change_reason,
            )
            .await?;

        self.notification_service
            .notify_change_request_proposed(&contract, &request)
            .await;

        Ok(request)
    }

    pub async fn respond(
        &self,
        user_id: Uuid,
        request_id: Uuid,
        dto: RespondChangeRequestDto,
    ) -> Result<ContractChangeRequest, ServiceError> {
        let request = self
            .db_client
            .get_change_request_by_id(request_id)
            .await?
            .ok_or(ServiceError::ChangeRequestNotFound(request_id))?;

        if request
            .status
            .unwrap_or(ChangeRequestStatus::Pending)
            .is_resolved()
        {
            return Err(ServiceError::ChangeRequestAlreadyResolved(request_id));
        }

        if request.requested_by_user_id == user_id {
            return Err(ServiceError::OwnChangeRequest(request_id));
        }

        let contract = self
            .db_client
            .get_contract_by_id(request.contract_id)
            .await?
            .ok_or(ServiceError::ContractNotFound(request.contract_id))?;

        if !contract.is_party(user_id) {
            return Err(ServiceError::NotAContractParty(user_id, contract.id));
        }

        let resolved = if dto.is_approved {
            // Resolution and version promotion commit together; a
            // concurrent responder gets None from the guarded update.
            self.db_client
                .approve_change_request(request_id, user_id, dto.response_notes)
                .await?
                .map(|(request, _version)| request)
        } else {
            self.db_client
                .reject_change_request(request_id, user_id, dto.response_notes)
                .await?
        };

        let resolved =
            resolved.ok_or(ServiceError::ChangeRequestAlreadyResolved(request_id))?;

        self.notification_service
            .notify_change_request_resolved(&contract, &resolved, dto.is_approved)
            .await;

        Ok(resolved)
    }

    pub async fn get_pending_for_contract(
        &self,
        user_id: Uuid,
        contract_id: Uuid,
    ) -> Result<Vec<ContractChangeRequest>, ServiceError> {
        let contract = self
            .db_client
            .get_contract_by_id(contract_id)
            .await?
            .ok_or(ServiceError::ContractNotFound(contract_id))?;

        if !contract.is_party(user_id) {
            return Err(ServiceError::NotAContractParty(user_id, contract_id));
        }

        let pending = self
            .db_client
            .get_pending_request_for_contract(contract_id)
            .await?;

        Ok(pending.into_iter().collect())
    }

    pub async fn get_history_for_contract(
        &self,
        user_id: Uuid,
        contract_id: Uuid,
    ) -> Result<Vec<ContractChangeRequest>, ServiceError> {
        let contract = self
            .db_client
            .get_contract_by_id(contract_id)
            .await?
            .ok_or(ServiceError::ContractNotFound(contract_id))?;

        if !contract.is_party(user_id) {
            return Err(ServiceError::NotAContractParty(user_id, contract_id));
        }

        Ok(self
            .db_client
            .get_change_requests_for_contract(contract_id)
            .await?)
    }

    /// Requests I raised awaiting response plus requests raised against me.
    pub async fn get_my_pending(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ContractChangeRequest>, ServiceError> {
        Ok(self.db_client.get_pending_requests_for_user(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::realtime::NotificationHub;
    use sqlx::postgres::PgPool;

    #[tokio::test]
    async fn change_request_service_compiles() {
        let pool = PgPool::connect_lazy("postgres://localhost/worknest").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let versions = Arc::new(VersionService::new(db_client.clone()));
        let hub = Arc::new(NotificationHub::new());
        let notifications = Arc::new(NotificationService::new(db_client.clone(), hub));
        let svc = ChangeRequestService::new(db_client, versions, notifications);

        let _ = svc.get_my_pending(Uuid::nil());
        let _ = svc.respond(
            Uuid::nil(),
            Uuid::nil(),
            RespondChangeRequestDto {
                is_approved: true,
                response_notes: None,
            },
        );
    }
}
