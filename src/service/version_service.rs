// service/version_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{contractdb::ContractExt, db::DBClient},
    models::contractmodel::ContractVersion,
    service::error::ServiceError,
};

/// Owner of the "exactly one current version per contract" invariant.
/// Promotion demotes every version and promotes the target inside one
/// database transaction; the partial unique index on contract_versions
/// backs the invariant at the schema level.
#[derive(Debug, Clone)]
pub struct VersionService {
    db_client: Arc<DBClient>,
}

impl VersionService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// The active version of a contract. Every contract that has versions
    /// is expected to have exactly one; callers must still handle None
    /// for contracts created before their first version committed.
    pub async fn get_current_version(
        &self,
        contract_id: Uuid,
    ) -> Result<Option<ContractVersion>, ServiceError> {
        Ok(self.db_client.get_current_version(contract_id).await?)
    }

    /// max(version_number) + 1, or 1 for a contract with no versions.
    pub async fn get_next_version_number(&self, contract_id: Uuid) -> Result<i32, ServiceError> {
        Ok(self.db_client.get_next_version_number(contract_id).await?)
    }

    pub async fn get_version(&self, version_id: Uuid) -> Result<ContractVersion, ServiceError> {
        self.db_client
            .get_version_by_id(version_id)
            .await?
            .ok_or(ServiceError::VersionNotFound(version_id))
    }

    /// Makes `version_id` the current version of `contract_id`. The
    /// version must belong to the contract.
    pub async fn promote_version(
        &self,
        contract_id: Uuid,
        version_id: Uuid,
    ) -> Result<ContractVersion, ServiceError> {
        let version = self.get_version(version_id).await?;
        if version.contract_id != contract_id {
            return Err(ServiceError::VersionNotFound(version_id));
        }

        Ok(self.db_client.promote_version(contract_id, version_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPool;

    #[tokio::test]
    async fn version_service_compiles() {
        let pool = PgPool::connect_lazy("postgres://localhost/worknest").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let svc = VersionService::new(db_client);

        let _ = svc.get_current_version(Uuid::nil());
        let _ = svc.get_next_version_number(Uuid::nil());
        let _ = svc.promote_version(Uuid::nil(), Uuid::nil());
    }
}
