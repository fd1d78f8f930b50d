// db/contractdb.rs
use async_trait::async_trait;
use sqlx::types::BigDecimal;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::contractmodel::*;
use crate::models::jobmodel::{Job, JobStatus, Proposal, ProposalStatus};

const CONTRACT_COLUMNS: &str = r#"
    id, job_id, proposal_id, client_id, freelancer_id, status,
    payment_amount, completion_requested_at, completion_requested_by,
    is_active, created_at, updated_at
"#;

const VERSION_COLUMNS: &str = r#"
    id, contract_id, version_number, title, description, payment_amount,
    payment_type, deliverables, terms, additional_notes,
    is_current_version, created_by, created_at
"#;

const REQUEST_COLUMNS: &str = r#"
    id, contract_id, from_version_id, proposed_version_id, status,
    requested_by_user_id, response_by_user_id, change_reason,
    response_notes, created_at, responded_at
"#;

#[async_trait]
pub trait ContractExt {
    /// Accepting a proposal is one transaction: the proposal flips to
    /// accepted, sibling proposals are rejected, the job moves to
    /// in_progress, and the contract is created together with version 1
    /// as its current version.
    #[allow(clippy::too_many_arguments)]
    async fn create_contract_from_proposal(
        &self,
        job: &Job,
        proposal: &Proposal,
        title: String,
        description: String,
        payment_type: PaymentType,
        deliverables: String,
        terms: String,
    ) -> Result<(Contract, ContractVersion), Error>;

    async fn get_contract_by_id(&self, contract_id: Uuid) -> Result<Option<Contract>, Error>;

    async fn get_contract_by_job_id(&self, job_id: Uuid) -> Result<Option<Contract>, Error>;

    async fn get_contracts_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contract>, Error>;

    async fn update_contract_status(
        &self,
        contract_id: Uuid,
        status: ContractStatus,
    ) -> Result<Contract, Error>;

    async fn mark_completion_requested(
        &self,
        contract_id: Uuid,
        requested_by: Uuid,
    ) -> Result<Contract, Error>;

    // Version management
    async fn get_current_version(
        &self,
        contract_id: Uuid,
    ) -> Result<Option<ContractVersion>, Error>;

    async fn get_next_version_number(&self, contract_id: Uuid) -> Result<i32, Error>;

    async fn get_version_by_id(&self, version_id: Uuid) -> Result<Option<ContractVersion>, Error>;

    async fn get_versions_for_contract(
        &self,
        contract_id: Uuid,
    ) -> Result<Vec<ContractVersion>, Error>;

    /// Inserts a non-current version snapshot (a proposed set of terms).
    #[allow(clippy::too_many_arguments)]
    async fn create_proposed_version(
        &self,
        contract_id: Uuid,
        version_number: i32,
        title: String,
        description: String,
        payment_amount: BigDecimal,
        payment_type: PaymentType,
        deliverables: String,
        terms: String,
        additional_notes: Option<String>,
        created_by: Uuid,
    ) -> Result<ContractVersion, Error>;

    /// Demotes every version of the contract and promotes the target, in
    /// a single transaction. The partial unique index on
    /// (contract_id) WHERE is_current_version makes a second concurrent
    /// promote fail rather than produce two current versions.
    async fn promote_version(
        &self,
        contract_id: Uuid,
        version_id: Uuid,
    ) -> Result<ContractVersion, Error>;

    // Change requests
    async fn create_change_request(
        &self,
        contract_id: Uuid,
        from_version_id: Uuid,
        proposed_version_id: Uuid,
        requested_by_user_id: Uuid,
        change_reason: String,
    ) -> Result<ContractChangeRequest, Error>;

    async fn get_change_request_by_id(
        &self,
        request_id: Uuid,
    ) -> Result<Option<ContractChangeRequest>, Error>;

    /// Approval resolves the request and promotes its proposed version in
    /// one transaction. Returns None when the request was already
    /// resolved (the guarded UPDATE matched no row).
    async fn approve_change_request(
        &self,
        request_id: Uuid,
        response_by_user_id: Uuid,
        response_notes: Option<String>,
    ) -> Result<Option<(ContractChangeRequest, ContractVersion)>, Error>;

    /// Rejection resolves the request without touching versions. Returns
    /// None when the request was already resolved.
    async fn reject_change_request(
        &self,
        request_id: Uuid,
        response_by_user_id: Uuid,
        response_notes: Option<String>,
    ) -> Result<Option<ContractChangeRequest>, Error>;

    async fn get_pending_request_for_contract(
        &self,
        contract_id: Uuid,
    ) -> Result<Option<ContractChangeRequest>, Error>;

    async fn get_change_requests_for_contract(
        &self,
        contract_id: Uuid,
    ) -> Result<Vec<ContractChangeRequest>, Error>;

    /// Pending requests on any contract the user is a party of: requests
    /// they raised awaiting response plus requests raised against them.
    async fn get_pending_requests_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ContractChangeRequest>, Error>;
}

#[async_trait]
impl ContractExt for DBClient {
    async fn create_contract_from_proposal(
        &self,
        job: &Job,
        proposal: &Proposal,
        title: String,
        description: String,
        payment_type: PaymentType,
        deliverables: String,
        terms: String,
    ) -> Result<(Contract, ContractVersion), Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE proposals SET status = $2 WHERE id = $1
            "#,
        )
        .bind(proposal.id)
        .bind(ProposalStatus::Accepted)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE proposals
            SET status = $3
            WHERE job_id = $1 AND id != $2 AND status = 'submitted'
            "#,
        )
        .bind(job.id)
        .bind(proposal.id)
        .bind(ProposalStatus::Rejected)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE jobs SET status = $2, updated_at = NOW() WHERE id = $1
            "#,
        )
        .bind(job.id)
        .bind(JobStatus::InProgress)
        .execute(&mut *tx)
        .await?;

        let contract = sqlx::query_as::<_, Contract>(&format!(
            r#"
            INSERT INTO contracts (job_id, proposal_id, client_id, freelancer_id, payment_amount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CONTRACT_COLUMNS}
            "#
        ))
        .bind(job.id)
        .bind(proposal.id)
        .bind(job.client_id)
        .bind(proposal.freelancer_id)
        .bind(proposal.proposed_amount.clone())
        .fetch_one(&mut *tx)
        .await?;

        let version = sqlx::query_as::<_, ContractVersion>(&format!(
            r#"
            INSERT INTO contract_versions
                (contract_id, version_number, title, description, payment_amount,
                 payment_type, deliverables, terms, is_current_version, created_by)
            VALUES ($1, 1, $2, $3, $4, $5, $6, $7, TRUE, $8)
            RETURNING {VERSION_COLUMNS}
            "#
        ))
        .bind(contract.id)
        .bind(title)
        .bind(description)
        .bind(proposal.proposed_amount.clone())
        .bind(payment_type)
        .bind(deliverables)
        .bind(terms)
        .bind(job.client_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((contract, version))
    }

    async fn get_contract_by_id(&self, contract_id: Uuid) -> Result<Option<Contract>, Error> {
        sqlx::query_as::<_, Contract>(&format!(
            r#"
            SELECT {CONTRACT_COLUMNS}
            FROM contracts
            WHERE id = $1 AND is_active = TRUE
            "#
        ))
        .bind(contract_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_contract_by_job_id(&self, job_id: Uuid) -> Result<Option<Contract>, Error> {
        sqlx::query_as::<_, Contract>(&format!(
            r#"
            SELECT {CONTRACT_COLUMNS}
            FROM contracts
            WHERE job_id = $1 AND is_active = TRUE
            "#
        ))
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_contracts_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contract>, Error> {
        sqlx::query_as::<_, Contract>(&format!(
            r#"
            SELECT {CONTRACT_COLUMNS}
            FROM contracts
            WHERE (client_id = $1 OR freelancer_id = $1) AND is_active = TRUE
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_contract_status(
        &self,
        contract_id: Uuid,
        status: ContractStatus,
    ) -> Result<Contract, Error> {
        sqlx::query_as::<_, Contract>(&format!(
            r#"
            UPDATE contracts
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {CONTRACT_COLUMNS}
            "#
        ))
        .bind(contract_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn mark_completion_requested(
        &self,
        contract_id: Uuid,
        requested_by: Uuid,
    ) -> Result<Contract, Error> {
        sqlx::query_as::<_, Contract>(&format!(
            r#"
            UPDATE contracts
            SET completion_requested_at = NOW(),
                completion_requested_by = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CONTRACT_COLUMNS}
            "#
        ))
        .bind(contract_id)
        .bind(requested_by)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_current_version(
        &self,
        contract_id: Uuid,
    ) -> Result<Option<ContractVersion>, Error> {
        sqlx::query_as::<_, ContractVersion>(&format!(
            r#"
            SELECT {VERSION_COLUMNS}
            FROM contract_versions
            WHERE contract_id = $1 AND is_current_version = TRUE
            "#
        ))
        .bind(contract_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_next_version_number(&self, contract_id: Uuid) -> Result<i32, Error> {
        let max: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT MAX(version_number)
            FROM contract_versions
            WHERE contract_id = $1
            "#,
        )
        .bind(contract_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(max.unwrap_or(0) + 1)
    }

    async fn get_version_by_id(&self, version_id: Uuid) -> Result<Option<ContractVersion>, Error> {
        sqlx::query_as::<_, ContractVersion>(&format!(
            r#"
            SELECT {VERSION_COLUMNS}
            FROM contract_versions
            WHERE id = $1
            "#
        ))
        .bind(version_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_versions_for_contract(
        &self,
        contract_id: Uuid,
    ) -> Result<Vec<ContractVersion>, Error> {
        sqlx::query_as::<_, ContractVersion>(&format!(
            r#"
            SELECT {VERSION_COLUMNS}
            FROM contract_versions
            WHERE contract_id = $1
            ORDER BY version_number DESC
            "#
        ))
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_proposed_version(
        &self,
        contract_id: Uuid,
        version_number: i32,
        title: String,
        description: String,
        payment_amount: BigDecimal,
        payment_type: PaymentType,
        deliverables: String,
        terms: String,
        additional_notes: Option<String>,
        created_by: Uuid,
    ) -> Result<ContractVersion, Error> {
        sqlx::query_as::<_, ContractVersion>(&format!(
            r#"
            INSERT INTO contract_versions
                (contract_id, version_number, title, description, payment_amount,
                 payment_type, deliverables, terms, additional_notes,
                 is_current_version, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE, $10)
            RETURNING {VERSION_COLUMNS}
            "#
        ))
        .bind(contract_id)
        .bind(version_number)
        .bind(title)
        .bind(description)
        .bind(payment_amount)
        .bind(payment_type)
        .bind(deliverables)
        .bind(terms)
        .bind(additional_notes)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
    }

    async fn promote_version(
        &self,
        contract_id: Uuid,
        version_id: Uuid,
    ) -> Result<ContractVersion, Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE contract_versions
            SET is_current_version = FALSE
            WHERE contract_id = $1 AND is_current_version = TRUE
            "#,
        )
        .bind(contract_id)
        .execute(&mut *tx)
        .await?;

        let version = sqlx::query_as::<_, ContractVersion>(&format!(
            r#"
            UPDATE contract_versions
            SET is_current_version = TRUE
            WHERE id = $1 AND contract_id = $2
            RETURNING {VERSION_COLUMNS}
            "#
        ))
        .bind(version_id)
        .bind(contract_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(version)
    }

    async fn create_change_request(
        &self,
        contract_id: Uuid,
        from_version_id: Uuid,
        proposed_version_id: Uuid,
        requested_by_user_id: Uuid,
        change_reason: String,
    ) -> Result<ContractChangeRequest, Error> {
        sqlx::query_as::<_, ContractChangeRequest>(&format!(
            r#"
            INSERT INTO contract_change_requests
                (contract_id, from_version_id, proposed_version_id,
                 requested_by_user_id, change_reason)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(contract_id)
        .bind(from_version_id)
        .bind(proposed_version_id)
        .bind(requested_by_user_id)
        .bind(change_reason)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_change_request_by_id(
        &self,
        request_id: Uuid,
    ) -> Result<Option<ContractChangeRequest>, Error> {
        sqlx::query_as::<_, ContractChangeRequest>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM contract_change_requests
            WHERE id = $1
            "#
        ))
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn approve_change_request(
        &self,
        request_id: Uuid,
        response_by_user_id: Uuid,
        response_notes: Option<String>,
    ) -> Result<Option<(ContractChangeRequest, ContractVersion)>, Error> {
        let mut tx = self.pool.begin().await?;

        // Guarded update: only a still-pending request resolves. A
        // concurrent responder loses here and sees None.
        let request = sqlx::query_as::<_, ContractChangeRequest>(&format!(
            r#"
            UPDATE contract_change_requests
            SET status = $2, response_by_user_id = $3, response_notes = $4,
                responded_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(request_id)
        .bind(ChangeRequestStatus::Approved)
        .bind(response_by_user_id)
        .bind(response_notes)
        .fetch_optional(&mut *tx)
        .await?;

        let request = match request {
            Some(request) => request,
            None => return Ok(None),
        };

        sqlx::query(
            r#"
            UPDATE contract_versions
            SET is_current_version = FALSE
            WHERE contract_id = $1 AND is_current_version = TRUE
            "#,
        )
        .bind(request.contract_id)
        .execute(&mut *tx)
        .await?;

        let version = sqlx::query_as::<_, ContractVersion>(&format!(
            r#"
            UPDATE contract_versions
            SET is_current_version = TRUE
            WHERE id = $1
            RETURNING {VERSION_COLUMNS}
            "#
        ))
        .bind(request.proposed_version_id)
        .fetch_one(&mut *tx)
        .await?;

        // Contract payment terms follow the promoted version.
        sqlx::query(
            r#"
            UPDATE contracts
            SET payment_amount = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(request.contract_id)
        .bind(version.payment_amount.clone())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some((request, version)))
    }

    async fn reject_change_request(
        &self,
        request_id: Uuid,
        response_by_user_id: Uuid,
        response_notes: Option<String>,
    ) -> Result<Option<ContractChangeRequest>, Error> {
        sqlx::query_as::<_, ContractChangeRequest>(&format!(
            r#"
            UPDATE contract_change_requests
            SET status = $2, response_by_user_id = $3, response_notes = $4,
                responded_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(request_id)
        .bind(ChangeRequestStatus::Rejected)
        .bind(response_by_user_id)
        .bind(response_notes)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_pending_request_for_contract(
        &self,
        contract_id: Uuid,
    ) -> Result<Option<ContractChangeRequest>, Error> {
        sqlx::query_as::<_, ContractChangeRequest>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM contract_change_requests
            WHERE contract_id = $1 AND status = 'pending'
            "#
        ))
        .bind(contract_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_change_requests_for_contract(
        &self,
        contract_id: Uuid,
    ) -> Result<Vec<ContractChangeRequest>, Error> {
        sqlx::query_as::<_, ContractChangeRequest>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM contract_change_requests
            WHERE contract_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_pending_requests_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ContractChangeRequest>, Error> {
        sqlx::query_as::<_, ContractChangeRequest>(
            r#"
            SELECT
                ccr.id, ccr.contract_id, ccr.from_version_id, ccr.proposed_version_id,
                ccr.status, ccr.requested_by_user_id, ccr.response_by_user_id,
                ccr.change_reason, ccr.response_notes, ccr.created_at, ccr.responded_at
            FROM contract_change_requests ccr
            JOIN contracts c ON c.id = ccr.contract_id
            WHERE ccr.status = 'pending'
              AND (c.client_id = $1 OR c.freelancer_id = $1)
            ORDER BY ccr.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
