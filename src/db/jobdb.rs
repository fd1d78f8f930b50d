// db/jobdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::BigDecimal;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::jobmodel::*;

#[async_trait]
pub trait JobExt {
    async fn create_job(
        &self,
        client_id: Uuid,
        title: String,
        description: String,
        budget: BigDecimal,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<Job, Error>;

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, Error>;

    async fn get_jobs(
        &self,
        status: Option<JobStatus>,
        client_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Job>, Error>;

    async fn count_jobs(
        &self,
        status: Option<JobStatus>,
        client_id: Option<Uuid>,
    ) -> Result<i64, Error>;

    async fn update_job_status(&self, job_id: Uuid, status: JobStatus) -> Result<Job, Error>;

    // Proposals
    async fn create_proposal(
        &self,
        job_id: Uuid,
        freelancer_id: Uuid,
        cover_letter: String,
        proposed_amount: BigDecimal,
        estimated_days: i32,
    ) -> Result<Proposal, Error>;

    async fn get_proposal_by_id(&self, proposal_id: Uuid) -> Result<Option<Proposal>, Error>;

    async fn get_proposals_for_job(&self, job_id: Uuid) -> Result<Vec<Proposal>, Error>;

    async fn get_open_proposal(
        &self,
        job_id: Uuid,
        freelancer_id: Uuid,
    ) -> Result<Option<Proposal>, Error>;

    async fn update_proposal_status(
        &self,
        proposal_id: Uuid,
        status: ProposalStatus,
    ) -> Result<Proposal, Error>;
}

#[async_trait]
impl JobExt for DBClient {
    async fn create_job(
        &self,
        client_id: Uuid,
        title: String,
        description: String,
        budget: BigDecimal,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<Job, Error> {
        sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (client_id, title, description, budget, deadline)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id, client_id, title, description, budget,
                status, deadline, created_at, updated_at
            "#,
        )
        .bind(client_id)
        .bind(title)
        .bind(description)
        .bind(budget)
        .bind(deadline)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT
                id, client_id, title, description, budget,
                status, deadline, created_at, updated_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_jobs(
        &self,
        status: Option<JobStatus>,
        client_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT
                id, client_id, title, description, budget,
                status, deadline, created_at, updated_at
            FROM jobs
            WHERE ($1::job_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR client_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(status)
        .bind(client_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn count_jobs(
        &self,
        status: Option<JobStatus>,
        client_id: Option<Uuid>,
    ) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM jobs
            WHERE ($1::job_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR client_id = $2)
            "#,
        )
        .bind(status)
        .bind(client_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_job_status(&self, job_id: Uuid, status: JobStatus) -> Result<Job, Error> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, client_id, title, description, budget,
                status, deadline, created_at, updated_at
            "#,
        )
        .bind(job_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn create_proposal(
        &self,
        job_id: Uuid,
        freelancer_id: Uuid,
        cover_letter: String,
        proposed_amount: BigDecimal,
        estimated_days: i32,
    ) -> Result<Proposal, Error> {
        sqlx::query_as::<_, Proposal>(
            r#"
            INSERT INTO proposals (job_id, freelancer_id, cover_letter, proposed_amount, estimated_days)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id, job_id, freelancer_id, cover_letter, proposed_amount,
                estimated_days, status, created_at
            "#,
        )
        .bind(job_id)
        .bind(freelancer_id)
        .bind(cover_letter)
        .bind(proposed_amount)
        .bind(estimated_days)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_proposal_by_id(&self, proposal_id: Uuid) -> Result<Option<Proposal>, Error> {
        sqlx::query_as::<_, Proposal>(
            r#"
            SELECT
                id, job_id, freelancer_id, cover_letter, proposed_amount,
                estimated_days, status, created_at
            FROM proposals
            WHERE id = $1
            "#,
        )
        .bind(proposal_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_proposals_for_job(&self, job_id: Uuid) -> Result<Vec<Proposal>, Error> {
        sqlx::query_as::<_, Proposal>(
            r#"
            SELECT
                id, job_id, freelancer_id, cover_letter, proposed_amount,
                estimated_days, status, created_at
            FROM proposals
            WHERE job_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_open_proposal(
        &self,
        job_id: Uuid,
        freelancer_id: Uuid,
    ) -> Result<Option<Proposal>, Error> {
        sqlx::query_as::<_, Proposal>(
            r#"
            SELECT
                id, job_id, freelancer_id, cover_letter, proposed_amount,
                estimated_days, status, created_at
            FROM proposals
            WHERE job_id = $1 AND freelancer_id = $2 AND status != 'withdrawn'
            "#,
        )
        .bind(job_id)
        .bind(freelancer_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_proposal_status(
        &self,
        proposal_id: Uuid,
        status: ProposalStatus,
    ) -> Result<Proposal, Error> {
        sqlx::query_as::<_, Proposal>(
            r#"
            UPDATE proposals
            SET status = $2
            WHERE id = $1
            RETURNING
                id, job_id, freelancer_id, cover_letter, proposed_amount,
                estimated_days, status, created_at
            "#,
        )
        .bind(proposal_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }
}
