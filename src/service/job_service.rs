// service/job_service.rs
use std::sync::Arc;

use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, jobdb::JobExt, userdb::UserExt},
    dtos::jobdtos::{CreateJobDto, CreateProposalDto},
    models::jobmodel::*,
    service::{error::ServiceError, notification_service::NotificationService},
};

/// Job board orchestration: posting, admin moderation and proposals.
#[derive(Debug, Clone)]
pub struct JobService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl JobService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    /// New jobs await admin approval before proposals open.
    pub async fn create_job(&self, client_id: Uuid, dto: CreateJobDto) -> Result<Job, ServiceError> {
        if dto.budget <= 0.0 {
            return Err(ServiceError::Validation("Budget must be positive".to_string()));
        }
        let budget = BigDecimal::try_from(dto.budget)
            .map_err(|_| ServiceError::Validation("Budget is not representable".to_string()))?;

        Ok(self
            .db_client
            .create_job(client_id, dto.title, dto.description, budget, dto.deadline)
            .await?)
    }

    pub async fn get_job(&self, job_id: Uuid) -> Result<Job, ServiceError> {
        self.db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))
    }

    pub async fn search_jobs(
        &self,
        status: Option<JobStatus>,
        client_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Job>, i64), ServiceError> {
        let jobs = self
            .db_client
            .get_jobs(status, client_id, limit, offset)
            .await?;
        let total = self.db_client.count_jobs(status, client_id).await?;

        Ok((jobs, total))
    }

    pub async fn approve_job(&self, admin_id: Uuid, job_id: Uuid) -> Result<Job, ServiceError> {
        let job = self.get_job(job_id).await?;

        let status = job.status.unwrap_or(JobStatus::PendingApproval);
        if status != JobStatus::PendingApproval {
            return Err(ServiceError::InvalidJobStatus(
                job_id,
                status,
                JobStatus::PendingApproval,
            ));
        }

        let approved = self.db_client.update_job_status(job_id, JobStatus::Open).await?;

        self.notification_service
            .notify_job_approved(&approved, admin_id)
            .await;

        Ok(approved)
    }

    /// Rejection cancels the job; the client is told why.
    pub async fn reject_job(
        &self,
        admin_id: Uuid,
        job_id: Uuid,
        message: String,
    ) -> Result<Job, ServiceError> {
        let job = self.get_job(job_id).await?;

        let status = job.status.unwrap_or(JobStatus::PendingApproval);
        if !matches!(status, JobStatus::PendingApproval | JobStatus::Open) {
            return Err(ServiceError::InvalidJobStatus(
                job_id,
                status,
                JobStatus::PendingApproval,
            ));
        }

        let rejected = self
            .db_client
            .update_job_status(job_id, JobStatus::Cancelled)
            .await?;

        self.notification_service
            .notify_job_rejected(&rejected, admin_id, &message)
            .await;

        Ok(rejected)
    }

    pub async fn submit_proposal(
        &self,
        freelancer_id: Uuid,
        job_id: Uuid,
        dto: CreateProposalDto,
    ) -> Result<Proposal, ServiceError> {
        let job = self.get_job(job_id).await?;

        let status = job.status.unwrap_or(JobStatus::PendingApproval);
        if status != JobStatus::Open {
            return Err(ServiceError::InvalidJobStatus(job_id, status, JobStatus::Open));
        }

        if job.client_id == freelancer_id {
            return Err(ServiceError::Validation(
                "You cannot submit a proposal on your own job".to_string(),
            ));
        }

        if dto.proposed_amount <= 0.0 {
            return Err(ServiceError::Validation(
                "Proposed amount must be positive".to_string(),
            ));
        }
        let proposed_amount = BigDecimal::try_from(dto.proposed_amount)
            .map_err(|_| ServiceError::Validation("Proposed amount is not representable".to_string()))?;

        if self
            .db_client
            .get_open_proposal(job_id, freelancer_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicateProposal(job_id));
        }

        let proposal = self
            .db_client
            .create_proposal(
                job_id,
                freelancer_id,
                dto.cover_letter,
                proposed_amount,
                dto.estimated_days,
            )
            .await?;

        let freelancer_name = self
            .db_client
            .get_user(Some(freelancer_id), None, None)
            .await?
            .map(|user| user.name)
            .unwrap_or_else(|| "A freelancer".to_string());

        self.notification_service
            .notify_proposal_received(&job, &proposal, &freelancer_name)
            .await;

        Ok(proposal)
    }

    pub async fn get_proposals_for_job(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<Vec<Proposal>, ServiceError> {
        let job = self.get_job(job_id).await?;

        // Only the job owner sees the full proposal list.
        if job.client_id != user_id {
            return Err(ServiceError::UnauthorizedJobAccess(user_id, job_id));
        }

        Ok(self.db_client.get_proposals_for_job(job_id).await?)
    }

    /// Client declines a proposal without accepting another one.
    pub async fn reject_proposal(
        &self,
        client_id: Uuid,
        proposal_id: Uuid,
    ) -> Result<Proposal, ServiceError> {
        let proposal = self
            .db_client
            .get_proposal_by_id(proposal_id)
            .await?
            .ok_or(ServiceError::ProposalNotFound(proposal_id))?;

        let job = self.get_job(proposal.job_id).await?;
        if job.client_id != client_id {
            return Err(ServiceError::UnauthorizedJobAccess(client_id, job.id));
        }

        if !proposal.status.unwrap_or(ProposalStatus::Submitted).is_open() {
            return Err(ServiceError::Validation(
                "Proposal has already been resolved".to_string(),
            ));
        }

        let rejected = self
            .db_client
            .update_proposal_status(proposal_id, ProposalStatus::Rejected)
            .await?;

        self.notification_service
            .notify_proposal_rejected(&job, &rejected)
            .await;

        Ok(rejected)
    }

    pub async fn withdraw_proposal(
        &self,
        freelancer_id: Uuid,
        proposal_id: Uuid,
    ) -> Result<Proposal, ServiceError> {
        let proposal = self
            .db_client
            .get_proposal_by_id(proposal_id)
            .await?
            .ok_or(ServiceError::ProposalNotFound(proposal_id))?;

        if proposal.freelancer_id != freelancer_id {
            return Err(ServiceError::UnauthorizedJobAccess(freelancer_id, proposal.job_id));
        }

        if !proposal.status.unwrap_or(ProposalStatus::Submitted).is_open() {
            return Err(ServiceError::Validation(
                "Proposal has already been resolved".to_string(),
            ));
        }

        let withdrawn = self
            .db_client
            .update_proposal_status(proposal_id, ProposalStatus::Withdrawn)
            .await?;

        let job = self.get_job(proposal.job_id).await?;
        self.notification_service
            .notify_proposal_withdrawn(&job, &withdrawn)
            .await;

        Ok(withdrawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::realtime::NotificationHub;
    use sqlx::postgres::PgPool;

    #[tokio::test]
    async fn job_service_compiles() {
        let pool = PgPool::connect_lazy("postgres://localhost/worknest").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let hub = Arc::new(NotificationHub::new());
        let notifications = Arc::new(NotificationService::new(db_client.clone(), hub));
        let svc = JobService::new(db_client, notifications);

        let _ = svc.get_job(Uuid::nil());
        let _ = svc.approve_job(Uuid::nil(), Uuid::nil());
        let _ = svc.reject_job(Uuid::nil(), Uuid::nil(), "spam".to_string());
    }
}
