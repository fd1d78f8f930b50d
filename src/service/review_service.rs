// service/review_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{contractdb::ContractExt, db::DBClient, jobdb::JobExt, reviewdb::ReviewExt},
    dtos::reviewdtos::CreateReviewDto,
    models::{jobmodel::JobStatus, reviewmodel::Review},
    service::{error::ServiceError, notification_service::NotificationService},
};

/// Review eligibility and creation. One review per (job, reviewer);
/// reviews open up once the job completes and only to the contract
/// parties.
#[derive(Debug, Clone)]
pub struct ReviewService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl ReviewService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    pub async fn create_review(
        &self,
        reviewer_id: Uuid,
        job_id: Uuid,
        dto: CreateReviewDto,
    ) -> Result<Review, ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        let status = job.status.unwrap_or(JobStatus::PendingApproval);
        if status != JobStatus::Completed {
            return Err(ServiceError::InvalidJobStatus(job_id, status, JobStatus::Completed));
        }

        let contract = self
            .db_client
            .get_contract_by_job_id(job_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Validation(format!("Job {} has no contract to review", job_id))
            })?;

        let reviewee_id = contract
            .counterparty(reviewer_id)
            .ok_or(ServiceError::NotAContractParty(reviewer_id, contract.id))?;

        if self
            .db_client
            .get_review_by_reviewer(job_id, reviewer_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicateReview(job_id, reviewer_id));
        }

        let review = self
            .db_client
            .create_review(
                job_id,
                contract.id,
                reviewer_id,
                reviewee_id,
                dto.rating,
                dto.communication_rating,
                dto.quality_rating,
                dto.timeliness_rating,
                dto.comment,
            )
            .await?;

        self.notification_service.notify_review_received(&review).await;

        Ok(review)
    }

    pub async fn get_reviews_for_job(&self, job_id: Uuid) -> Result<Vec<Review>, ServiceError> {
        Ok(self.db_client.get_reviews_for_job(job_id).await?)
    }

    pub async fn get_reviews_for_user(
        &self,
        reviewee_id: Uuid,
    ) -> Result<Vec<Review>, ServiceError> {
        Ok(self.db_client.get_reviews_for_user(reviewee_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::realtime::NotificationHub;
    use sqlx::postgres::PgPool;

    #[tokio::test]
    async fn review_service_compiles() {
        let pool = PgPool::connect_lazy("postgres://localhost/worknest").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let hub = Arc::new(NotificationHub::new());
        let notifications = Arc::new(NotificationService::new(db_client.clone(), hub));
        let svc = ReviewService::new(db_client, notifications);

        let _ = svc.get_reviews_for_job(Uuid::nil());
        let _ = svc.get_reviews_for_user(Uuid::nil());
    }
}
