// db/reviewdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::reviewmodel::Review;

const REVIEW_COLUMNS: &str = r#"
    id, job_id, contract_id, reviewer_id, reviewee_id, rating,
    communication_rating, quality_rating, timeliness_rating,
    comment, created_at
"#;

#[async_trait]
pub trait ReviewExt {
    #[allow(clippy::too_many_arguments)]
    async fn create_review(
        &self,
        job_id: Uuid,
        contract_id: Uuid,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
        rating: i32,
        communication_rating: Option<i32>,
        quality_rating: Option<i32>,
        timeliness_rating: Option<i32>,
        comment: String,
    ) -> Result<Review, Error>;

    async fn get_review_by_reviewer(
        &self,
        job_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<Option<Review>, Error>;

    async fn get_reviews_for_job(&self, job_id: Uuid) -> Result<Vec<Review>, Error>;

    async fn get_reviews_for_user(&self, reviewee_id: Uuid) -> Result<Vec<Review>, Error>;
}

#[async_trait]
impl ReviewExt for DBClient {
    async fn create_review(
        &self,
        job_id: Uuid,
        contract_id: Uuid,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
        rating: i32,
        communication_rating: Option<i32>,
        quality_rating: Option<i32>,
        timeliness_rating: Option<i32>,
        comment: String,
    ) -> Result<Review, Error> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO reviews
                (job_id, contract_id, reviewer_id, reviewee_id, rating,
                 communication_rating, quality_rating, timeliness_rating, comment)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(contract_id)
        .bind(reviewer_id)
        .bind(reviewee_id)
        .bind(rating)
        .bind(communication_rating)
        .bind(quality_rating)
        .bind(timeliness_rating)
        .bind(comment)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_review_by_reviewer(
        &self,
        job_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<Option<Review>, Error> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM reviews
            WHERE job_id = $1 AND reviewer_id = $2
            "#
        ))
        .bind(job_id)
        .bind(reviewer_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_reviews_for_job(&self, job_id: Uuid) -> Result<Vec<Review>, Error> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM reviews
            WHERE job_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_reviews_for_user(&self, reviewee_id: Uuid) -> Result<Vec<Review>, Error> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM reviews
            WHERE reviewee_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(reviewee_id)
        .fetch_all(&self.pool)
        .await
    }
}
