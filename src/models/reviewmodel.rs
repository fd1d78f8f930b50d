use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub job_id: Uuid,
    pub contract_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub rating: i32,
    pub communication_rating: Option<i32>,
    pub quality_rating: Option<i32>,
    pub timeliness_rating: Option<i32>,
    pub comment: String,
    pub created_at: Option<DateTime<Utc>>,
}
