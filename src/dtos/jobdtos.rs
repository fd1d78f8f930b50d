use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::jobmodel::JobStatus;

//Job DTOs
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateJobDto {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100"))]
    pub title: String,

    #[validate(length(min = 20, max = 2000, message = "Description must be between 20 and 2000"))]
    pub description: String,

    #[validate(range(min = 1.0, message = "Budget must be positive"))]
    pub budget: f64,

    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SearchJobsDto {
    pub status: Option<JobStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RejectJobDto {
    #[validate(length(min = 1, max = 500, message = "Rejection message must be between 1 and 500 characters"))]
    pub message: String,
}

//Proposal DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateProposalDto {
    #[validate(length(min = 20, max = 2500, message = "Cover letter must be between 20 and 2500 characters"))]
    pub cover_letter: String,

    #[validate(range(min = 1.0, message = "Proposed amount must be positive"))]
    pub proposed_amount: f64,

    #[validate(range(min = 1, max = 365, message = "Estimated days must be between 1 and 365"))]
    pub estimated_days: i32,
}

//Response wrappers
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub status: String,
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, page: u32, limit: u32) -> Self {
        let total_pages = ((total as f64) / (limit as f64)).ceil() as u32;
        Self {
            status: "success".to_string(),
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn create_job_dto_rejects_short_description() {
        let dto = CreateJobDto {
            title: "Build a landing page".to_string(),
            description: "too short".to_string(),
            budget: 500.0,
            deadline: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn create_proposal_dto_rejects_non_positive_amount() {
        let dto = CreateProposalDto {
            cover_letter: "I have shipped a dozen projects like this one.".to_string(),
            proposed_amount: 0.0,
            estimated_days: 10,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn paginated_response_computes_total_pages() {
        let response = PaginatedResponse::new(vec![1, 2, 3], 45, 1, 20);
        assert_eq!(response.total_pages, 3);
    }
}
