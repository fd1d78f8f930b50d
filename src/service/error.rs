use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::HttpError,
    models::{contractmodel::ContractStatus, jobmodel::JobStatus},
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    #[error("Proposal {0} not found")]
    ProposalNotFound(Uuid),

    #[error("Contract {0} not found")]
    ContractNotFound(Uuid),

    #[error("Contract version {0} not found")]
    VersionNotFound(Uuid),

    #[error("Change request {0} not found")]
    ChangeRequestNotFound(Uuid),

    #[error("User {0} is not a party of contract {1}")]
    NotAContractParty(Uuid, Uuid),

    #[error("User {0} is not authorized to perform this action on job {1}")]
    UnauthorizedJobAccess(Uuid, Uuid),

    #[error("You cannot respond to your own change request")]
    OwnChangeRequest(Uuid),

    #[error("Change request {0} has already been resolved")]
    ChangeRequestAlreadyResolved(Uuid),

    #[error("Contract {0} already has a pending change request")]
    PendingRequestExists(Uuid),

    #[error("Contract {0} is {status} and its terms can no longer be changed", status = .1.to_str())]
    ContractNotEditable(Uuid, ContractStatus),

    #[error("Cannot move contract from {from} to {to}", from = .0.to_str(), to = .1.to_str())]
    InvalidStatusTransition(ContractStatus, ContractStatus),

    #[error("Job {0} is {status}, expected {expected}", status = .1.to_str(), expected = .2.to_str())]
    InvalidJobStatus(Uuid, JobStatus, JobStatus),

    #[error("User {1} has already reviewed job {0}")]
    DuplicateReview(Uuid, Uuid),

    #[error("You already have a proposal on job {0}")]
    DuplicateProposal(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Notification error: {0}")]
    Notification(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::JobNotFound(_)
            | ServiceError::ProposalNotFound(_)
            | ServiceError::ContractNotFound(_)
            | ServiceError::VersionNotFound(_)
            | ServiceError::ChangeRequestNotFound(_) => HttpError::not_found(error.to_string()),

            ServiceError::NotAContractParty(_, _)
            | ServiceError::UnauthorizedJobAccess(_, _)
            | ServiceError::OwnChangeRequest(_) => HttpError::unauthorized(error.to_string()),

            ServiceError::ChangeRequestAlreadyResolved(_)
            | ServiceError::PendingRequestExists(_)
            | ServiceError::ContractNotEditable(_, _)
            | ServiceError::InvalidStatusTransition(_, _)
            | ServiceError::InvalidJobStatus(_, _, _)
            | ServiceError::DuplicateProposal(_)
            | ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            ServiceError::DuplicateReview(_, _) => {
                HttpError::unique_constraint_violation(error.to_string())
            }

            _ => HttpError::server_error(error.to_string()),
        }
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::JobNotFound(_)
            | ServiceError::ProposalNotFound(_)
            | ServiceError::ContractNotFound(_)
            | ServiceError::VersionNotFound(_)
            | ServiceError::ChangeRequestNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::NotAContractParty(_, _)
            | ServiceError::UnauthorizedJobAccess(_, _)
            | ServiceError::OwnChangeRequest(_) => StatusCode::UNAUTHORIZED,

            ServiceError::ChangeRequestAlreadyResolved(_)
            | ServiceError::PendingRequestExists(_)
            | ServiceError::ContractNotEditable(_, _)
            | ServiceError::InvalidStatusTransition(_, _)
            | ServiceError::InvalidJobStatus(_, _, _)
            | ServiceError::DuplicateProposal(_)
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::DuplicateReview(_, _) => StatusCode::CONFLICT,

            ServiceError::Database(_) | ServiceError::Notification(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_taxonomy() {
        let id = Uuid::new_v4();

        assert_eq!(
            ServiceError::ContractNotFound(id).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::OwnChangeRequest(id).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::ChangeRequestAlreadyResolved(id).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InvalidStatusTransition(ContractStatus::Pending, ContractStatus::Completed)
                .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::DuplicateReview(id, id).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn transition_error_is_human_readable() {
        let err =
            ServiceError::InvalidStatusTransition(ContractStatus::Pending, ContractStatus::Completed);
        assert_eq!(err.to_string(), "Cannot move contract from pending to completed");
    }
}
