use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::contractmodel::{
    Contract, ContractChangeRequest, ContractStatus, ContractVersion, PaymentType,
};

#[derive(Debug, Deserialize, Validate)]
pub struct AcceptProposalDto {
    pub payment_type: Option<PaymentType>,

    #[validate(length(max = 2000, message = "Deliverables must be at most 2000 characters"))]
    pub deliverables: Option<String>,

    #[validate(length(max = 2000, message = "Terms must be at most 2000 characters"))]
    pub terms: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ProposeChangesDto {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100"))]
    pub title: String,

    #[validate(length(min = 20, max = 2000, message = "Description must be between 20 and 2000"))]
    pub description: String,

    #[validate(range(min = 0.01, message = "Payment amount must be positive"))]
    pub payment_amount: f64,

    pub payment_type: PaymentType,

    #[validate(length(min = 1, max = 2000, message = "Deliverables must be between 1 and 2000 characters"))]
    pub deliverables: String,

    #[validate(length(min = 1, max = 2000, message = "Terms must be between 1 and 2000 characters"))]
    pub terms: String,

    pub additional_notes: Option<String>,

    #[validate(length(min = 1, max = 1000, message = "Change reason must be between 1 and 1000 characters"))]
    pub change_reason: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RespondChangeRequestDto {
    pub is_approved: bool,

    #[validate(length(max = 1000, message = "Response notes must be at most 1000 characters"))]
    pub response_notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateContractStatusDto {
    pub status: ContractStatus,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChangeRequestCreatedDto {
    pub change_request_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ContractHistoryDto {
    pub contract: Contract,
    pub versions: Vec<ContractVersion>,
    pub change_requests: Vec<ContractChangeRequest>,
}

#[derive(Debug, Serialize)]
pub struct ContractDetailsDto {
    pub contract: Contract,
    pub current_version: Option<ContractVersion>,
}

#[derive(Debug, Deserialize)]
pub struct ContractsQueryDto {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn propose_dto(amount: f64) -> ProposeChangesDto {
        ProposeChangesDto {
            title: "Updated scope".to_string(),
            description: "Same engagement with an extra milestone added.".to_string(),
            payment_amount: amount,
            payment_type: PaymentType::Fixed,
            deliverables: "Landing page, admin panel".to_string(),
            terms: "Net 14 payment after acceptance".to_string(),
            additional_notes: None,
            change_reason: "Scope grew by one milestone".to_string(),
        }
    }

    #[test]
    fn propose_changes_requires_positive_amount() {
        assert!(propose_dto(750.0).validate().is_ok());
        assert!(propose_dto(0.0).validate().is_err());
        assert!(propose_dto(-5.0).validate().is_err());
    }
}
