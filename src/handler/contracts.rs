// handler/contracts.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{contractdtos::*, jobdtos::ApiResponse},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn contracts_handler() -> Router {
    Router::new()
        .route("/", get(get_my_contracts))
        .route("/change-requests/mine", get(get_my_pending_change_requests))
        .route("/change-requests/:request_id/respond", post(respond_change_request))
        .route("/:contract_id", get(get_contract))
        .route("/:contract_id/history", get(get_contract_history))
        .route("/:contract_id/propose-changes", post(propose_changes))
        .route("/:contract_id/change-requests", get(get_pending_change_requests))
        .route("/:contract_id/status", put(update_contract_status))
        .route("/:contract_id/start", post(start_contract))
        .route("/:contract_id/complete", post(complete_contract))
        .route("/:contract_id/cancel", post(cancel_contract))
}

pub async fn get_my_contracts(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(params): Query<ContractsQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).min(100);
    let offset = ((page - 1) * limit) as i64;

    let contracts = app_state
        .contract_service
        .get_contracts_for_user(auth.user.id, limit as i64, offset)
        .await?;

    Ok(Json(ApiResponse::success("Contracts retrieved", contracts)))
}

pub async fn get_contract(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(contract_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let details = app_state
        .contract_service
        .get_contract(auth.user.id, contract_id)
        .await?;

    Ok(Json(ApiResponse::success("Contract retrieved", details)))
}

pub async fn get_contract_history(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(contract_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let history = app_state
        .contract_service
        .get_history(auth.user.id, contract_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Contract history retrieved",
        history,
    )))
}

pub async fn propose_changes(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(contract_id): Path<Uuid>,
    Json(body): Json<ProposeChangesDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let request = app_state
        .change_request_service
        .propose_change(auth.user.id, contract_id, body)
        .await?;

    Ok(Json(ApiResponse::success(
        "Change request submitted",
        ChangeRequestCreatedDto {
            change_request_id: request.id,
        },
    )))
}

pub async fn respond_change_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(request_id): Path<Uuid>,
    Json(body): Json<RespondChangeRequestDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let request = app_state
        .change_request_service
        .respond(auth.user.id, request_id, body)
        .await?;

    Ok(Json(ApiResponse::success("Change request resolved", request)))
}

pub async fn get_pending_change_requests(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(contract_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let pending = app_state
        .change_request_service
        .get_pending_for_contract(auth.user.id, contract_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Pending change requests retrieved",
        pending,
    )))
}

pub async fn get_my_pending_change_requests(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let pending = app_state
        .change_request_service
        .get_my_pending(auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Pending change requests retrieved",
        pending,
    )))
}

pub async fn update_contract_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(contract_id): Path<Uuid>,
    Json(body): Json<UpdateContractStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let contract = app_state
        .contract_service
        .update_status(auth.user.id, contract_id, body.status, body.notes)
        .await?;

    Ok(Json(ApiResponse::success("Contract status updated", contract)))
}

pub async fn start_contract(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(contract_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let contract = app_state
        .contract_service
        .start_contract(auth.user.id, contract_id)
        .await?;

    Ok(Json(ApiResponse::success("Contract started", contract)))
}

pub async fn complete_contract(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(contract_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let contract = app_state
        .contract_service
        .complete_contract(auth.user.id, contract_id)
        .await?;

    Ok(Json(ApiResponse::success("Contract completed", contract)))
}

pub async fn cancel_contract(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(contract_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let contract = app_state
        .contract_service
        .cancel_contract(auth.user.id, contract_id)
        .await?;

    Ok(Json(ApiResponse::success("Contract cancelled", contract)))
}
