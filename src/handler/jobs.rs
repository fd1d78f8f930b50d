// handler/jobs.rs
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
    dtos::{contractdtos::AcceptProposalDto, jobdtos::*},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn jobs_handler() -> Router {
    Router::new()
        // Job board
        .route("/jobs", post(create_job).get(search_jobs))
        .route("/jobs/:job_id", get(get_job_details))
        // Proposals
        .route("/jobs/:job_id/proposals", post(submit_proposal).get(get_job_proposals))
        .route("/proposals/:proposal_id/accept", put(accept_proposal))
        .route("/proposals/:proposal_id/reject", put(reject_proposal))
        .route("/proposals/:proposal_id/withdraw", put(withdraw_proposal))
}

pub fn admin_handler() -> Router {
    Router::new()
        .route("/jobs/:job_id/approve", post(approve_job))
        .route("/jobs/:job_id/reject", post(reject_job))
}

pub async fn create_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state
        .job_service
        .create_job(auth.user.id, body)
        .await?;

    Ok(Json(ApiResponse::success(
        "Job submitted for approval",
        job,
    )))
}

pub async fn search_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(_auth): Extension<JWTAuthMiddeware>,
    Query(params): Query<SearchJobsDto>,
) -> Result<impl IntoResponse, HttpError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).min(100);
    let offset = ((page - 1) * limit) as i64;

    let (jobs, total) = app_state
        .job_service
        .search_jobs(params.status, None, limit as i64, offset)
        .await?;

    Ok(Json(PaginatedResponse::new(jobs, total, page, limit)))
}

pub async fn get_job_details(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(_auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state.job_service.get_job(job_id).await?;

    Ok(Json(ApiResponse::success("Job retrieved", job)))
}

pub async fn submit_proposal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<CreateProposalDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let proposal = app_state
        .job_service
        .submit_proposal(auth.user.id, job_id, body)
        .await?;

    Ok(Json(ApiResponse::success(
        "Proposal submitted successfully",
        proposal,
    )))
}

pub async fn get_job_proposals(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let proposals = app_state
        .job_service
        .get_proposals_for_job(auth.user.id, job_id)
        .await?;

    Ok(Json(ApiResponse::success("Proposals retrieved", proposals)))
}

pub async fn accept_proposal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(proposal_id): Path<Uuid>,
    Json(body): Json<AcceptProposalDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let contract = app_state
        .contract_service
        .accept_proposal(auth.user.id, proposal_id, body)
        .await?;

    Ok(Json(ApiResponse::success(
        "Proposal accepted and contract created",
        contract,
    )))
}

pub async fn reject_proposal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(proposal_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let proposal = app_state
        .job_service
        .reject_proposal(auth.user.id, proposal_id)
        .await?;

    Ok(Json(ApiResponse::success("Proposal rejected", proposal)))
}

pub async fn withdraw_proposal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(proposal_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let proposal = app_state
        .job_service
        .withdraw_proposal(auth.user.id, proposal_id)
        .await?;

    Ok(Json(ApiResponse::success("Proposal withdrawn", proposal)))
}

// Admin moderation

pub async fn approve_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .approve_job(auth.user.id, job_id)
        .await?;

    Ok(Json(ApiResponse::success("Job approved", job)))
}

pub async fn reject_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<RejectJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state
        .job_service
        .reject_job(auth.user.id, job_id, body.message)
        .await?;

    Ok(Json(ApiResponse::success("Job rejected", job)))
}
