// handler/reviews.rs
use std::sync::Arc;

use axum::{
    extract::Path, response::IntoResponse, routing::post, Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{jobdtos::ApiResponse, reviewdtos::CreateReviewDto},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

// The received-reviews listing is mounted under /users by routes.rs.
pub fn reviews_handler() -> Router {
    Router::new().route("/jobs/:job_id/reviews", post(create_review).get(get_job_reviews))
}

pub async fn create_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<CreateReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let review = app_state
        .review_service
        .create_review(auth.user.id, job_id, body)
        .await?;

    Ok(Json(ApiResponse::success(
        "Review submitted successfully",
        review,
    )))
}

pub async fn get_job_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(_auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let reviews = app_state.review_service.get_reviews_for_job(job_id).await?;

    Ok(Json(ApiResponse::success("Reviews retrieved", reviews)))
}

pub async fn get_user_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(_auth): Extension<JWTAuthMiddeware>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let reviews = app_state
        .review_service
        .get_reviews_for_user(user_id)
        .await?;

    Ok(Json(ApiResponse::success("Reviews retrieved", reviews)))
}
