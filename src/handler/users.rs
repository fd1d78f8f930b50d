// handler/users.rs
use std::sync::Arc;

use axum::{response::IntoResponse, routing::get, Extension, Json, Router};

use crate::{
    dtos::{jobdtos::ApiResponse, userdtos::FilterUserDto},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route(
            "/:user_id/reviews",
            get(crate::handler::reviews::get_user_reviews),
        )
}

pub async fn get_me(
    Extension(_app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let user = FilterUserDto::filter_user(&auth.user);

    Ok(Json(ApiResponse::success("User retrieved", user)))
}
