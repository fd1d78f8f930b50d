// routes.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        contracts::contracts_handler,
        jobs::{admin_handler, jobs_handler},
        notifications::notifications_handler,
        reviews::reviews_handler,
        users::users_handler,
    },
    middleware::{auth, require_admin},
    AppState,
};

// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest(
            "/users",
            users_handler().layer(middleware::from_fn(auth)),
        )
        .merge(jobs_handler().layer(middleware::from_fn(auth)))
        .merge(reviews_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/admin",
            admin_handler()
                .layer(middleware::from_fn(require_admin))
                .layer(middleware::from_fn(auth)),
        )
        .nest(
            "/contracts",
            contracts_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/notifications",
            notifications_handler().layer(middleware::from_fn(auth)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::db::DBClient;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPool;
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let pool = PgPool::connect_lazy("postgres://localhost/worknest").unwrap();
        let config = Config {
            database_url: "postgres://localhost/worknest".to_string(),
            redis_url: None,
            app_url: "http://localhost:8000".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_maxage: 60,
            port: 8000,
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: "".to_string(),
            smtp_password: "".to_string(),
            smtp_from: "Worknest <noreply@worknest.app>".to_string(),
            email_max_retries: 3,
            email_retry_delay_ms: 1000,
            email_worker_interval_secs: 15,
        };

        Arc::new(AppState::new(DBClient::new(pool), config))
    }

    #[tokio::test]
    async fn health_check_needs_no_auth() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn api_routes_require_a_token() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/contracts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
