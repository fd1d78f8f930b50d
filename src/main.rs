mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod mail;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::db::db::DBClient;
use service::{
    change_request_service::ChangeRequestService, contract_service::ContractService,
    job_service::JobService, notification_service::NotificationService,
    realtime::NotificationHub, review_service::ReviewService, version_service::VersionService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub notification_hub: Arc<NotificationHub>,
    // Services
    pub job_service: Arc<JobService>,
    pub contract_service: Arc<ContractService>,
    pub version_service: Arc<VersionService>,
    pub change_request_service: Arc<ChangeRequestService>,
    pub review_service: Arc<ReviewService>,
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client_arc = Arc::new(db_client);
        let notification_hub = Arc::new(NotificationHub::new());

        // Initialize all services
        let notification_service = Arc::new(NotificationService::new(
            db_client_arc.clone(),
            notification_hub.clone(),
        ));
        let version_service = Arc::new(VersionService::new(db_client_arc.clone()));

        let job_service = Arc::new(JobService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));
        let contract_service = Arc::new(ContractService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));
        let change_request_service = Arc::new(ChangeRequestService::new(
            db_client_arc.clone(),
            version_service.clone(),
            notification_service.clone(),
        ));
        let review_service = Arc::new(ReviewService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));

        Self {
            env: config,
            db_client: db_client_arc,
            notification_hub,
            job_service,
            contract_service,
            version_service,
            change_request_service,
            review_service,
            notification_service,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    // Connect to PostgreSQL
    let pool = match PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("Connection to the database is successful");

            // Background task watching pool pressure
            let max_connections = 20;
            let pool_for_monitoring = pool.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(std::time::Duration::from_secs(30));
                loop {
                    interval.tick().await;
                    let size = pool_for_monitoring.size();
                    let idle = pool_for_monitoring.num_idle();
                    tracing::debug!(
                        "Pool status - active: {}, idle: {}, total: {}",
                        size - idle as u32,
                        idle,
                        size
                    );

                    if size >= max_connections * 8 / 10 {
                        tracing::warn!(
                            "Connection pool at 80% capacity, consider increasing max_connections"
                        );
                    }
                }
            });

            pool
        }
        Err(err) => {
            tracing::error!("Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    // Initialize DBClient with optional Redis
    let db_client = if let Some(ref redis_url) = config.redis_url {
        match DBClient::with_redis(pool.clone(), redis_url).await {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("Redis initialization error: {} - running without it", e);
                DBClient::new(pool)
            }
        }
    } else {
        tracing::info!("Redis not configured (set REDIS_URL to enable token revocation)");
        DBClient::new(pool)
    };

    let allowed_origins = vec![
        "http://localhost:5173".parse::<HeaderValue>().unwrap(),
        "http://localhost:8000".parse::<HeaderValue>().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ]);

    let token_blacklist = if db_client.is_redis_available() {
        "enabled"
    } else {
        "disabled"
    };
    tracing::info!("Token revocation list: {}", token_blacklist);

    let app_state = Arc::new(AppState::new(db_client, config.clone()));

    let app = create_router(app_state.clone()).layer(cors);

    // Drain the notification email outbox in the background
    let app_state_clone = app_state.clone();
    tokio::spawn(async move {
        service::background_jobs::start_email_dispatch_worker(app_state_clone).await;
    });

    tracing::info!("Server is running on http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
