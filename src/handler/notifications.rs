// handler/notifications.rs
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    db::notificationdb::NotificationExt,
    dtos::{jobdtos::ApiResponse, notificationdtos::*},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    service::realtime::NotificationHub,
    AppState,
};

pub fn notifications_handler() -> Router {
    Router::new()
        .route("/", get(get_user_notifications))
        .route("/unread-count", get(get_unread_count))
        .route("/analytics", get(get_notification_analytics))
        .route("/stream", get(notification_stream))
        .route("/read", post(mark_notifications_read))
        .route("/read-all", post(mark_all_notifications_read))
        .route("/:id/read", put(mark_single_notification_read))
        .route("/:id", delete(delete_notification))
}

pub async fn get_user_notifications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(params): Query<NotificationQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).min(100) as i64;
    let offset = ((page - 1) * limit as u32) as i64;
    let unread_only = params.unread_only.unwrap_or(false);

    let notifications = app_state
        .db_client
        .get_notifications(auth.user.id, unread_only, limit, offset)
        .await
        .map_err(|e| HttpError::server_error(format!("Failed to fetch notifications: {}", e)))?;

    let total = app_state
        .db_client
        .count_notifications(auth.user.id, unread_only)
        .await
        .map_err(|e| HttpError::server_error(format!("Failed to count notifications: {}", e)))?;

    let unread_count = app_state
        .db_client
        .count_notifications(auth.user.id, true)
        .await
        .map_err(|e| HttpError::server_error(format!("Failed to count unread notifications: {}", e)))?;

    Ok(Json(ApiResponse::success(
        "Notifications retrieved",
        NotificationListDto {
            notifications,
            total,
            page,
            limit: limit as u32,
            unread_count,
        },
    )))
}

pub async fn get_unread_count(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let count = app_state
        .db_client
        .count_notifications(auth.user.id, true)
        .await
        .map_err(|e| HttpError::server_error(format!("Failed to count notifications: {}", e)))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "unread_count": count
        }
    })))
}

pub async fn get_notification_analytics(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let total = app_state
        .db_client
        .count_notifications(auth.user.id, false)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let unread = app_state
        .db_client
        .count_notifications(auth.user.id, true)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let urgent_unread = app_state
        .db_client
        .count_urgent_unread(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let by_kind = app_state
        .db_client
        .count_notifications_by_kind(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .into_iter()
        .map(|(kind, count)| KindCountDto { kind, count })
        .collect();

    Ok(Json(ApiResponse::success(
        "Notification analytics retrieved",
        NotificationAnalyticsDto {
            total,
            unread,
            urgent_unread,
            by_kind,
        },
    )))
}

pub async fn mark_notifications_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(payload): Json<MarkReadDto>,
) -> Result<impl IntoResponse, HttpError> {
    let mut updated = 0;

    if let Some(notification_ids) = payload.notification_ids {
        for notification_id in notification_ids {
            updated += app_state
                .db_client
                .mark_notification_read(notification_id, auth.user.id)
                .await
                .map_err(|e| {
                    HttpError::server_error(format!("Failed to mark notification as read: {}", e))
                })?;
        }
    }

    Ok(Json(ApiResponse::success(
        "Notifications marked as read",
        serde_json::json!({ "updated_count": updated }),
    )))
}

pub async fn mark_all_notifications_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let updated = app_state
        .db_client
        .mark_all_notifications_read(auth.user.id)
        .await
        .map_err(|e| {
            HttpError::server_error(format!("Failed to mark all notifications as read: {}", e))
        })?;

    Ok(Json(ApiResponse::success(
        "All notifications marked as read",
        serde_json::json!({ "updated_count": updated }),
    )))
}

pub async fn mark_single_notification_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db_client
        .mark_notification_read(notification_id, auth.user.id)
        .await
        .map_err(|e| {
            HttpError::server_error(format!("Failed to mark notification as read: {}", e))
        })?;

    Ok(Json(ApiResponse::success(
        "Notification marked as read",
        serde_json::json!({}),
    )))
}

pub async fn delete_notification(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let deleted = app_state
        .db_client
        .delete_notification(notification_id, auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(format!("Failed to delete notification: {}", e)))?;

    if deleted == 0 {
        return Err(HttpError::not_found("Notification not found or already deleted"));
    }

    Ok(Json(ApiResponse::success(
        "Notification deleted",
        serde_json::json!({}),
    )))
}

/// Live notification channel. Events are pushed as JSON text frames;
/// delivery is best-effort with no replay of missed events.
pub async fn notification_stream(
    ws: WebSocketUpgrade,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> impl IntoResponse {
    let hub = app_state.notification_hub.clone();
    let user_id = auth.user.id;

    ws.on_upgrade(move |socket| handle_socket(socket, hub, user_id))
}

async fn handle_socket(socket: WebSocket, hub: Arc<NotificationHub>, user_id: Uuid) {
    let mut events = hub.subscribe(user_id).await;
    let (mut sink, mut stream) = socket.split();

    tracing::debug!("Notification stream opened for user {}", user_id);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let payload = match serde_json::to_string(&event) {
                        Ok(payload) => payload,
                        Err(e) => {
                            tracing::error!("Failed to serialize notification event: {}", e);
                            continue;
                        }
                    };

                    if sink.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "Notification stream for user {} lagged, {} event(s) dropped",
                        user_id,
                        skipped
                    );
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = stream.next() => match incoming {
                // Clients only listen on this channel; anything received
                // besides a close frame is ignored.
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(_)) => break,
            },
        }
    }

    tracing::debug!("Notification stream closed for user {}", user_id);
}
