// service/realtime.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::models::notificationmodel::{Notification, NotificationKind};

/// Event pushed to a recipient's live channel when a notification is
/// created for them.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub notification_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub job_id: Option<Uuid>,
    pub contract_id: Option<Uuid>,
    pub is_urgent: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Notification> for NotificationEvent {
    fn from(notification: &Notification) -> Self {
        NotificationEvent {
            notification_id: notification.id,
            kind: notification.kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            job_id: notification.job_id,
            contract_id: notification.contract_id,
            is_urgent: notification.is_urgent.unwrap_or(false),
            created_at: notification.created_at,
        }
    }
}

/// Per-user fan-out hub. Delivery is fire-and-forget: no acknowledgment,
/// no ordering across recipients, lagging subscribers drop events.
#[derive(Debug)]
pub struct NotificationHub {
    channels: Arc<RwLock<HashMap<Uuid, broadcast::Sender<NotificationEvent>>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn get_or_create_channel(&self, user_id: Uuid) -> broadcast::Sender<NotificationEvent> {
        let mut channels = self.channels.write().await;

        if let Some(sender) = channels.get(&user_id) {
            return sender.clone();
        }

        let (sender, _) = broadcast::channel(100);
        channels.insert(user_id, sender.clone());
        sender
    }

    /// Subscribe a WebSocket connection to a user's channel.
    pub async fn subscribe(&self, user_id: Uuid) -> broadcast::Receiver<NotificationEvent> {
        let sender = self.get_or_create_channel(user_id).await;
        sender.subscribe()
    }

    /// Best-effort publish. A user with no open connections simply
    /// misses the live event; the notification row is still there.
    pub async fn publish(&self, user_id: Uuid, event: NotificationEvent) {
        let sender = {
            let channels = self.channels.read().await;
            channels.get(&user_id).cloned()
        };

        if let Some(sender) = sender {
            match sender.send(event) {
                Ok(n) => tracing::debug!("Pushed realtime event to {} connection(s)", n),
                Err(_) => tracing::debug!("No live connections for user {}", user_id),
            }
        }
    }

    /// Number of users with an open channel, for monitoring.
    pub async fn connected_users(&self) -> usize {
        let channels = self.channels.read().await;
        channels
            .values()
            .filter(|sender| sender.receiver_count() > 0)
            .count()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(title: &str) -> NotificationEvent {
        NotificationEvent {
            notification_id: Uuid::new_v4(),
            kind: NotificationKind::ChangeRequestProposed,
            title: title.to_string(),
            message: "msg".to_string(),
            job_id: None,
            contract_id: Some(Uuid::new_v4()),
            is_urgent: true,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let hub = NotificationHub::new();
        let user_id = Uuid::new_v4();

        let mut rx = hub.subscribe(user_id).await;
        hub.publish(user_id, event("hello")).await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received.title, "hello");
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_noop() {
        let hub = NotificationHub::new();
        hub.publish(Uuid::new_v4(), event("dropped")).await;
    }

    #[tokio::test]
    async fn events_do_not_cross_users() {
        let hub = NotificationHub::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let mut alice_rx = hub.subscribe(alice).await;
        let mut bob_rx = hub.subscribe(bob).await;

        hub.publish(alice, event("for alice")).await;

        assert_eq!(alice_rx.recv().await.unwrap().title, "for alice");
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn connected_users_counts_live_receivers() {
        let hub = NotificationHub::new();
        let user_id = Uuid::new_v4();
        assert_eq!(hub.connected_users().await, 0);

        let rx = hub.subscribe(user_id).await;
        assert_eq!(hub.connected_users().await, 1);

        drop(rx);
        assert_eq!(hub.connected_users().await, 0);
    }
}
