use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::notificationmodel::{Notification, NotificationKind};

#[derive(Debug, Deserialize)]
pub struct NotificationQueryDto {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub unread_only: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct MarkReadDto {
    pub notification_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Serialize)]
pub struct NotificationListDto {
    pub notifications: Vec<Notification>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct KindCountDto {
    pub kind: NotificationKind,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct NotificationAnalyticsDto {
    pub total: i64,
    pub unread: i64,
    pub urgent_unread: i64,
    pub by_kind: Vec<KindCountDto>,
}
