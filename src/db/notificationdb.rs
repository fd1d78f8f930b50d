// db/notificationdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::notificationmodel::*;

const NOTIFICATION_COLUMNS: &str = r#"
    id, recipient_user_id, sender_user_id, kind, title, message,
    job_id, proposal_id, contract_id, review_id, data,
    is_read, is_urgent, is_email_sent, email_attempts,
    created_at, read_at
"#;

#[async_trait]
pub trait NotificationExt {
    /// Outbox write. The row is the durable intent; email delivery is
    /// drained by the background worker.
    async fn insert_notification(&self, new: NewNotification) -> Result<Notification, Error>;

    async fn get_notifications(
        &self,
        recipient_user_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, Error>;

    async fn count_notifications(
        &self,
        recipient_user_id: Uuid,
        unread_only: bool,
    ) -> Result<i64, Error>;

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
        recipient_user_id: Uuid,
    ) -> Result<u64, Error>;

    async fn mark_all_notifications_read(&self, recipient_user_id: Uuid) -> Result<u64, Error>;

    async fn delete_notification(
        &self,
        notification_id: Uuid,
        recipient_user_id: Uuid,
    ) -> Result<u64, Error>;

    async fn count_notifications_by_kind(
        &self,
        recipient_user_id: Uuid,
    ) -> Result<Vec<(NotificationKind, i64)>, Error>;

    async fn count_urgent_unread(&self, recipient_user_id: Uuid) -> Result<i64, Error>;

    /// Rows still awaiting email delivery, oldest first. Rows that have
    /// exhausted max_attempts are left behind for operators to inspect.
    async fn get_pending_emails(
        &self,
        max_attempts: i32,
        limit: i64,
    ) -> Result<Vec<Notification>, Error>;

    async fn mark_email_sent(&self, notification_id: Uuid) -> Result<(), Error>;

    async fn record_email_attempt(&self, notification_id: Uuid) -> Result<(), Error>;
}

#[async_trait]
impl NotificationExt for DBClient {
    async fn insert_notification(&self, new: NewNotification) -> Result<Notification, Error> {
        sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications
                (recipient_user_id, sender_user_id, kind, title, message,
                 job_id, proposal_id, contract_id, review_id, data, is_urgent)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(new.recipient_user_id)
        .bind(new.sender_user_id)
        .bind(new.kind)
        .bind(new.title)
        .bind(new.message)
        .bind(new.job_id)
        .bind(new.proposal_id)
        .bind(new.contract_id)
        .bind(new.review_id)
        .bind(new.data)
        .bind(new.kind.is_urgent())
        .fetch_one(&self.pool)
        .await
    }

    async fn get_notifications(
        &self,
        recipient_user_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, Error> {
        sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notifications
            WHERE recipient_user_id = $1
              AND ($2 = FALSE OR is_read = FALSE)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(recipient_user_id)
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn count_notifications(
        &self,
        recipient_user_id: Uuid,
        unread_only: bool,
    ) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM notifications
            WHERE recipient_user_id = $1
              AND ($2 = FALSE OR is_read = FALSE)
            "#,
        )
        .bind(recipient_user_id)
        .bind(unread_only)
        .fetch_one(&self.pool)
        .await
    }

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
        recipient_user_id: Uuid,
    ) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE, read_at = NOW()
            WHERE id = $1 AND recipient_user_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(notification_id)
        .bind(recipient_user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn mark_all_notifications_read(&self, recipient_user_id: Uuid) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE, read_at = NOW()
            WHERE recipient_user_id = $1 AND is_read = FALSE
            "#,
        )
        .bind(recipient_user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_notification(
        &self,
        notification_id: Uuid,
        recipient_user_id: Uuid,
    ) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM notifications
            WHERE id = $1 AND recipient_user_id = $2
            "#,
        )
        .bind(notification_id)
        .bind(recipient_user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn count_notifications_by_kind(
        &self,
        recipient_user_id: Uuid,
    ) -> Result<Vec<(NotificationKind, i64)>, Error> {
        sqlx::query_as::<_, (NotificationKind, i64)>(
            r#"
            SELECT kind, COUNT(*)
            FROM notifications
            WHERE recipient_user_id = $1
            GROUP BY kind
            ORDER BY COUNT(*) DESC
            "#,
        )
        .bind(recipient_user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn count_urgent_unread(&self, recipient_user_id: Uuid) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM notifications
            WHERE recipient_user_id = $1 AND is_urgent = TRUE AND is_read = FALSE
            "#,
        )
        .bind(recipient_user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_pending_emails(
        &self,
        max_attempts: i32,
        limit: i64,
    ) -> Result<Vec<Notification>, Error> {
        sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notifications
            WHERE is_email_sent = FALSE AND email_attempts < $1
            ORDER BY created_at ASC
            LIMIT $2
            "#
        ))
        .bind(max_attempts)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn mark_email_sent(&self, notification_id: Uuid) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE notifications
            SET is_email_sent = TRUE
            WHERE id = $1
            "#,
        )
        .bind(notification_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn record_email_attempt(&self, notification_id: Uuid) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE notifications
            SET email_attempts = email_attempts + 1
            WHERE id = $1
            "#,
        )
        .bind(notification_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
