// service/background_jobs.rs
use std::sync::Arc;

use tokio::time::{interval, Duration};

use crate::{
    db::{notificationdb::NotificationExt, userdb::UserExt},
    mail::mails,
    AppState,
};

/// Drains the notification outbox on an interval. Email is the only
/// delivery that retries; the notification row itself committed with the
/// primary operation, so nothing is lost when an SMTP attempt fails.
pub async fn start_email_dispatch_worker(app_state: Arc<AppState>) {
    let period = Duration::from_secs(app_state.env.email_worker_interval_secs.max(1));
    let mut ticker = interval(period);

    tracing::info!(
        "Email dispatch worker running every {}s",
        period.as_secs()
    );

    loop {
        ticker.tick().await;

        match drain_email_outbox(&app_state).await {
            Ok(0) => {}
            Ok(sent) => tracing::info!("Email worker delivered {} notification(s)", sent),
            Err(e) => tracing::error!("Email outbox drain failed: {}", e),
        }
    }
}

/// One pass over the outbox. Rows whose kind is on the skip-list are
/// marked sent without dispatching; rows that exhaust the attempt budget
/// stop being picked up and stay visible for operators.
pub async fn drain_email_outbox(app_state: &AppState) -> Result<usize, sqlx::Error> {
    let max_attempts = app_state.env.email_max_retries.max(1) as i32;
    let pending = app_state
        .db_client
        .get_pending_emails(max_attempts, 50)
        .await?;

    let mut sent = 0;

    for notification in pending {
        if notification.kind.skips_email() {
            app_state.db_client.mark_email_sent(notification.id).await?;
            continue;
        }

        app_state
            .db_client
            .record_email_attempt(notification.id)
            .await?;

        let recipient = app_state
            .db_client
            .get_user(Some(notification.recipient_user_id), None, None)
            .await?;

        let recipient = match recipient {
            Some(user) => user,
            None => {
                // Recipient deleted since the notification was written.
                app_state.db_client.mark_email_sent(notification.id).await?;
                continue;
            }
        };

        match mails::send_notification_email(
            &app_state.env,
            &recipient.email,
            &recipient.name,
            &notification,
        )
        .await
        {
            Ok(()) => {
                app_state.db_client.mark_email_sent(notification.id).await?;
                sent += 1;
            }
            Err(e) => {
                tracing::warn!(
                    "Email for notification {} (kind {}) failed: {}",
                    notification.id,
                    notification.kind.to_str(),
                    e
                );
            }
        }
    }

    Ok(sent)
}
