use super::sendmail::send_email;
use crate::{
    config::Config,
    models::notificationmodel::{Notification, NotificationKind},
};

/// Routes a notification to its email template. Kinds without a
/// dedicated template fall back to the generic one.
pub async fn send_notification_email(
    config: &Config,
    to_email: &str,
    username: &str,
    notification: &Notification,
) -> Result<(), String> {
    match notification.kind {
        NotificationKind::JobApproved | NotificationKind::JobRejected => {
            send_job_status_email(config, to_email, username, notification).await
        }
        NotificationKind::ContractCreated | NotificationKind::ContractStatusChanged => {
            send_contract_status_email(config, to_email, username, notification).await
        }
        NotificationKind::ChangeRequestProposed => {
            send_change_request_email(config, to_email, username, notification).await
        }
        NotificationKind::ChangeRequestApproved | NotificationKind::ChangeRequestRejected => {
            send_change_request_response_email(config, to_email, username, notification).await
        }
        NotificationKind::ReviewPending => {
            send_review_pending_email(config, to_email, username, notification).await
        }
        _ => send_generic_notification_email(config, to_email, username, notification).await,
    }
}

pub async fn send_generic_notification_email(
    config: &Config,
    to_email: &str,
    username: &str,
    notification: &Notification,
) -> Result<(), String> {
    let template_path = "src/mail/templates/Generic-Notification.html";
    let placeholders = vec![
        ("{{username}}".to_string(), username.to_string()),
        ("{{title}}".to_string(), notification.title.clone()),
        ("{{message}}".to_string(), notification.message.clone()),
        ("{{dashboard_url}}".to_string(), dashboard_url(config)),
    ];

    send_email(config, to_email, &notification.title, template_path, &placeholders).await
}

pub async fn send_job_status_email(
    config: &Config,
    to_email: &str,
    username: &str,
    notification: &Notification,
) -> Result<(), String> {
    let subject = match notification.kind {
        NotificationKind::JobApproved => "Your job is live",
        _ => "Your job was rejected",
    };

    let reason = notification
        .data
        .as_ref()
        .and_then(|data| data.get("reason"))
        .and_then(|value| value.as_str())
        .unwrap_or("")
        .to_string();

    let template_path = "src/mail/templates/Job-Status.html";
    let placeholders = vec![
        ("{{username}}".to_string(), username.to_string()),
        ("{{message}}".to_string(), notification.message.clone()),
        ("{{reason}}".to_string(), reason),
        ("{{dashboard_url}}".to_string(), dashboard_url(config)),
    ];

    send_email(config, to_email, subject, template_path, &placeholders).await
}

pub async fn send_contract_status_email(
    config: &Config,
    to_email: &str,
    username: &str,
    notification: &Notification,
) -> Result<(), String> {
    let status = notification
        .data
        .as_ref()
        .and_then(|data| data.get("status"))
        .and_then(|value| value.as_str())
        .unwrap_or("updated")
        .to_string();

    let template_path = "src/mail/templates/Contract-Status.html";
    let placeholders = vec![
        ("{{username}}".to_string(), username.to_string()),
        ("{{status}}".to_string(), status),
        ("{{message}}".to_string(), notification.message.clone()),
        ("{{dashboard_url}}".to_string(), dashboard_url(config)),
    ];

    send_email(config, to_email, &notification.title, template_path, &placeholders).await
}

pub async fn send_change_request_email(
    config: &Config,
    to_email: &str,
    username: &str,
    notification: &Notification,
) -> Result<(), String> {
    let subject = "Contract change proposed";

    let reason = notification
        .data
        .as_ref()
        .and_then(|data| data.get("reason"))
        .and_then(|value| value.as_str())
        .unwrap_or("")
        .to_string();

    let template_path = "src/mail/templates/Change-Request-Proposed.html";
    let placeholders = vec![
        ("{{username}}".to_string(), username.to_string()),
        ("{{reason}}".to_string(), reason),
        ("{{dashboard_url}}".to_string(), dashboard_url(config)),
    ];

    send_email(config, to_email, subject, template_path, &placeholders).await
}

pub async fn send_change_request_response_email(
    config: &Config,
    to_email: &str,
    username: &str,
    notification: &Notification,
) -> Result<(), String> {
    let (subject, outcome) = match notification.kind {
        NotificationKind::ChangeRequestApproved => ("Change request approved", "approved"),
        _ => ("Change request rejected", "rejected"),
    };

    let notes = notification
        .data
        .as_ref()
        .and_then(|data| data.get("response_notes"))
        .and_then(|value| value.as_str())
        .unwrap_or("")
        .to_string();

    let template_path = "src/mail/templates/Change-Request-Response.html";
    let placeholders = vec![
        ("{{username}}".to_string(), username.to_string()),
        ("{{outcome}}".to_string(), outcome.to_string()),
        ("{{response_notes}}".to_string(), notes),
        ("{{dashboard_url}}".to_string(), dashboard_url(config)),
    ];

    send_email(config, to_email, subject, template_path, &placeholders).await
}

pub async fn send_review_pending_email(
    config: &Config,
    to_email: &str,
    username: &str,
    notification: &Notification,
) -> Result<(), String> {
    let subject = "How did it go? Leave a review";

    let template_path = "src/mail/templates/Review-Pending.html";
    let placeholders = vec![
        ("{{username}}".to_string(), username.to_string()),
        ("{{message}}".to_string(), notification.message.clone()),
        ("{{dashboard_url}}".to_string(), dashboard_url(config)),
    ];

    send_email(config, to_email, subject, template_path, &placeholders).await
}

fn dashboard_url(config: &Config) -> String {
    format!("{}/dashboard", config.app_url)
}
