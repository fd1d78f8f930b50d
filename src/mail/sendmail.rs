use std::fs;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tokio::time::{sleep, Duration};

use crate::config::Config;

pub async fn send_email(
    config: &Config,
    to_email: &str,
    subject: &str,
    template_path: &str,
    placeholders: &[(String, String)],
) -> Result<(), String> {
    // Validate inputs
    if to_email.is_empty() {
        return Err("Email recipient cannot be empty".to_string());
    }
    if !to_email.contains('@') {
        return Err(format!("Invalid email address: {}", to_email));
    }

    // Read and process template
    let mut html_template = match fs::read_to_string(template_path) {
        Ok(content) => content,
        Err(e) => {
            tracing::error!("Failed to read email template {}: {}", template_path, e);
            return Err(format!("Template not found: {}", template_path));
        }
    };

    for (key, value) in placeholders {
        html_template = html_template.replace(key, value);
    }

    // Send with retries
    send_with_retries(config, to_email, subject, &html_template).await
}

async fn send_with_retries(
    config: &Config,
    to_email: &str,
    subject: &str,
    html_body: &str,
) -> Result<(), String> {
    let max_retries = config.email_max_retries.max(1);
    let mut last_error = None;

    for attempt in 1..=max_retries {
        match send_via_smtp(config, to_email, subject, html_body).await {
            Ok(()) => {
                tracing::info!("Email sent to {} (attempt {})", to_email, attempt);
                return Ok(());
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < max_retries {
                    let delay = config.email_retry_delay_ms * (2_u64.pow(attempt - 1)); // Exponential backoff
                    tracing::warn!(
                        "Email send attempt {} failed for {}. Retrying in {}ms...",
                        attempt,
                        to_email,
                        delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }

    let error_msg = last_error
        .map(|e| format!("Failed after {} retries: {}", max_retries, e))
        .unwrap_or_else(|| "Unknown email sending error".to_string());

    tracing::error!("Email failed for {}: {}", to_email, error_msg);
    Err(error_msg)
}

async fn send_via_smtp(
    config: &Config,
    to_email: &str,
    subject: &str,
    html_body: &str,
) -> Result<(), String> {
    let email = Message::builder()
        .from(
            config
                .smtp_from
                .parse()
                .map_err(|e| format!("Invalid sender address: {}", e))?,
        )
        .to(to_email
            .parse()
            .map_err(|e| format!("Invalid recipient address: {}", e))?)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html_body.to_string())
        .map_err(|e| format!("Failed to build email: {}", e))?;

    let host = config.smtp_host.clone();
    let port = config.smtp_port;
    let username = config.smtp_username.clone();
    let password = config.smtp_password.clone();

    // lettre's SmtpTransport is blocking; keep it off the async workers.
    tokio::task::spawn_blocking(move || {
        let mut builder = SmtpTransport::relay(&host)
            .map_err(|e| format!("SMTP relay error: {}", e))?
            .port(port);

        if !username.is_empty() {
            builder = builder.credentials(Credentials::new(username, password));
        }

        let mailer = builder.build();
        mailer
            .send(&email)
            .map(|_| ())
            .map_err(|e| format!("SMTP send error: {}", e))
    })
    .await
    .map_err(|e| format!("Email task failed: {}", e))?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/worknest".to_string(),
            redis_url: None,
            app_url: "http://localhost:8000".to_string(),
            jwt_secret: "secret".to_string(),
            jwt_maxage: 60,
            port: 8000,
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: "".to_string(),
            smtp_password: "".to_string(),
            smtp_from: "Worknest <noreply@worknest.app>".to_string(),
            email_max_retries: 1,
            email_retry_delay_ms: 1,
            email_worker_interval_secs: 15,
        }
    }

    #[tokio::test]
    async fn rejects_empty_recipient() {
        let result = send_email(&test_config(), "", "subject", "missing.html", &[]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn rejects_recipient_without_at_sign() {
        let result = send_email(&test_config(), "not-an-address", "subject", "missing.html", &[]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn surfaces_missing_template() {
        let result = send_email(
            &test_config(),
            "user@example.com",
            "subject",
            "src/mail/templates/Does-Not-Exist.html",
            &[],
        )
        .await;
        assert!(result.unwrap_err().contains("Template not found"));
    }
}
