//! HTTP transactional email API provider
//!
//! Posts a Brevo-compatible JSON body with the API key in the `api-key`
//! header. Rate-limited and server-side failures are retried with
//! exponential backoff; other client errors are not.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use rc_shared::masking::{mask_email, mask_secret};
use rc_shared::EmailConfig;

use super::email_service::{EmailMessage, EmailService};
use crate::InfrastructureError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody<'a> {
    sender: EmailAddress<'a>,
    to: Vec<EmailAddress<'a>>,
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_content: Option<&'a str>,
    text_content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailResponse {
    message_id: Option<String>,
}

/// HTTP email service
pub struct HttpEmailService {
    client: Client,
    config: EmailConfig,
}

impl HttpEmailService {
    /// Create a new HTTP email service
    pub fn new(config: EmailConfig) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        tracing::info!(
            api_url = %config.api_url,
            api_key = %mask_secret(&config.api_key),
            "HTTP email provider configured"
        );

        Ok(Self { client, config })
    }

    fn body<'a>(&'a self, message: &'a EmailMessage) -> SendEmailBody<'a> {
        SendEmailBody {
            sender: EmailAddress {
                email: &self.config.sender_email,
                name: self.config.sender_name.as_deref(),
            },
            to: vec![EmailAddress {
                email: &message.to,
                name: None,
            }],
            subject: &message.subject,
            html_content: message.html_body.as_deref(),
            text_content: &message.text_body,
        }
    }

    /// Send with retry logic
    async fn send_with_retry(&self, message: &EmailMessage) -> Result<String, InfrastructureError> {
        let max_attempts = self.config.max_retries.max(1);
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);
        let body = self.body(message);

        loop {
            attempts += 1;

            tracing::debug!(
                attempt = attempts,
                max_attempts = max_attempts,
                to = %mask_email(&message.to),
                "Sending email"
            );

            let result = self
                .client
                .post(&self.config.api_url)
                .header("api-key", &self.config.api_key)
                .header("Accept", "application/json")
                .json(&body)
                .send()
                .await;

            let failure = match result {
                Ok(response) if response.status().is_success() => {
                    let parsed: SendEmailResponse = response.json().await.unwrap_or_default();
                    let message_id = parsed.message_id.unwrap_or_else(|| "accepted".to_string());
                    tracing::info!(
                        to = %mask_email(&message.to),
                        message_id = %message_id,
                        "Email accepted by provider"
                    );
                    return Ok(message_id);
                }
                Ok(response) => {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    if !is_retryable(status) {
                        return Err(InfrastructureError::Email(format!(
                            "Email provider rejected request (status={}): {}",
                            status, text
                        )));
                    }
                    format!("status={}: {}", status, text)
                }
                Err(e) => e.to_string(),
            };

            tracing::warn!(
                attempt = attempts,
                max_attempts = max_attempts,
                error = %failure,
                "Email send attempt failed"
            );

            if attempts >= max_attempts {
                return Err(InfrastructureError::Email(format!(
                    "Failed to send email after {} attempts: {}",
                    attempts, failure
                )));
            }

            tokio::time::sleep(delay).await;
            delay *= 2;
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[async_trait]
impl EmailService for HttpEmailService {
    async fn send_email(&self, message: &EmailMessage) -> Result<String, InfrastructureError> {
        self.send_with_retry(message).await
    }

    fn provider_name(&self) -> &str {
        "HTTP"
    }
}
