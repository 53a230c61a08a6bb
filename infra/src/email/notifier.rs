//! Recovery notifier backed by an email provider
//!
//! Adapts an [`EmailService`] to the core `Notifier` trait. The raw token
//! only appears inside the rendered links.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use rc_core::services::{Notifier, RecoveryMessage};

use super::email_service::{EmailMessage, EmailService};

const SUBJECT: &str = "Reset your password";

/// Adapter that implements the core Notifier trait over an email provider
pub struct EmailRecoveryNotifier {
    email_service: Arc<dyn EmailService>,
    public_base_url: String,
}

impl EmailRecoveryNotifier {
    pub fn new(email_service: Arc<dyn EmailService>, public_base_url: impl Into<String>) -> Self {
        Self {
            email_service,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn confirm_link(&self, raw_token: &str) -> String {
        format!("{}/recover/confirm?key={}", self.public_base_url, raw_token)
    }

    pub fn cancel_link(&self, raw_token: &str) -> String {
        format!("{}/recover/cancel?key={}", self.public_base_url, raw_token)
    }

    /// Render the plain-text and HTML bodies
    pub fn render(&self, message: &RecoveryMessage) -> EmailMessage {
        let confirm = self.confirm_link(&message.raw_token);
        let cancel = self.cancel_link(&message.raw_token);
        let expires = format_expiry(message.expires_at);

        let text_body = format!(
            "Someone asked to reset the password for this account.\n\n\
             To choose a new password, open:\n{}\n\n\
             This link expires at {}.\n\n\
             If you did not ask for this, cancel the request:\n{}\n",
            confirm, expires, cancel
        );

        let html_body = format!(
            "<p>Someone asked to reset the password for this account.</p>\
             <p><a href=\"{}\">Choose a new password</a></p>\
             <p>This link expires at {}.</p>\
             <p>If you did not ask for this, <a href=\"{}\">cancel the request</a>.</p>",
            confirm, expires, cancel
        );

        EmailMessage {
            to: message.email.clone(),
            subject: SUBJECT.to_string(),
            text_body,
            html_body: Some(html_body),
        }
    }
}

fn format_expiry(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[async_trait]
impl Notifier for EmailRecoveryNotifier {
    async fn send_recovery_message(&self, message: RecoveryMessage) -> Result<String, String> {
        let email = self.render(&message);
        self.email_service
            .send_email(&email)
            .await
            .map_err(|e| format!("{} provider: {}", self.email_service.provider_name(), e))
    }
}
