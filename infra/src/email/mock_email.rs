//! Mock Email Service Implementation
//!
//! Logs messages instead of sending them and keeps them in memory so tests
//! and local runs can read the links back.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use rc_shared::masking::mask_email;

use super::email_service::{EmailMessage, EmailService};
use crate::InfrastructureError;

/// Mock email service for development and testing
#[derive(Clone, Default)]
pub struct MockEmailService {
    /// Messages accepted so far
    outbox: Arc<Mutex<Vec<EmailMessage>>>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
}

impl MockEmailService {
    /// Create a new mock email service
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock service that rejects every message
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Messages accepted so far
    pub async fn sent_messages(&self) -> Vec<EmailMessage> {
        self.outbox.lock().await.clone()
    }

    /// Most recent message sent to `to`
    pub async fn last_message_to(&self, to: &str) -> Option<EmailMessage> {
        self.outbox
            .lock()
            .await
            .iter()
            .rev()
            .find(|m| m.to == to)
            .cloned()
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, message: &EmailMessage) -> Result<String, InfrastructureError> {
        if self.simulate_failure {
            tracing::warn!(to = %mask_email(&message.to), "Mock email service simulating failure");
            return Err(InfrastructureError::Email(
                "Mock email service: simulated failure".to_string(),
            ));
        }

        let message_id = format!("mock-{}", Uuid::new_v4());
        tracing::info!(
            to = %mask_email(&message.to),
            subject = %message.subject,
            message_id = %message_id,
            "Mock email accepted"
        );

        self.outbox.lock().await.push(message.clone());
        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
