//! Email Service Interface

use async_trait::async_trait;

use crate::InfrastructureError;

/// A rendered email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
}

/// Email service trait for sending messages
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Send a message
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Provider identifier for the accepted message
    /// * `Err(InfrastructureError)` - If sending fails
    async fn send_email(&self, message: &EmailMessage) -> Result<String, InfrastructureError>;

    /// Name of the provider (e.g., "Mock", "HTTP")
    fn provider_name(&self) -> &str;
}
