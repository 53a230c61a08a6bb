//! Email Module
//!
//! Recovery messages go out through an [`EmailService`] provider. The
//! [`EmailRecoveryNotifier`] adapts a provider to the core `Notifier` trait
//! and renders the confirm and cancel links.
//!
//! ## Providers
//!
//! - **Mock**: logs messages through tracing and keeps them for inspection
//! - **HTTP**: transactional email API (Brevo-compatible JSON body, `api-key` header)

use std::sync::Arc;

use rc_shared::EmailConfig;

use crate::InfrastructureError;

pub mod email_service;
pub mod http_email;
pub mod mock_email;
pub mod notifier;

// Re-export commonly used types
pub use email_service::{EmailMessage, EmailService};
pub use http_email::HttpEmailService;
pub use mock_email::MockEmailService;
pub use notifier::EmailRecoveryNotifier;


/// Create an email service based on configuration
pub fn create_email_service(config: &EmailConfig) -> Result<Arc<dyn EmailService>, InfrastructureError> {
    if cfg!(feature = "mock-services") {
        return Ok(Arc::new(MockEmailService::new()));
    }

    match config.provider.as_str() {
        "mock" => Ok(Arc::new(MockEmailService::new())),
        "http" => {
            if !config.is_http_configured() {
                return Err(InfrastructureError::Config(
                    "HTTP email provider requires api_key and sender_email".to_string(),
                ));
            }
            Ok(Arc::new(HttpEmailService::new(config.clone())?))
        }
        other => Err(InfrastructureError::Config(format!(
            "Unknown email provider: {}",
            other
        ))),
    }
}
