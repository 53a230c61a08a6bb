//! Outbound email configuration

use serde::{Deserialize, Serialize};

/// Email delivery settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// Provider: "mock" logs messages, "http" posts to a transactional email API
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Endpoint of the transactional email API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API key sent in the `api-key` header
    #[serde(default)]
    pub api_key: String,

    /// Sender address
    #[serde(default = "default_sender_email")]
    pub sender_email: String,

    /// Sender display name
    #[serde(default)]
    pub sender_name: Option<String>,

    /// Maximum retry attempts for failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial retry delay in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Timeout for API requests in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_url: default_api_url(),
            api_key: String::new(),
            sender_email: default_sender_email(),
            sender_name: None,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl EmailConfig {
    /// Whether the HTTP provider has the credentials it needs
    pub fn is_http_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.sender_email.trim().is_empty()
    }
}

fn default_provider() -> String {
    String::from("mock")
}

fn default_api_url() -> String {
    String::from("https://api.brevo.com/v3/smtp/email")
}

fn default_sender_email() -> String {
    String::from("no-reply@localhost")
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    10
}
