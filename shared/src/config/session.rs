//! Session configuration for signing users in after a completed recovery

use serde::{Deserialize, Serialize};

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// Session token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Secret used to sign session tokens (HS256)
    pub secret: String,

    /// Issuer claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Session lifetime in minutes
    #[serde(default = "default_expiry_minutes")]
    pub expiry_minutes: i64,

    /// Name of the cookie carrying the session token
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Mark the session cookie as HTTPS only
    #[serde(default)]
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            issuer: default_issuer(),
            expiry_minutes: default_expiry_minutes(),
            cookie_name: default_cookie_name(),
            secure_cookie: false,
        }
    }
}

impl SessionConfig {
    /// Create a new session configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

fn default_issuer() -> String {
    String::from("reclaim")
}

fn default_expiry_minutes() -> i64 {
    60
}

fn default_cookie_name() -> String {
    String::from("reclaim_session")
}
