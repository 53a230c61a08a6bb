//! Configuration for the recovery service

use chrono::Duration;
use rc_shared::config::recovery::login_redirect_url;
use rc_shared::RecoveryConfig;

/// Configuration for the recovery service
#[derive(Debug, Clone)]
pub struct RecoveryServiceConfig {
    /// How long an issued token stays valid
    pub token_ttl: Duration,
    /// Sign the user in after a successful confirm
    pub login_after_recovery: bool,
    /// Minimum length of a new password
    pub min_password_length: usize,
    /// bcrypt cost for new password hashes
    pub password_hash_cost: u32,
    /// Origins an absolute return URL may point at
    pub allowed_return_origins: Vec<String>,
    /// Login page path
    pub login_path: String,
}

impl Default for RecoveryServiceConfig {
    fn default() -> Self {
        Self::from(&RecoveryConfig::default())
    }
}

impl From<&RecoveryConfig> for RecoveryServiceConfig {
    fn from(config: &RecoveryConfig) -> Self {
        Self {
            token_ttl: Duration::minutes(config.token_ttl_minutes),
            login_after_recovery: config.login_after_recovery,
            min_password_length: config.min_password_length,
            password_hash_cost: config.password_hash_cost,
            allowed_return_origins: config.allowed_return_origins.clone(),
            login_path: config.login_path.clone(),
        }
    }
}

impl RecoveryServiceConfig {
    /// Login page URL carrying the caller's return URL
    pub fn login_redirect(&self, return_url: Option<&str>) -> String {
        login_redirect_url(&self.login_path, return_url)
    }
}
