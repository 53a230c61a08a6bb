//! Account recovery configuration

use serde::{Deserialize, Serialize};

/// Settings for the password recovery flow
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecoveryConfig {
    /// Lifetime of a recovery token in minutes
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,

    /// Sign the user in right after a successful password reset
    #[serde(default)]
    pub login_after_recovery: bool,

    /// Answer begin requests for unknown or deactivated accounts exactly like
    /// successful ones
    #[serde(default = "default_conceal_account_state")]
    pub conceal_account_state: bool,

    /// Minimum length of a new password
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    /// bcrypt cost used for the new password hash
    #[serde(default = "default_password_hash_cost")]
    pub password_hash_cost: u32,

    /// Public base URL used to build links in recovery emails
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Origins an absolute return URL may point at
    #[serde(default)]
    pub allowed_return_origins: Vec<String>,

    /// Path of the login page callers are sent to after recovery
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            token_ttl_minutes: default_token_ttl_minutes(),
            login_after_recovery: false,
            conceal_account_state: default_conceal_account_state(),
            min_password_length: default_min_password_length(),
            password_hash_cost: default_password_hash_cost(),
            public_base_url: default_public_base_url(),
            allowed_return_origins: vec![],
            login_path: default_login_path(),
        }
    }
}

impl RecoveryConfig {
    /// Build the login redirect carrying the caller's return URL
    pub fn login_redirect(&self, return_url: Option<&str>) -> String {
        login_redirect_url(&self.login_path, return_url)
    }
}

/// Login page URL with an optional `returnUrl` query parameter
pub fn login_redirect_url(login_path: &str, return_url: Option<&str>) -> String {
    match return_url {
        Some(url) if !url.is_empty() => {
            format!("{}?returnUrl={}", login_path, percent_encode(url))
        }
        _ => login_path.to_string(),
    }
}

/// Minimal query component encoding for redirect targets
fn percent_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

fn default_token_ttl_minutes() -> i64 {
    60
}

fn default_conceal_account_state() -> bool {
    true
}

fn default_min_password_length() -> usize {
    6
}

fn default_password_hash_cost() -> u32 {
    12
}

fn default_public_base_url() -> String {
    String::from("http://localhost:8080")
}

fn default_login_path() -> String {
    String::from("/login")
}
