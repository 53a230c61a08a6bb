//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// bcrypt only looks at the first 72 bytes of its input
pub const MAX_PASSWORD_BYTES: usize = 72;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$").unwrap()
});

/// Validation error with field-level details
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

/// Check if an email address is well formed
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Normalize an email address for lookups (trimmed, lowercase)
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Domain part of an email address, used as a provider hint
pub fn email_domain(email: &str) -> Option<&str> {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
}

/// Check a new password against the strength rules
///
/// Rules: at least `min_length` characters, at most [`MAX_PASSWORD_BYTES`]
/// bytes, and at least one letter and one digit.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), ValidationError> {
    if password.chars().count() < min_length {
        return Err(ValidationError::new(
            "password",
            format!("Password must be at least {} characters", min_length),
            "too_short",
        ));
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new(
            "password",
            format!("Password must be at most {} bytes", MAX_PASSWORD_BYTES),
            "too_long",
        ));
    }

    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(ValidationError::new(
            "password",
            "Password must contain at least one letter and one digit",
            "too_weak",
        ));
    }

    Ok(())
}

/// Check that a post-recovery return URL cannot redirect off-site
///
/// Relative paths (`/app`) are accepted, protocol-relative (`//host`) and
/// backslash tricks are not. Absolute URLs must start with one of
/// `allowed_origins`.
pub fn is_safe_return_url(url: &str, allowed_origins: &[String]) -> bool {
    if url.is_empty() || url.chars().any(|c| c.is_control() || c == '\\') {
        return false;
    }

    if url.starts_with('/') {
        return !url.starts_with("//");
    }

    allowed_origins.iter().any(|origin| {
        let origin = origin.trim_end_matches('/');
        !origin.is_empty()
            && (url == origin
                || url
                    .strip_prefix(origin)
                    .map(|rest| rest.starts_with('/') || rest.starts_with('?'))
                    .unwrap_or(false))
    })
}
