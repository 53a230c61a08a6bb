//! Pending verification embedded in an account record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a pending verification is allowed to be used for
///
/// The purpose is implied by the endpoint a token is presented to, never
/// carried inside the token itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationPurpose {
    /// Forgotten password recovery
    ResetPassword,
    /// Confirmation of a newly registered account
    ConfirmAccount,
    /// Confirmation of a changed email address
    ChangeEmail,
}

impl VerificationPurpose {
    /// Stable string form used for persistence
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationPurpose::ResetPassword => "reset_password",
            VerificationPurpose::ConfirmAccount => "confirm_account",
            VerificationPurpose::ChangeEmail => "change_email",
        }
    }
}

impl fmt::Display for VerificationPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reset_password" => Ok(VerificationPurpose::ResetPassword),
            "confirm_account" => Ok(VerificationPurpose::ConfirmAccount),
            "change_email" => Ok(VerificationPurpose::ChangeEmail),
            other => Err(format!("Unknown verification purpose: {}", other)),
        }
    }
}

/// At most one pending verification per account
///
/// Only the hash of the issued token is kept. The raw token exists solely in
/// the message delivered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Lowercase hex SHA-256 of the raw token
    pub key_hash: String,

    /// What the token may be used for
    pub purpose: VerificationPurpose,

    /// Instant from which the token is no longer accepted
    pub expires_at: DateTime<Utc>,

    /// Opaque payload carried unmodified from issue to consumption
    pub storage: Option<String>,

    /// When the token was issued
    pub sent_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Whether the record is expired at `now` (expiry instant inclusive)
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_purpose_round_trips_through_str() {
        for purpose in [
            VerificationPurpose::ResetPassword,
            VerificationPurpose::ConfirmAccount,
            VerificationPurpose::ChangeEmail,
        ] {
            assert_eq!(purpose.as_str().parse::<VerificationPurpose>().unwrap(), purpose);
        }
        assert!("verify_phone".parse::<VerificationPurpose>().is_err());
    }

    #[test]
    fn test_expiry_instant_is_exclusive() {
        let now = Utc::now();
        let record = VerificationRecord {
            key_hash: "00".to_string(),
            purpose: VerificationPurpose::ResetPassword,
            expires_at: now,
            storage: None,
            sent_at: now - Duration::minutes(60),
        };

        assert!(!record.is_expired_at(now - Duration::milliseconds(1)));
        assert!(record.is_expired_at(now));
        assert!(record.is_expired_at(now + Duration::seconds(1)));
    }
}
