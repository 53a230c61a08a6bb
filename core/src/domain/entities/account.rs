//! Account entity representing a principal that can recover its credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::verification::VerificationRecord;

/// Account entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,

    /// Email address, stored normalized (trimmed, lowercase)
    pub email: String,

    /// bcrypt hash of the current password
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,

    /// False means the account is deactivated and must not be recovered
    pub login_allowed: bool,

    /// Pending verification, if any
    pub verification: Option<VerificationRecord>,

    /// Consecutive failed sign-in attempts
    pub failed_login_count: u32,

    /// Timestamp of the account's last successful sign-in
    pub last_login_at: Option<DateTime<Utc>>,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new, active account
    pub fn new(email: impl Into<String>, password_hash: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: rc_shared::validation::normalize_email(&email.into()),
            password_hash,
            login_allowed: true,
            verification: None,
            failed_login_count: 0,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a verification of any purpose is pending
    pub fn has_pending_verification(&self) -> bool {
        self.verification.is_some()
    }

    /// Replaces the password hash
    pub fn set_password_hash(&mut self, password_hash: String, now: DateTime<Utc>) {
        self.password_hash = Some(password_hash);
        self.updated_at = now;
    }

    /// Records a successful sign-in and resets the failed attempt counter
    pub fn record_successful_sign_in(&mut self, now: DateTime<Utc>) {
        self.last_login_at = Some(now);
        self.failed_login_count = 0;
        self.updated_at = now;
    }

    /// Deactivates the account
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.login_allowed = false;
        self.updated_at = now;
    }

    /// Marks the account as modified at `now`
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
