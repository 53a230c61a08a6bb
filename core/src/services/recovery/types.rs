//! Types for recovery service results

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// What the notifier is asked to deliver
#[derive(Clone)]
pub struct RecoveryMessage {
    /// Recipient address
    pub email: String,
    /// Raw token to embed in the confirm and cancel links
    pub raw_token: String,
    /// When the token stops working
    pub expires_at: DateTime<Utc>,
    /// Where the user asked to land after recovery
    pub return_url: Option<String>,
}

impl std::fmt::Debug for RecoveryMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryMessage")
            .field("email", &rc_shared::masking::mask_email(&self.email))
            .field("raw_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("return_url", &self.return_url)
            .finish()
    }
}

/// Result of beginning a recovery
#[derive(Debug, Clone)]
pub struct BeginOutcome {
    /// Account the token was issued for
    pub account_id: Uuid,
    /// Email domain, for a "check your inbox at ..." hint
    pub provider: Option<String>,
    /// The caller's return URL, echoed back
    pub return_url: Option<String>,
    /// When the issued token expires
    pub expires_at: DateTime<Utc>,
    /// Whether the notifier accepted the message
    pub delivered: bool,
}

/// Result of checking a token without consuming it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPreview {
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Session issued by the authenticator
#[derive(Clone, PartialEq, Eq)]
pub struct SessionTicket {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for SessionTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTicket")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Result of a successful confirm
#[derive(Debug, Clone)]
pub struct ConfirmOutcome {
    pub account_id: Uuid,
    /// Return URL stored when the recovery began
    pub return_url: Option<String>,
    /// Where to send the user next
    pub redirect_to: String,
    /// Present when the user was signed in
    pub session: Option<SessionTicket>,
}

impl ConfirmOutcome {
    pub fn signed_in(&self) -> bool {
        self.session.is_some()
    }
}

/// Result of a successful cancel
#[derive(Debug, Clone)]
pub struct CancelOutcome {
    pub account_id: Uuid,
    /// Return URL stored when the recovery began
    pub return_url: Option<String>,
    /// Login page carrying the return URL
    pub redirect_to: String,
}
