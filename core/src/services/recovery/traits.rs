//! Collaborator traits for token delivery and session establishment

use async_trait::async_trait;

use crate::domain::entities::Account;

use super::types::{RecoveryMessage, SessionTicket};

/// Out-of-band delivery of recovery tokens (e.g. email)
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a recovery message; returns the provider's message id
    async fn send_recovery_message(&self, message: RecoveryMessage) -> Result<String, String>;
}

/// Session establishment after a completed recovery
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Issue a session for the account
    async fn sign_in(&self, account: &Account) -> Result<SessionTicket, String>;
}
