//! Recovery service module for self-service password reset
//!
//! This module drives the recovery state machine:
//! - Begin: issue a reset token, persist it, deliver it out-of-band
//! - Preview: check a presented token without consuming it
//! - Confirm: consume the token and replace the password
//! - Cancel: consume the token without touching the password

mod config;
mod service;
mod traits;
mod types;


pub use config::RecoveryServiceConfig;
pub use service::RecoveryService;
pub use traits::{Authenticator, Notifier};
pub use types::{
    BeginOutcome, CancelOutcome, ConfirmOutcome, ConfirmPreview, RecoveryMessage, SessionTicket,
};
