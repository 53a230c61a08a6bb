//! Error types for verification tokens and the recovery flow
//!
//! Messages here are for logs and diagnostics. The presentation layer
//! decides what a caller actually gets to see.

use std::collections::HashMap;

use rc_shared::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Token codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The secure random source could not produce bytes; no token may be issued
    #[error("Entropy source unavailable: {message}")]
    EntropyUnavailable { message: String },

    #[error("Malformed token")]
    Malformed,
}

/// Outcomes of the recovery flow that are not a success
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecoveryError {
    #[error("Account not found")]
    AccountNotFound,

    #[error("Account deactivated")]
    AccountDeactivated,

    /// Wrong hash, wrong purpose, or no account holds the token
    #[error("Invalid verification token")]
    TokenInvalid,

    #[error("Verification token expired")]
    TokenExpired,

    #[error("Validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Persistence failure: {message}")]
    PersistenceFailure { message: String },

    #[error("Delivery failure: {message}")]
    DeliveryFailure { message: String },

    /// Token issuing or password hashing could not complete
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl RecoveryError {
    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            RecoveryError::AccountNotFound => error_codes::ACCOUNT_NOT_FOUND,
            RecoveryError::AccountDeactivated => error_codes::ACCOUNT_DEACTIVATED,
            RecoveryError::TokenInvalid => error_codes::TOKEN_INVALID,
            RecoveryError::TokenExpired => error_codes::TOKEN_EXPIRED,
            RecoveryError::ValidationFailed { .. } => error_codes::VALIDATION_ERROR,
            RecoveryError::PersistenceFailure { .. } => error_codes::PERSISTENCE_FAILURE,
            RecoveryError::DeliveryFailure { .. } => error_codes::DELIVERY_FAILURE,
            RecoveryError::Internal { .. } => error_codes::INTERNAL_ERROR,
        }
    }

    /// Invalid and expired tokens share one caller-facing outcome
    pub fn is_token_failure(&self) -> bool {
        matches!(self, RecoveryError::TokenInvalid | RecoveryError::TokenExpired)
    }

    /// Not-found and deactivated are the account-state outcomes of begin
    pub fn is_account_state(&self) -> bool {
        matches!(
            self,
            RecoveryError::AccountNotFound | RecoveryError::AccountDeactivated
        )
    }

    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        RecoveryError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<TokenError> for RecoveryError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => RecoveryError::TokenInvalid,
            TokenError::EntropyUnavailable { message } => RecoveryError::Internal {
                message: format!("cannot issue verification token: {}", message),
            },
        }
    }
}

impl IntoErrorResponse for RecoveryError {
    /// Caller-facing body; token failures collapse into one generic outcome
    /// and storage or internal details are not exposed
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            RecoveryError::TokenInvalid | RecoveryError::TokenExpired => ErrorResponse::new(
                error_codes::TOKEN_INVALID,
                "This recovery link is invalid or has expired",
            ),
            RecoveryError::ValidationFailed { field, message } => {
                let mut fields = HashMap::new();
                fields.insert(field.clone(), vec![message.clone()]);
                ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data")
                    .with_field_errors(fields)
            }
            RecoveryError::AccountNotFound => account_field_error("No account uses this email address"),
            RecoveryError::AccountDeactivated => account_field_error("This account has been deactivated"),
            RecoveryError::PersistenceFailure { .. }
            | RecoveryError::DeliveryFailure { .. }
            | RecoveryError::Internal { .. } => ErrorResponse::new(
                error_codes::INTERNAL_ERROR,
                "The request could not be completed, please try again later",
            ),
        }
    }
}

fn account_field_error(message: &str) -> ErrorResponse {
    let mut fields = HashMap::new();
    fields.insert("email".to_string(), vec![message.to_string()]);
    ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data").with_field_errors(fields)
}
