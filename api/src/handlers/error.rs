//! Mapping of recovery errors to HTTP responses
//!
//! The body comes from the error's `IntoErrorResponse` rendering, so
//! expired and invalid tokens are indistinguishable to the caller. The
//! distinct kind is kept in the log line.

use std::collections::HashMap;

use actix_web::{http::StatusCode, HttpResponse};
use rc_core::errors::RecoveryError;
use rc_shared::{error_codes, ErrorResponse, IntoErrorResponse};
use validator::ValidationErrors;

/// HTTP status for a recovery error
pub fn status_for(error: &RecoveryError) -> StatusCode {
    match error {
        RecoveryError::TokenInvalid | RecoveryError::TokenExpired => StatusCode::BAD_REQUEST,
        RecoveryError::ValidationFailed { .. }
        | RecoveryError::AccountNotFound
        | RecoveryError::AccountDeactivated => StatusCode::UNPROCESSABLE_ENTITY,
        RecoveryError::PersistenceFailure { .. }
        | RecoveryError::DeliveryFailure { .. }
        | RecoveryError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render a recovery error
pub fn recovery_error_response(error: &RecoveryError, request_id: &str) -> HttpResponse {
    let status = status_for(error);
    if status.is_server_error() {
        tracing::error!(
            request_id = %request_id,
            error_code = error.error_code(),
            error = %error,
            "Recovery request failed"
        );
    } else {
        tracing::info!(
            request_id = %request_id,
            error_code = error.error_code(),
            "Recovery request rejected"
        );
    }

    HttpResponse::build(status).json(error.to_error_response().add_detail("request_id", request_id))
}

/// Render `validator` failures as field errors
pub fn validation_error_response(errors: &ValidationErrors, request_id: &str) -> HttpResponse {
    let mut fields = HashMap::new();
    for (field, errors) in errors.field_errors() {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        fields.insert(field.to_string(), messages);
    }

    tracing::info!(request_id = %request_id, fields = ?fields.keys().collect::<Vec<_>>(), "Request validation failed");

    HttpResponse::UnprocessableEntity().json(
        ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data")
            .with_field_errors(fields)
            .add_detail("request_id", request_id),
    )
}

/// Single field error
pub fn field_error_response(field: &str, message: &str, request_id: &str) -> HttpResponse {
    let mut fields = HashMap::new();
    fields.insert(field.to_string(), vec![message.to_string()]);

    HttpResponse::UnprocessableEntity().json(
        ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data")
            .with_field_errors(fields)
            .add_detail("request_id", request_id),
    )
}

/// Fallback for unknown routes
pub fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
