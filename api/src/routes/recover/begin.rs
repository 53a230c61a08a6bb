use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use rc_core::repositories::AccountRepository;
use rc_shared::masking::mask_email;
use rc_shared::validation::{email_domain, normalize_email};

use super::AppState;
use crate::dto::{BeginRecoveryRequest, BeginRecoveryResponse};
use crate::handlers::{recovery_error_response, request_id, success_json, validation_error_response};

/// Handler for POST /api/v1/recover
///
/// Starts a password recovery and emails a link to the account's address.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "user@example.com",
///     "return_url": "/settings"
/// }
/// ```
///
/// # Response
///
/// ## Accepted (202)
/// ```json
/// {
///     "success": true,
///     "data": {
///         "message": "If an account exists for this address, a recovery link has been sent",
///         "provider": "example.com"
///     },
///     "timestamp": "2025-08-14T10:00:00Z",
///     "request_id": "550e8400-e29b-41d4-a716-446655440000"
/// }
/// ```
///
/// With `conceal_account_state` on, unknown and deactivated accounts get the
/// same 202. Otherwise they answer 422 with a field error on `email`.
pub async fn begin_recovery<R>(
    req: HttpRequest,
    state: web::Data<AppState<R>>,
    request: web::Json<BeginRecoveryRequest>,
) -> HttpResponse
where
    R: AccountRepository + 'static,
{
    let request_id = request_id(&req);
    let request = request.into_inner();

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors, &request_id);
    }

    tracing::info!(
        request_id = %request_id,
        email = %mask_email(&request.email),
        "Processing begin recovery request"
    );

    match state
        .recovery_service
        .begin(&request.email, request.return_url.as_deref())
        .await
    {
        Ok(outcome) => success_json(
            HttpResponse::Accepted(),
            BeginRecoveryResponse::accepted(outcome.provider),
            &request_id,
        ),
        Err(error) if error.is_account_state() && state.conceal_account_state => {
            let email = normalize_email(&request.email);
            success_json(
                HttpResponse::Accepted(),
                BeginRecoveryResponse::accepted(email_domain(&email).map(str::to_string)),
                &request_id,
            )
        }
        Err(error) => recovery_error_response(&error, &request_id),
    }
}
