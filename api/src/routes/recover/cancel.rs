use actix_web::{web, HttpRequest, HttpResponse};

use rc_core::repositories::AccountRepository;

use super::AppState;
use crate::dto::{CancelRecoveryResponse, TokenQuery};
use crate::handlers::{recovery_error_response, request_id, success_json};

/// Handler for GET /api/v1/recover/cancel?key=...
///
/// Discards the pending recovery. Works for an expired link too, so a user
/// who did not ask for the email can always void it.
pub async fn cancel_recovery<R>(
    req: HttpRequest,
    state: web::Data<AppState<R>>,
    query: web::Query<TokenQuery>,
) -> HttpResponse
where
    R: AccountRepository + 'static,
{
    let request_id = request_id(&req);

    match state.recovery_service.cancel(&query.key).await {
        Ok(outcome) => {
            tracing::info!(
                request_id = %request_id,
                account_id = %outcome.account_id,
                "Password recovery cancelled"
            );
            success_json(
                HttpResponse::Ok(),
                CancelRecoveryResponse {
                    redirect_to: outcome.redirect_to,
                },
                &request_id,
            )
        }
        Err(error) => recovery_error_response(&error, &request_id),
    }
}
