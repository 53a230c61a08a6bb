use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use validator::Validate;

use rc_core::repositories::AccountRepository;
use rc_core::services::SessionTicket;
use rc_shared::SessionConfig;

use super::AppState;
use crate::dto::{ConfirmPreviewResponse, ConfirmRecoveryRequest, ConfirmRecoveryResponse, TokenQuery};
use crate::handlers::{
    field_error_response, recovery_error_response, request_id, success_json,
    validation_error_response,
};

/// Handler for GET /api/v1/recover/confirm?key=...
///
/// Checks the link without consuming it and returns the account email, so
/// the reset form can show which account is being recovered.
pub async fn preview_recovery<R>(
    req: HttpRequest,
    state: web::Data<AppState<R>>,
    query: web::Query<TokenQuery>,
) -> HttpResponse
where
    R: AccountRepository + 'static,
{
    let request_id = request_id(&req);

    match state.recovery_service.preview(&query.key).await {
        Ok(preview) => success_json(
            HttpResponse::Ok(),
            ConfirmPreviewResponse {
                email: preview.email,
                expires_at: preview.expires_at,
            },
            &request_id,
        ),
        Err(error) => recovery_error_response(&error, &request_id),
    }
}

/// Handler for POST /api/v1/recover/confirm?key=...
///
/// # Request Body
///
/// ```json
/// {
///     "password": "new-secret-1",
///     "password_confirmation": "new-secret-1"
/// }
/// ```
///
/// Answers 200 with `{redirect_to, signed_in}`. When the user was signed
/// in, the session token is set as an HTTP-only cookie.
pub async fn confirm_recovery<R>(
    req: HttpRequest,
    state: web::Data<AppState<R>>,
    query: web::Query<TokenQuery>,
    request: web::Json<ConfirmRecoveryRequest>,
) -> HttpResponse
where
    R: AccountRepository + 'static,
{
    let request_id = request_id(&req);

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors, &request_id);
    }
    if !request.confirmation_matches() {
        return field_error_response(
            "password_confirmation",
            "Password confirmation does not match",
            &request_id,
        );
    }

    let outcome = match state
        .recovery_service
        .confirm(&query.key, &request.password)
        .await
    {
        Ok(outcome) => outcome,
        Err(error) => return recovery_error_response(&error, &request_id),
    };

    tracing::info!(
        request_id = %request_id,
        account_id = %outcome.account_id,
        signed_in = outcome.signed_in(),
        "Password recovery completed"
    );

    let mut builder = HttpResponse::Ok();
    if let Some(session) = &outcome.session {
        builder.cookie(session_cookie(&state.session, session));
    }

    let signed_in = outcome.signed_in();
    success_json(
        builder,
        ConfirmRecoveryResponse {
            redirect_to: outcome.redirect_to,
            signed_in,
        },
        &request_id,
    )
}

/// HTTP-only cookie carrying the session token
fn session_cookie(config: &SessionConfig, session: &SessionTicket) -> Cookie<'static> {
    let max_age = (session.expires_at - Utc::now()).num_seconds().max(0);

    Cookie::build(config.cookie_name.clone(), session.token.clone())
        .path("/")
        .http_only(true)
        .secure(config.secure_cookie)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(max_age))
        .finish()
}
