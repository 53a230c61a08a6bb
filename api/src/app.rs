//! Application state and factory
//!
//! This module provides the factory for creating the Actix-web application
//! around an initialized [`AppState`].

use actix_web::{error::InternalError, web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use rc_core::repositories::AccountRepository;
use rc_shared::{error_codes, CorsConfig, ErrorResponse, ServerConfig};

use crate::handlers::not_found;
use crate::middleware::create_cors;
use crate::routes::health::health_check;
use crate::routes::recover::{
    begin_recovery, cancel_recovery, confirm_recovery, preview_recovery, AppState,
};

/// Create and configure the application with all dependencies
pub fn create_app<R>(
    app_state: web::Data<AppState<R>>,
    server: &ServerConfig,
    cors: &CorsConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    R: AccountRepository + 'static,
{
    let json_config = web::JsonConfig::default()
        .limit(server.max_payload_size)
        .error_handler(|err, _req| {
            let body = ErrorResponse::new(error_codes::BAD_REQUEST, err.to_string());
            InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
        });

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        // Middleware order: CORS runs inside the request span
        .wrap(create_cors(cors))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check::<R>))
        .service(
            web::scope("/api/v1").service(
                web::scope("/recover")
                    .route("", web::post().to(begin_recovery::<R>))
                    .route("/confirm", web::get().to(preview_recovery::<R>))
                    .route("/confirm", web::post().to(confirm_recovery::<R>))
                    .route("/cancel", web::get().to(cancel_recovery::<R>)),
            ),
        )
        .default_service(web::route().to(|| async { not_found() }))
}
