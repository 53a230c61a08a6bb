use actix_web::{web, HttpResponse};
use rc_core::repositories::AccountRepository;
use rc_shared::types::{HealthResponse, HealthStatus, ServiceHealth};

use super::recover::AppState;

/// Handler for GET /health
///
/// Reports the database pool when one is configured; a failed probe
/// degrades the status and answers 503.
pub async fn health_check<R>(state: web::Data<AppState<R>>) -> HttpResponse
where
    R: AccountRepository + 'static,
{
    let mut response = HealthResponse::healthy(env!("CARGO_PKG_VERSION"));

    if let Some(pool) = &state.database {
        let database = match pool.health_check().await {
            Ok(true) => ServiceHealth {
                status: HealthStatus::Healthy,
                message: Some(pool.get_statistics().to_string()),
            },
            Ok(false) | Err(_) => ServiceHealth {
                status: HealthStatus::Unhealthy,
                message: Some("database unreachable".to_string()),
            },
        };
        if database.status != HealthStatus::Healthy {
            response.status = HealthStatus::Degraded;
        }
        response.services.insert("database".to_string(), database);
    }

    if response.status == HealthStatus::Healthy {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
