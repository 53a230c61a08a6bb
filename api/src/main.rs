use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;

use rc_api::telemetry::init_tracing;
use rc_api::{create_app, AppState};
use rc_core::services::{RecoveryService, RecoveryServiceConfig};
use rc_infra::database::{ensure_schema, DatabasePool, MySqlAccountRepository};
use rc_infra::email::{create_email_service, EmailRecoveryNotifier};
use rc_infra::session::JwtSessionAuthenticator;
use rc_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config.logging)?;

    tracing::info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting Reclaim API server"
    );

    let pool = DatabasePool::new(&config.database)
        .await
        .context("connecting to the database")?;
    if config.database.ensure_schema {
        ensure_schema(pool.get_pool())
            .await
            .context("bootstrapping the accounts table")?;
    }

    let email_service = create_email_service(&config.email).context("configuring email delivery")?;
    let notifier = EmailRecoveryNotifier::new(email_service, config.recovery.public_base_url.clone());
    let authenticator = JwtSessionAuthenticator::new(config.session.clone());
    let repository = MySqlAccountRepository::new(pool.get_pool().clone());

    let recovery_service = RecoveryService::new(
        Arc::new(repository),
        Arc::new(notifier),
        Arc::new(authenticator),
        RecoveryServiceConfig::from(&config.recovery),
    );

    let app_state = web::Data::new(AppState {
        recovery_service: Arc::new(recovery_service),
        conceal_account_state: config.recovery.conceal_account_state,
        session: config.session.clone(),
        database: Some(pool.clone()),
    });

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "Server will bind");

    let server_config = config.server.clone();
    let cors_config = config.cors.clone();
    let mut server = HttpServer::new(move || {
        create_app(app_state.clone(), &server_config, &cors_config)
    })
    .keep_alive(std::time::Duration::from_secs(config.server.keep_alive));

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    tracing::info!("Server stopped, closing database pool");
    pool.close().await;

    Ok(())
}
