//! Accounts table bootstrap
//!
//! Verification columns are nullable and cleared together. The unique index
//! on `verification_key_hash` guarantees a presented token resolves to at
//! most one account.

use sqlx::MySqlPool;

use crate::InfrastructureError;

pub const CREATE_ACCOUNTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id CHAR(36) NOT NULL PRIMARY KEY,
        email VARCHAR(254) NOT NULL,
        password_hash VARCHAR(255) NULL,
        login_allowed BOOLEAN NOT NULL DEFAULT TRUE,
        verification_key_hash CHAR(64) NULL,
        verification_purpose VARCHAR(32) NULL,
        verification_expires_at DATETIME(6) NULL,
        verification_storage VARCHAR(2048) NULL,
        verification_sent_at DATETIME(6) NULL,
        failed_login_count INT UNSIGNED NOT NULL DEFAULT 0,
        last_login_at DATETIME(6) NULL,
        created_at DATETIME(6) NOT NULL,
        updated_at DATETIME(6) NOT NULL,
        UNIQUE KEY uq_accounts_email (email),
        UNIQUE KEY uq_accounts_verification_key_hash (verification_key_hash)
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
"#;

/// Create the accounts table if it does not exist
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), InfrastructureError> {
    tracing::info!(event = "schema_bootstrap", "Ensuring accounts table exists");
    sqlx::query(CREATE_ACCOUNTS_TABLE).execute(pool).await?;
    Ok(())
}
