//! MySQL implementation of the AccountRepository trait.
//!
//! Accounts live in a single `accounts` table with the pending verification
//! flattened into nullable `verification_*` columns. Saves are plain
//! row replacements without a version check (last writer wins).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use uuid::Uuid;

use rc_core::domain::entities::{Account, VerificationPurpose, VerificationRecord};
use rc_core::errors::DomainError;
use rc_core::repositories::AccountRepository;

const SELECT_COLUMNS: &str = r#"
    SELECT id, email, password_hash, login_allowed,
           verification_key_hash, verification_purpose, verification_expires_at,
           verification_storage, verification_sent_at,
           failed_login_count, last_login_at, created_at, updated_at
    FROM accounts
"#;

/// MySQL implementation of AccountRepository
pub struct MySqlAccountRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    /// Create a new MySQL account repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to Account entity
    fn row_to_account(row: &MySqlRow) -> Result<Account, DomainError> {
        let id: String = row.try_get("id").map_err(column_error("id"))?;

        let verification = verification_from_columns(
            row.try_get("verification_key_hash")
                .map_err(column_error("verification_key_hash"))?,
            row.try_get("verification_purpose")
                .map_err(column_error("verification_purpose"))?,
            row.try_get("verification_expires_at")
                .map_err(column_error("verification_expires_at"))?,
            row.try_get("verification_storage")
                .map_err(column_error("verification_storage"))?,
            row.try_get("verification_sent_at")
                .map_err(column_error("verification_sent_at"))?,
        )?;

        Ok(Account {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid account UUID: {}", e),
            })?,
            email: row.try_get("email").map_err(column_error("email"))?,
            password_hash: row.try_get("password_hash").map_err(column_error("password_hash"))?,
            login_allowed: row.try_get("login_allowed").map_err(column_error("login_allowed"))?,
            verification,
            failed_login_count: row
                .try_get("failed_login_count")
                .map_err(column_error("failed_login_count"))?,
            last_login_at: row.try_get("last_login_at").map_err(column_error("last_login_at"))?,
            created_at: row.try_get("created_at").map_err(column_error("created_at"))?,
            updated_at: row.try_get("updated_at").map_err(column_error("updated_at"))?,
        })
    }

    async fn find_one(&self, filter: &str, value: &str) -> Result<Option<Account>, DomainError> {
        let query = format!("{} WHERE {} = ? LIMIT 1", SELECT_COLUMNS, filter);

        let result = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to load account: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let email = rc_shared::validation::normalize_email(email);
        self.find_one("email", &email).await
    }

    async fn find_by_verification_key(&self, key_hash: &str) -> Result<Option<Account>, DomainError> {
        self.find_one("verification_key_hash", key_hash).await
    }

    async fn save(&self, account: &Account) -> Result<(), DomainError> {
        let exists_row = sqlx::query("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = ?) AS present")
            .bind(account.id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(write_error)?;

        let present: i64 = exists_row.try_get("present").map_err(column_error("present"))?;

        let query = if present == 1 {
            r#"
                UPDATE accounts SET
                    email = ?, password_hash = ?, login_allowed = ?,
                    verification_key_hash = ?, verification_purpose = ?,
                    verification_expires_at = ?, verification_storage = ?,
                    verification_sent_at = ?,
                    failed_login_count = ?, last_login_at = ?,
                    created_at = ?, updated_at = ?
                WHERE id = ?
            "#
        } else {
            r#"
                INSERT INTO accounts (
                    email, password_hash, login_allowed,
                    verification_key_hash, verification_purpose,
                    verification_expires_at, verification_storage,
                    verification_sent_at,
                    failed_login_count, last_login_at,
                    created_at, updated_at, id
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        };

        let verification = account.verification.as_ref();

        sqlx::query(query)
            .bind(&account.email)
            .bind(account.password_hash.as_deref())
            .bind(account.login_allowed)
            .bind(verification.map(|v| v.key_hash.as_str()))
            .bind(verification.map(|v| v.purpose.as_str()))
            .bind(verification.map(|v| v.expires_at))
            .bind(verification.and_then(|v| v.storage.as_deref()))
            .bind(verification.map(|v| v.sent_at))
            .bind(account.failed_login_count)
            .bind(account.last_login_at)
            .bind(account.created_at)
            .bind(account.updated_at)
            .bind(account.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(write_error)?;

        Ok(())
    }
}

/// Rebuild the pending verification from its flattened columns
///
/// All five columns are written and cleared together. A row where the key
/// hash is null has no pending verification; a row with a key hash but
/// missing companions is reported as corrupt.
pub(crate) fn verification_from_columns(
    key_hash: Option<String>,
    purpose: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    storage: Option<String>,
    sent_at: Option<DateTime<Utc>>,
) -> Result<Option<VerificationRecord>, DomainError> {
    let Some(key_hash) = key_hash else {
        return Ok(None);
    };

    let (Some(purpose), Some(expires_at), Some(sent_at)) = (purpose, expires_at, sent_at) else {
        return Err(DomainError::Internal {
            message: "Incomplete verification columns on account row".to_string(),
        });
    };

    let purpose = purpose
        .parse::<VerificationPurpose>()
        .map_err(|message| DomainError::Internal { message })?;

    Ok(Some(VerificationRecord {
        key_hash,
        purpose,
        expires_at,
        storage,
        sent_at,
    }))
}

fn column_error(column: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::Internal {
        message: format!("Failed to get {}: {}", column, e),
    }
}

fn write_error(e: sqlx::Error) -> DomainError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::Conflict {
            message: format!("Account write violates a unique key: {}", db.message()),
        },
        _ => DomainError::Internal {
            message: format!("Failed to save account: {}", e),
        },
    }
}
