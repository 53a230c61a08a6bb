//! Account repository trait defining the interface for account persistence.
//!
//! The recovery flow performs load, mutate, save on one account per
//! operation. Implementations must give read-your-writes consistency to
//! that caller; no version check is required, so concurrent writers to the
//! same account race and the last one wins.

use async_trait::async_trait;

use crate::domain::entities::Account;
use crate::errors::DomainError;

/// Repository trait for Account persistence operations
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by its normalized email address
    ///
    /// # Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - No account uses this email
    /// * `Err(DomainError)` - Storage error
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Find the account whose pending verification has this key hash
    ///
    /// At most one account can match; implementations must enforce
    /// uniqueness of pending key hashes on write.
    async fn find_by_verification_key(&self, key_hash: &str) -> Result<Option<Account>, DomainError>;

    /// Insert or replace the account record
    ///
    /// # Errors
    /// * `DomainError::Conflict` - Email or pending key hash already used by another account
    async fn save(&self, account: &Account) -> Result<(), DomainError>;
}
