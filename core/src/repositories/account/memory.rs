//! In-memory implementation of AccountRepository for tests and local runs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::Account;
use crate::errors::DomainError;

use super::trait_::AccountRepository;

/// In-memory account repository
#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl InMemoryAccountRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch an account by id
    pub async fn get(&self, id: Uuid) -> Option<Account> {
        self.accounts.read().await.get(&id).cloned()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let email = rc_shared::validation::normalize_email(email);
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_verification_key(&self, key_hash: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| {
                a.verification
                    .as_ref()
                    .map(|v| v.key_hash == key_hash)
                    .unwrap_or(false)
            })
            .cloned())
    }

    async fn save(&self, account: &Account) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;

        for other in accounts.values().filter(|a| a.id != account.id) {
            if other.email == account.email {
                return Err(DomainError::Conflict {
                    message: format!("email already in use by account {}", other.id),
                });
            }
            if let (Some(mine), Some(theirs)) = (&account.verification, &other.verification) {
                if mine.key_hash == theirs.key_hash {
                    return Err(DomainError::Conflict {
                        message: "verification key already pending on another account".to_string(),
                    });
                }
            }
        }

        accounts.insert(account.id, account.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::VerificationPurpose;
    use crate::services::verification::set_verification;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_save_and_find_by_email() {
        let repo = InMemoryAccountRepository::new();
        let account = Account::new("alice@example.com", None);
        repo.save(&account).await.unwrap();

        let found = repo.find_by_email("ALICE@example.com ").await.unwrap();
        assert_eq!(found.map(|a| a.id), Some(account.id));
        assert!(repo.find_by_email("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_verification_key() {
        let repo = InMemoryAccountRepository::new();
        let mut account = Account::new("alice@example.com", None);
        let raw = set_verification(
            &mut account,
            VerificationPurpose::ResetPassword,
            None,
            Duration::minutes(60),
            Utc::now(),
        )
        .unwrap();
        repo.save(&account).await.unwrap();

        let key_hash = crate::services::token::TokenCodec::hash(&raw);
        let found = repo.find_by_verification_key(&key_hash).await.unwrap();
        assert_eq!(found.map(|a| a.id), Some(account.id));
        assert!(repo.find_by_verification_key("deadbeef").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_email() {
        let repo = InMemoryAccountRepository::new();
        repo.save(&Account::new("alice@example.com", None)).await.unwrap();

        let result = repo.save(&Account::new("alice@example.com", None)).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_save_rejects_shared_pending_key() {
        let repo = InMemoryAccountRepository::new();
        let mut first = Account::new("a@x.com", None);
        set_verification(
            &mut first,
            VerificationPurpose::ResetPassword,
            None,
            Duration::minutes(60),
            Utc::now(),
        )
        .unwrap();
        repo.save(&first).await.unwrap();

        let mut second = Account::new("b@x.com", None);
        second.verification = first.verification.clone();

        let result = repo.save(&second).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }
}
