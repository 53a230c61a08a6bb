//! JWT session authenticator
//!
//! Issues HS256 session tokens for accounts that just finished a recovery.
//! The API layer puts the token in the session cookie.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rc_core::domain::entities::Account;
use rc_core::services::{Authenticator, SessionTicket};
use rc_shared::SessionConfig;

use crate::InfrastructureError;

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account ID
    pub sub: String,
    /// Account email
    pub email: String,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Unique token id
    pub jti: String,
}

/// Authenticator issuing signed JWT sessions
pub struct JwtSessionAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: SessionConfig,
}

impl JwtSessionAuthenticator {
    pub fn new(config: SessionConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }

    /// Issue a session token for the account
    pub fn issue(&self, account: &Account) -> Result<SessionTicket, InfrastructureError> {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(self.config.expiry_minutes);
        let claims = SessionClaims {
            sub: account.id.to_string(),
            email: account.email.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.config.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| InfrastructureError::Session(format!("Failed to sign session: {}", e)))?;

        Ok(SessionTicket { token, expires_at })
    }

    /// Verify a session token and return its claims
    pub fn verify(&self, token: &str) -> Result<SessionClaims, InfrastructureError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| InfrastructureError::Session(format!("Invalid session token: {}", e)))
    }
}

#[async_trait]
impl Authenticator for JwtSessionAuthenticator {
    async fn sign_in(&self, account: &Account) -> Result<SessionTicket, String> {
        let ticket = self.issue(account).map_err(|e| e.to_string())?;
        tracing::info!(
            account_id = %account.id,
            event = "session_issued",
            "Issued session after recovery"
        );
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator(secret: &str) -> JwtSessionAuthenticator {
        JwtSessionAuthenticator::new(SessionConfig::new(secret))
    }

    #[tokio::test]
    async fn test_sign_in_issues_verifiable_session() {
        let auth = authenticator("test-secret");
        let account = Account::new("a@x.com", None);

        let ticket = auth.sign_in(&account).await.unwrap();
        let claims = auth.verify(&ticket.token).unwrap();

        assert_eq!(claims.sub, account.id.to_string());
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.iss, "reclaim");
        assert_eq!(claims.exp, ticket.expires_at.timestamp());
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let account = Account::new("a@x.com", None);
        let ticket = authenticator("one").issue(&account).unwrap();

        assert!(authenticator("two").verify(&ticket.token).is_err());
    }

    #[test]
    fn test_sessions_are_unique() {
        let auth = authenticator("test-secret");
        let account = Account::new("a@x.com", None);

        let first = auth.issue(&account).unwrap();
        let second = auth.issue(&account).unwrap();
        assert_ne!(first.token, second.token);
    }
}
