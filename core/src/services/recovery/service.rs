//! Main recovery service implementation

use std::sync::Arc;
use uuid::Uuid;

use rc_shared::masking::mask_email;
use rc_shared::validation::{
    email_domain, is_safe_return_url, is_valid_email, normalize_email, validate_password_strength,
};

use crate::domain::entities::{Account, VerificationPurpose};
use crate::errors::{DomainError, RecoveryError};
use crate::repositories::AccountRepository;
use crate::services::clock::{Clock, SystemClock};
use crate::services::token::TokenCodec;
use crate::services::verification::{self, InvalidReason, VerificationOutcome};

use super::config::RecoveryServiceConfig;
use super::traits::{Authenticator, Notifier};
use super::types::{
    BeginOutcome, CancelOutcome, ConfirmOutcome, ConfirmPreview, RecoveryMessage,
};

const PURPOSE: VerificationPurpose = VerificationPurpose::ResetPassword;

/// Recovery service orchestrating issue, delivery, validation and consumption
/// of password reset tokens
///
/// Every operation is load, mutate, persist on a single account. An
/// operation only reports success after the repository write returned.
pub struct RecoveryService<R: AccountRepository, N: Notifier, A: Authenticator> {
    /// Account storage
    account_repository: Arc<R>,
    /// Out-of-band token delivery
    notifier: Arc<N>,
    /// Session establishment after recovery
    authenticator: Arc<A>,
    /// Time source for expiry
    clock: Arc<dyn Clock>,
    /// Service configuration
    config: RecoveryServiceConfig,
}

impl<R: AccountRepository, N: Notifier, A: Authenticator> RecoveryService<R, N, A> {
    /// Create a new recovery service using the system clock
    pub fn new(
        account_repository: Arc<R>,
        notifier: Arc<N>,
        authenticator: Arc<A>,
        config: RecoveryServiceConfig,
    ) -> Self {
        Self {
            account_repository,
            notifier,
            authenticator,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &RecoveryServiceConfig {
        &self.config
    }

    /// Begin a recovery for the account registered under `email`
    ///
    /// Any pending verification on the account is silently replaced. A
    /// delivery failure is logged but does not fail the operation, since the
    /// new token is already persisted.
    ///
    /// # Errors
    ///
    /// * `ValidationFailed` - malformed email or unsafe return URL
    /// * `AccountNotFound` / `AccountDeactivated` - no token issued, notifier not called
    /// * `PersistenceFailure` - the account could not be loaded or saved
    pub async fn begin(
        &self,
        email: &str,
        return_url: Option<&str>,
    ) -> Result<BeginOutcome, RecoveryError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(RecoveryError::validation("email", "Invalid email address"));
        }
        let return_url = self.check_return_url(return_url)?;
        let masked = mask_email(&email);

        tracing::info!(email = %masked, event = "recovery_started", "Account recovery requested");

        let mut account = match self
            .account_repository
            .find_by_email(&email)
            .await
            .map_err(|e| persistence_failure("load_by_email", None, e))?
        {
            Some(account) => account,
            None => {
                tracing::info!(
                    email = %masked,
                    event = "recovery_account_not_found",
                    "No account for recovery request"
                );
                return Err(RecoveryError::AccountNotFound);
            }
        };

        if !account.login_allowed {
            tracing::warn!(
                account_id = %account.id,
                event = "recovery_account_deactivated",
                "Recovery requested for deactivated account"
            );
            return Err(RecoveryError::AccountDeactivated);
        }

        let now = self.clock.now();
        let expires_at = now + self.config.token_ttl;
        let raw_token = verification::set_verification(
            &mut account,
            PURPOSE,
            return_url.clone(),
            self.config.token_ttl,
            now,
        )
        .map_err(|e| {
            tracing::error!(
                account_id = %account.id,
                error = %e,
                event = "recovery_token_issue_failed",
                "Could not issue recovery token"
            );
            RecoveryError::from(e)
        })?;

        self.persist(&account, "begin").await?;

        tracing::info!(
            account_id = %account.id,
            expires_at = %expires_at,
            event = "recovery_token_issued",
            "Issued recovery token"
        );

        let message = RecoveryMessage {
            email: account.email.clone(),
            raw_token,
            expires_at,
            return_url: return_url.clone(),
        };

        let delivered = match self.notifier.send_recovery_message(message).await {
            Ok(message_id) => {
                tracing::info!(
                    account_id = %account.id,
                    message_id = %message_id,
                    event = "recovery_message_sent",
                    "Recovery message delivered to provider"
                );
                true
            }
            Err(e) => {
                let failure = RecoveryError::DeliveryFailure { message: e };
                tracing::error!(
                    account_id = %account.id,
                    email = %masked,
                    error = %failure,
                    event = "recovery_delivery_failed",
                    "Recovery message could not be delivered"
                );
                false
            }
        };

        Ok(BeginOutcome {
            account_id: account.id,
            provider: email_domain(&email).map(str::to_string),
            return_url,
            expires_at,
            delivered,
        })
    }

    /// Check a presented token without consuming it
    pub async fn preview(&self, raw_token: &str) -> Result<ConfirmPreview, RecoveryError> {
        check_shape(raw_token, "preview")?;
        let account = self.resolve(raw_token, "preview").await?;

        let outcome = verification::validate(&account, raw_token, PURPOSE, self.clock.now());
        if let Some(error) = reject(outcome, "preview", Some(account.id)) {
            return Err(error);
        }

        let expires_at = account
            .verification
            .as_ref()
            .map(|record| record.expires_at)
            .ok_or(RecoveryError::TokenInvalid)?;

        Ok(ConfirmPreview {
            email: account.email,
            expires_at,
        })
    }

    /// Consume a token and replace the account's password
    ///
    /// A token that resolves to an account but fails validation (expired or
    /// issued for another purpose) still clears that account's pending
    /// verification. Password hash, cleared verification and, when enabled,
    /// the sign-in record are persisted in one write.
    pub async fn confirm(
        &self,
        raw_token: &str,
        new_password: &str,
    ) -> Result<ConfirmOutcome, RecoveryError> {
        check_shape(raw_token, "confirm")?;
        validate_password_strength(new_password, self.config.min_password_length)
            .map_err(|e| RecoveryError::validation(e.field, e.message))?;

        let mut account = self.resolve(raw_token, "confirm").await?;
        let now = self.clock.now();

        let outcome = verification::validate(&account, raw_token, PURPOSE, now);
        if let Some(error) = reject(outcome, "confirm", Some(account.id)) {
            verification::clear(&mut account);
            account.touch(now);
            self.persist(&account, "confirm_cleanup").await?;
            return Err(error);
        }

        let return_url = account
            .verification
            .as_ref()
            .and_then(|record| record.storage.clone());

        let password_hash = self.hash_password(new_password).await?;
        account.set_password_hash(password_hash, now);
        verification::clear(&mut account);
        if self.config.login_after_recovery {
            account.record_successful_sign_in(now);
        }

        self.persist(&account, "confirm").await?;

        tracing::info!(
            account_id = %account.id,
            event = "recovery_confirmed",
            "Password reset completed"
        );

        let session = if self.config.login_after_recovery {
            match self.authenticator.sign_in(&account).await {
                Ok(ticket) => Some(ticket),
                Err(e) => {
                    tracing::warn!(
                        account_id = %account.id,
                        error = %e,
                        event = "recovery_sign_in_failed",
                        "Password was reset but the session could not be established"
                    );
                    None
                }
            }
        } else {
            None
        };

        let redirect_to = match &session {
            Some(_) => return_url.clone().unwrap_or_else(|| "/".to_string()),
            None => self.config.login_redirect(return_url.as_deref()),
        };

        Ok(ConfirmOutcome {
            account_id: account.id,
            return_url,
            redirect_to,
            session,
        })
    }

    /// Withdraw a pending recovery without touching the password
    ///
    /// Expired tokens may still be cancelled. A token issued for another
    /// purpose is rejected and nothing is written.
    pub async fn cancel(&self, raw_token: &str) -> Result<CancelOutcome, RecoveryError> {
        check_shape(raw_token, "cancel")?;
        let mut account = self.resolve(raw_token, "cancel").await?;
        let now = self.clock.now();

        let outcome = verification::validate(&account, raw_token, PURPOSE, now);
        if !outcome.is_genuine() {
            return Err(reject(outcome, "cancel", Some(account.id)).unwrap_or(RecoveryError::TokenInvalid));
        }

        let return_url = account
            .verification
            .as_ref()
            .and_then(|record| record.storage.clone());

        verification::clear(&mut account);
        account.touch(now);
        self.persist(&account, "cancel").await?;

        tracing::info!(
            account_id = %account.id,
            expired = outcome == VerificationOutcome::Expired,
            event = "recovery_cancelled",
            "Recovery cancelled"
        );

        Ok(CancelOutcome {
            account_id: account.id,
            redirect_to: self.config.login_redirect(return_url.as_deref()),
            return_url,
        })
    }

    /// Find the single account whose pending key matches the token
    async fn resolve(&self, raw_token: &str, step: &'static str) -> Result<Account, RecoveryError> {
        let key_hash = TokenCodec::hash(raw_token);
        let account = self
            .account_repository
            .find_by_verification_key(&key_hash)
            .await
            .map_err(|e| persistence_failure("load_by_verification_key", None, e))?;

        account.ok_or_else(|| {
            tracing::info!(
                step = step,
                reason = "unresolvable",
                event = "recovery_token_rejected",
                "Presented token does not match any pending verification"
            );
            RecoveryError::TokenInvalid
        })
    }

    async fn persist(&self, account: &Account, step: &'static str) -> Result<(), RecoveryError> {
        self.account_repository
            .save(account)
            .await
            .map_err(|e| persistence_failure(step, Some(account.id), e))
    }

    async fn hash_password(&self, password: &str) -> Result<String, RecoveryError> {
        let password = password.to_owned();
        let cost = self.config.password_hash_cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| RecoveryError::Internal {
                message: format!("password hashing task failed: {}", e),
            })?
            .map_err(|e| RecoveryError::Internal {
                message: format!("password hashing failed: {}", e),
            })
    }

    fn check_return_url(&self, return_url: Option<&str>) -> Result<Option<String>, RecoveryError> {
        match return_url.map(str::trim).filter(|url| !url.is_empty()) {
            None => Ok(None),
            Some(url) if is_safe_return_url(url, &self.config.allowed_return_origins) => {
                Ok(Some(url.to_string()))
            }
            Some(_) => Err(RecoveryError::validation(
                "return_url",
                "Return URL must be a relative path or an allowed origin",
            )),
        }
    }
}

fn check_shape(raw_token: &str, step: &'static str) -> Result<(), RecoveryError> {
    TokenCodec::ensure_well_formed(raw_token).map_err(|e| {
        tracing::info!(
            step = step,
            reason = "malformed",
            event = "recovery_token_rejected",
            "Presented token is malformed"
        );
        RecoveryError::from(e)
    })
}

/// Map a failed validation to the error it surfaces as, logging the reason
fn reject(
    outcome: VerificationOutcome,
    step: &'static str,
    account_id: Option<Uuid>,
) -> Option<RecoveryError> {
    let (reason, error) = match outcome {
        VerificationOutcome::Valid => return None,
        VerificationOutcome::Expired => ("expired", RecoveryError::TokenExpired),
        VerificationOutcome::Invalid(InvalidReason::NoPending) => {
            ("no_pending", RecoveryError::TokenInvalid)
        }
        VerificationOutcome::Invalid(InvalidReason::KeyMismatch) => {
            ("key_mismatch", RecoveryError::TokenInvalid)
        }
        VerificationOutcome::Invalid(InvalidReason::PurposeMismatch) => {
            ("purpose_mismatch", RecoveryError::TokenInvalid)
        }
    };

    tracing::info!(
        account_id = ?account_id,
        step = step,
        reason = reason,
        event = "recovery_token_rejected",
        "Presented token rejected"
    );
    Some(error)
}

fn persistence_failure(step: &'static str, account_id: Option<Uuid>, err: DomainError) -> RecoveryError {
    tracing::error!(
        account_id = ?account_id,
        step = step,
        error = %err,
        event = "recovery_persistence_failed",
        "Account repository call failed"
    );
    RecoveryError::PersistenceFailure {
        message: err.to_string(),
    }
}
