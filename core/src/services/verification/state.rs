use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::{Account, VerificationPurpose, VerificationRecord};
use crate::errors::TokenError;
use crate::services::token::TokenCodec;

use super::types::{InvalidReason, VerificationOutcome};

/// Replace any pending verification with a fresh one for `purpose`
///
/// Returns the raw token for out-of-band delivery. Only its hash is kept on
/// the account. On entropy failure the account is left untouched.
pub fn set_verification(
    account: &mut Account,
    purpose: VerificationPurpose,
    storage: Option<String>,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, TokenError> {
    let issued = TokenCodec::issue()?;

    account.verification = Some(VerificationRecord {
        key_hash: issued.key_hash,
        purpose,
        expires_at: now + ttl,
        storage,
        sent_at: now,
    });
    account.touch(now);

    Ok(issued.raw)
}

/// Check a presented token for `purpose` at `now`
///
/// Checks run in order: pending record, key, purpose, expiry.
pub fn validate(
    account: &Account,
    raw_token: &str,
    purpose: VerificationPurpose,
    now: DateTime<Utc>,
) -> VerificationOutcome {
    let Some(record) = account.verification.as_ref() else {
        return VerificationOutcome::Invalid(InvalidReason::NoPending);
    };

    if !TokenCodec::verify(raw_token, &record.key_hash) {
        return VerificationOutcome::Invalid(InvalidReason::KeyMismatch);
    }

    if record.purpose != purpose {
        return VerificationOutcome::Invalid(InvalidReason::PurposeMismatch);
    }

    if record.is_expired_at(now) {
        return VerificationOutcome::Expired;
    }

    VerificationOutcome::Valid
}

/// Drop any pending verification (idempotent)
pub fn clear(account: &mut Account) {
    account.verification = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    const PURPOSE: VerificationPurpose = VerificationPurpose::ResetPassword;

    fn account() -> Account {
        Account::new("a@x.com", None)
    }

    #[test]
    fn test_set_verification_stores_hash_not_token() {
        let mut account = account();
        let now = Utc::now();

        let raw = set_verification(&mut account, PURPOSE, Some("/app".into()), Duration::minutes(60), now)
            .unwrap();

        let record = account.verification.as_ref().unwrap();
        assert_ne!(record.key_hash, raw);
        assert_eq!(record.key_hash, TokenCodec::hash(&raw));
        assert_eq!(record.purpose, PURPOSE);
        assert_eq!(record.expires_at, now + Duration::minutes(60));
        assert_eq!(record.storage.as_deref(), Some("/app"));
        assert_eq!(record.sent_at, now);
    }

    #[test]
    fn test_second_issue_supersedes_first() {
        let mut account = account();
        let now = Utc::now();
        let ttl = Duration::minutes(60);

        let first = set_verification(&mut account, PURPOSE, None, ttl, now).unwrap();
        let second = set_verification(&mut account, PURPOSE, None, ttl, now).unwrap();

        assert_eq!(
            validate(&account, &first, PURPOSE, now),
            VerificationOutcome::Invalid(InvalidReason::KeyMismatch)
        );
        assert_eq!(validate(&account, &second, PURPOSE, now), VerificationOutcome::Valid);
    }

    #[test]
    fn test_purpose_isolation() {
        let mut account = account();
        let now = Utc::now();
        let raw = set_verification(&mut account, PURPOSE, None, Duration::minutes(60), now).unwrap();

        for other in [VerificationPurpose::ConfirmAccount, VerificationPurpose::ChangeEmail] {
            assert_eq!(
                validate(&account, &raw, other, now),
                VerificationOutcome::Invalid(InvalidReason::PurposeMismatch)
            );
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let mut account = account();
        let now = Utc::now();
        let ttl = Duration::minutes(60);
        let raw = set_verification(&mut account, PURPOSE, None, ttl, now).unwrap();
        let expires_at = now + ttl;

        for offset in [ttl.num_seconds(), 1, 0] {
            let at = expires_at - Duration::seconds(offset) - Duration::milliseconds(1);
            assert_eq!(validate(&account, &raw, PURPOSE, at), VerificationOutcome::Valid);
        }
        for offset in [0, 1, 3600] {
            let at = expires_at + Duration::seconds(offset);
            assert_eq!(validate(&account, &raw, PURPOSE, at), VerificationOutcome::Expired);
        }
    }

    #[test]
    fn test_wrong_purpose_wins_over_expiry() {
        let mut account = account();
        let now = Utc::now();
        let raw = set_verification(&mut account, PURPOSE, None, Duration::minutes(1), now).unwrap();

        let later = now + Duration::hours(1);
        assert_eq!(
            validate(&account, &raw, VerificationPurpose::ChangeEmail, later),
            VerificationOutcome::Invalid(InvalidReason::PurposeMismatch)
        );
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut account = account();
        let now = Utc::now();
        let raw = set_verification(&mut account, PURPOSE, None, Duration::minutes(60), now).unwrap();

        clear(&mut account);
        clear(&mut account);

        assert!(!account.has_pending_verification());
        assert_eq!(
            validate(&account, &raw, PURPOSE, now),
            VerificationOutcome::Invalid(InvalidReason::NoPending)
        );
    }
}
