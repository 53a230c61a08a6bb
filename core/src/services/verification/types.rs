//! Results of validating a presented token

/// Why a presented token does not validate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// The account has no pending verification
    NoPending,
    /// The token does not hash to the stored key
    KeyMismatch,
    /// The token was issued for a different purpose
    PurposeMismatch,
}

/// Result of checking a presented token against an account
///
/// `Expired` is only reported once the key and purpose both matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Valid,
    Expired,
    Invalid(InvalidReason),
}

impl VerificationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationOutcome::Valid)
    }

    /// Key and purpose matched, regardless of expiry
    pub fn is_genuine(&self) -> bool {
        matches!(self, VerificationOutcome::Valid | VerificationOutcome::Expired)
    }
}
