use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::errors::TokenError;

/// Random bytes per token: 256 bits of entropy, so collisions between
/// issued tokens are not checked against storage
pub const TOKEN_BYTES: usize = 32;

/// Length of the URL-safe base64 encoding of [`TOKEN_BYTES`] without padding
pub const ENCODED_TOKEN_LEN: usize = 43;

/// A freshly issued token
///
/// `raw` goes to the user out-of-band and is never persisted; `key_hash`
/// is what the account record keeps.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub raw: String,
    pub key_hash: String,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("raw", &"<redacted>")
            .field("key_hash", &self.key_hash)
            .finish()
    }
}

/// Stateless token codec
pub struct TokenCodec;

impl TokenCodec {
    /// Issue a token from the operating system's CSPRNG
    pub fn issue() -> Result<IssuedToken, TokenError> {
        Self::issue_with(&mut OsRng)
    }

    /// Issue a token from the given secure random source
    pub fn issue_with<R: RngCore + CryptoRng>(rng: &mut R) -> Result<IssuedToken, TokenError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        rng.try_fill_bytes(&mut bytes)
            .map_err(|e| TokenError::EntropyUnavailable {
                message: e.to_string(),
            })?;

        let raw = URL_SAFE_NO_PAD.encode(bytes);
        let key_hash = Self::hash(&raw);
        Ok(IssuedToken { raw, key_hash })
    }

    /// One-way key hash of a raw token (lowercase hex SHA-256)
    pub fn hash(raw: &str) -> String {
        hex::encode(Sha256::digest(raw.as_bytes()))
    }

    /// Constant-time check of a presented token against a stored hash
    pub fn verify(raw: &str, key_hash: &str) -> bool {
        constant_time_eq(Self::hash(raw).as_bytes(), key_hash.as_bytes())
    }

    /// Whether a presented token has the shape of an issued one
    pub fn is_well_formed(raw: &str) -> bool {
        raw.len() == ENCODED_TOKEN_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }

    /// Shape check that fails with [`TokenError::Malformed`]
    pub fn ensure_well_formed(raw: &str) -> Result<(), TokenError> {
        if Self::is_well_formed(raw) {
            Ok(())
        } else {
            Err(TokenError::Malformed)
        }
    }
}
