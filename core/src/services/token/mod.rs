//! Token codec for verification keys
//!
//! Issues unguessable URL-safe tokens and the one-way key hash stored in
//! their place, and checks presented tokens against a stored hash.

mod codec;

pub use codec::{IssuedToken, TokenCodec, ENCODED_TOKEN_LEN, TOKEN_BYTES};
