//! Session module - signs users in after a completed recovery

pub mod jwt_authenticator;

pub use jwt_authenticator::{JwtSessionAuthenticator, SessionClaims};
