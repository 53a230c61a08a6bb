//! Verification state operations on an account's pending verification
//!
//! These are synchronous mutations of the in-memory account. Persisting the
//! result is a separate step owned by the caller.

mod state;
mod types;

pub use state::{clear, set_verification, validate};
pub use types::{InvalidReason, VerificationOutcome};
