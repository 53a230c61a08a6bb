//! # Reclaim Core
//!
//! Domain layer for self-service account recovery. This crate contains the
//! account entity and its embedded verification record, the token codec,
//! the verification state operations, the recovery service state machine,
//! repository interfaces and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
