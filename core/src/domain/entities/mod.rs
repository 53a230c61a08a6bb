//! Domain entities representing core business objects.

pub mod account;
pub mod verification;

// Re-export commonly used types
pub use account::Account;
pub use verification::{VerificationPurpose, VerificationRecord};
