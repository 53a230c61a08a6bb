//! Business services containing domain logic and use cases.

pub mod clock;
pub mod recovery;
pub mod token;
pub mod verification;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use recovery::{
    Authenticator, BeginOutcome, CancelOutcome, ConfirmOutcome, ConfirmPreview, Notifier,
    RecoveryMessage, RecoveryService, RecoveryServiceConfig, SessionTicket,
};
pub use token::{IssuedToken, TokenCodec};
pub use verification::{InvalidReason, VerificationOutcome};
