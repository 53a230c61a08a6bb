//! Common utility functions

pub mod masking;
pub mod validation;

// Re-export commonly used utilities
pub use masking::*;
pub use validation::*;
