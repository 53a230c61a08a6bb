//! Shared utilities and common types for the Reclaim server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and loading
//! - Error codes and response structures
//! - Input validation (email, password strength, return URLs)
//! - Masking helpers for log output

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, CorsConfig, DatabaseConfig, EmailConfig, Environment, LoggingConfig,
    RecoveryConfig, ServerConfig, SessionConfig,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
pub use types::{ApiResponse, HealthResponse};
pub use utils::{masking, validation};
