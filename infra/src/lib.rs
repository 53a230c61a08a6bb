//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for Reclaim. It provides
//! concrete implementations of the collaborators the recovery flow depends on.
//!
//! ## Architecture
//!
//! - **Database**: MySQL account repository using SQLx
//! - **Email**: recovery message rendering and delivery (mock, HTTP email API)
//! - **Session**: JWT sessions issued after a completed recovery
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `mock-services`: Use mock implementations regardless of configuration

// Re-export core types for convenience
pub use rc_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Email module - recovery notifier and delivery providers
pub mod email;

/// Session module - JWT authenticator
pub mod session;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Email delivery error
    #[error("Email service error: {0}")]
    Email(String),

    /// Session token error
    #[error("Session error: {0}")]
    Session(String),
}
