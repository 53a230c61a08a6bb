//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management
//! - Accounts table bootstrap
//! - Account repository implementation

pub mod connection;
pub mod mysql;
pub mod schema;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::MySqlAccountRepository;
pub use schema::ensure_schema;
