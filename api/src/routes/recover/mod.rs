//! Account recovery route handlers
//!
//! - `POST /recover` starts a recovery and emails a link
//! - `GET /recover/confirm` shows which account a link belongs to
//! - `POST /recover/confirm` sets the new password
//! - `GET /recover/cancel` discards the pending recovery

pub mod begin;
pub mod cancel;
pub mod confirm;

pub use begin::begin_recovery;
pub use cancel::cancel_recovery;
pub use confirm::{confirm_recovery, preview_recovery};

use std::sync::Arc;

use rc_core::repositories::AccountRepository;
use rc_core::services::RecoveryService;
use rc_infra::database::DatabasePool;
use rc_infra::email::EmailRecoveryNotifier;
use rc_infra::session::JwtSessionAuthenticator;
use rc_shared::SessionConfig;

/// Recovery service as wired behind the HTTP surface
pub type RecoveryApiService<R> = RecoveryService<R, EmailRecoveryNotifier, JwtSessionAuthenticator>;

/// Application state that holds shared services
pub struct AppState<R: AccountRepository> {
    pub recovery_service: Arc<RecoveryApiService<R>>,
    /// Answer not-found and deactivated begin requests like successful ones
    pub conceal_account_state: bool,
    /// Cookie settings for the session issued after recovery
    pub session: SessionConfig,
    /// Pool probed by the health check, when the accounts live in MySQL
    pub database: Option<DatabasePool>,
}
