//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the session store, repositories and the background
//! scheduler so clients can bubble them up with consistent context.

use thiserror::Error;

pub use crate::repository::RepositoryError;
pub use crate::session::SessionError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("unknown enemy '{0}'")]
    UnknownEnemy(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("no save repository configured")]
    RepositoryNotConfigured,

    #[error("resource ledger lock was poisoned")]
    LockPoisoned,

    #[error("operation not allowed while combat is active")]
    CombatInProgress,

    #[error("energy scheduler join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
