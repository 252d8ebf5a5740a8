//! Runtime orchestration for shadow encounters.
//!
//! This crate wires the pure combat rules from `shadow-core` to the two
//! stateful stores (the persistent resource ledger and the ephemeral combat
//! session) and keeps them consistent through explicit sync transactions.
//! Consumers embed [`Runtime`] to start encounters, resolve actions,
//! subscribe to events and persist progress.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`ledger`] owns the long-lived player resources
//! - [`session`] drives a single encounter on a working copy
//! - [`sync`] validates and commits transfers between the two stores
//! - [`events`] provides a topic-based event bus
//! - [`repository`] persists the ledger, progression and statistics
//! - background energy regeneration stays internal to the crate
pub mod error;
pub mod events;
pub mod ledger;
pub mod repository;
pub mod runtime;
pub mod session;
pub mod statistics;
pub mod sync;

mod workers;

pub use error::{Result, RuntimeError};
pub use events::{CombatEvent, EventBus, Topic};
pub use ledger::{LedgerHandle, LedgerReader, ResourceLedger, ResourceStore};
pub use repository::{
    FileSaveRepository, InMemorySaveRepository, ProgressionState, RepositoryError, SaveData,
    SaveRepository,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use session::{
    CombatSessionStore, CombatSummary, InMemoryJournal, ReflectionRecord, ReflectionSink,
    SessionError, TurnReport,
};
pub use statistics::CombatStatistics;
pub use sync::{
    SyncConfig, SyncDirection, SyncError, SyncErrorRecord, SyncStatus, SyncTransaction,
    SyncTransactionManager, TransactionId,
};
pub use workers::{
    ActivityGate, EnergyScheduler, EnergySchedulerHandle, RegenMetrics, RegenMetricsSnapshot,
    SchedulerConfig,
};
