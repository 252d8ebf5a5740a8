//! Synchronization boundary between the resource ledger and combat sessions.
//!
//! Resource values never cross between the two stores except through a
//! [`SyncTransaction`]: it is created and validated up front, parked as
//! pending, then either committed into the receiving store or rolled back.
//! Resolved transactions land in a bounded history for debugging.

mod manager;
mod transaction;

pub use manager::{SyncConfig, SyncError, SyncTransactionManager};
pub use transaction::{SyncDirection, SyncErrorRecord, SyncStatus, SyncTransaction, TransactionId};
