//! Transaction records exchanged at the ledger/session boundary.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shadow_core::ResourceSnapshot;

/// Monotonic identifier assigned by the transaction manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx-{}", self.0)
    }
}

/// Which store receives the target values on commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SyncDirection {
    LedgerToSession,
    SessionToLedger,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SyncStatus {
    Pending,
    Committed,
    RolledBack,
}

/// One atomic transfer of resource values between the two stores.
///
/// `source` is the receiving store's state when the transaction was opened;
/// `target` is what it will hold once committed. Validation bounds the
/// difference between the two.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncTransaction {
    pub id: TransactionId,
    pub direction: SyncDirection,
    pub source: ResourceSnapshot,
    pub target: ResourceSnapshot,
    pub status: SyncStatus,
    pub timestamp: DateTime<Utc>,
}

impl SyncTransaction {
    pub fn is_pending(&self) -> bool {
        self.status == SyncStatus::Pending
    }
}

/// Rejected or stale transaction recorded in the bounded error log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncErrorRecord {
    pub direction: SyncDirection,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
