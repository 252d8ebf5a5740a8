//! Begin/validate/commit/rollback over a bounded audit history.

use std::collections::VecDeque;

use chrono::Utc;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use shadow_core::{CombatErrorKind, ErrorSeverity, ResourceKind, ResourceSnapshot};

use super::transaction::{
    SyncDirection, SyncErrorRecord, SyncStatus, SyncTransaction, TransactionId,
};
use crate::ledger::ResourceStore;

/// Limits applied by the transaction manager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncConfig {
    /// Largest change any single field may undergo in one transaction.
    pub max_field_change: u32,
    /// Resolved transactions kept for auditing; oldest dropped first.
    pub history_capacity: usize,
    /// Rejected and stale transactions kept for auditing; oldest dropped first.
    pub error_log_capacity: usize,
}

impl SyncConfig {
    pub const DEFAULT_MAX_FIELD_CHANGE: u32 = 100;
    pub const DEFAULT_HISTORY_CAPACITY: usize = 50;
    pub const DEFAULT_ERROR_LOG_CAPACITY: usize = 20;
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_field_change: Self::DEFAULT_MAX_FIELD_CHANGE,
            history_capacity: Self::DEFAULT_HISTORY_CAPACITY,
            error_log_capacity: Self::DEFAULT_ERROR_LOG_CAPACITY,
        }
    }
}

/// Reasons a synchronization is refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("{field} would change by {change}, beyond the limit of {limit}")]
    ExtremeChange {
        field: ResourceKind,
        change: i64,
        limit: u32,
    },

    #[error("{field} would be {value}, above its maximum of {max}")]
    ExceedsMaximum {
        field: ResourceKind,
        value: u32,
        max: u32,
    },

    #[error("no pending transaction {id}")]
    NotFound { id: TransactionId },

    #[error("receiving store changed after {id} was opened")]
    StaleSource { id: TransactionId },
}

impl CombatErrorKind for SyncError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ExtremeChange { .. } | Self::ExceedsMaximum { .. } => ErrorSeverity::Validation,
            Self::NotFound { .. } => ErrorSeverity::Validation,
            Self::StaleSource { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ExtremeChange { .. } => "extreme_change",
            Self::ExceedsMaximum { .. } => "exceeds_maximum",
            Self::NotFound { .. } => "transaction_not_found",
            Self::StaleSource { .. } => "stale_source",
        }
    }
}

/// The only path by which resource values cross between the ledger and a
/// combat session.
///
/// Validation runs entirely before mutation: a rejected `begin` leaves both
/// stores and the pending list untouched, and cancelling is simply rolling
/// back instead of committing.
#[derive(Debug)]
pub struct SyncTransactionManager {
    config: SyncConfig,
    next_id: u64,
    pending: Vec<SyncTransaction>,
    history: VecDeque<SyncTransaction>,
    error_log: VecDeque<SyncErrorRecord>,
}

impl SyncTransactionManager {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            history: VecDeque::with_capacity(config.history_capacity),
            error_log: VecDeque::with_capacity(config.error_log_capacity),
            config,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Stamps a new id and records both snapshots. Nothing is applied or
    /// tracked until the transaction is begun.
    pub fn create_sync_transaction(
        &mut self,
        direction: SyncDirection,
        source: ResourceSnapshot,
        target: ResourceSnapshot,
    ) -> SyncTransaction {
        let id = TransactionId(self.next_id);
        self.next_id += 1;

        SyncTransaction {
            id,
            direction,
            source,
            target,
            status: SyncStatus::Pending,
            timestamp: Utc::now(),
        }
    }

    /// Checks the per-field change bound and the declared maximums.
    pub fn validate_sync_transaction(&self, transaction: &SyncTransaction) -> Result<(), SyncError> {
        let limit = self.config.max_field_change;
        let source = &transaction.source;
        let target = &transaction.target;

        for field in ResourceKind::iter() {
            let change = i64::from(target.get(field)) - i64::from(source.get(field));
            if change.unsigned_abs() > u64::from(limit) {
                return Err(SyncError::ExtremeChange {
                    field,
                    change,
                    limit,
                });
            }
        }

        if target.health > target.max_health {
            return Err(SyncError::ExceedsMaximum {
                field: ResourceKind::Health,
                value: target.health,
                max: target.max_health,
            });
        }
        if target.energy > target.max_energy {
            return Err(SyncError::ExceedsMaximum {
                field: ResourceKind::Energy,
                value: target.energy,
                max: target.max_energy,
            });
        }

        Ok(())
    }

    /// Creates and validates a transaction, then parks it as pending.
    ///
    /// A rejected transaction is appended to the error log and nothing else
    /// changes.
    pub fn begin_sync_transaction(
        &mut self,
        direction: SyncDirection,
        source: ResourceSnapshot,
        target: ResourceSnapshot,
    ) -> Result<SyncTransaction, SyncError> {
        let transaction = self.create_sync_transaction(direction, source, target);

        if let Err(error) = self.validate_sync_transaction(&transaction) {
            warn!(
                tx_id = %transaction.id,
                direction = %direction,
                code = error.error_code(),
                "sync transaction rejected: {}",
                error
            );
            self.record_error(direction, error.to_string());
            return Err(error);
        }

        debug!(tx_id = %transaction.id, direction = %direction, "sync transaction opened");
        self.pending.push(transaction.clone());
        Ok(transaction)
    }

    /// Writes the target into the receiving store and moves the transaction
    /// into history.
    ///
    /// The receiver is picked from the transaction's direction. If it no
    /// longer matches the recorded source, the transaction is rolled back
    /// instead and [`SyncError::StaleSource`] is returned.
    pub fn commit_sync_transaction<'a>(
        &mut self,
        id: TransactionId,
        ledger: &'a mut dyn ResourceStore,
        session: &'a mut dyn ResourceStore,
    ) -> Result<SyncTransaction, SyncError> {
        let index = self.pending_index(id)?;
        let mut transaction = self.pending.remove(index);

        let receiver = match transaction.direction {
            SyncDirection::LedgerToSession => session,
            SyncDirection::SessionToLedger => ledger,
        };

        if receiver.resource_snapshot() != transaction.source {
            let error = SyncError::StaleSource { id };
            warn!(tx_id = %id, "sync transaction stale, rolling back");
            self.record_error(transaction.direction, error.to_string());
            transaction.status = SyncStatus::RolledBack;
            self.push_history(transaction);
            return Err(error);
        }

        receiver.apply_snapshot(&transaction.target);
        transaction.status = SyncStatus::Committed;

        info!(
            tx_id = %id,
            direction = %transaction.direction,
            "sync transaction committed"
        );
        self.push_history(transaction.clone());
        Ok(transaction)
    }

    /// Marks a pending transaction rolled back without applying anything.
    pub fn rollback_sync_transaction(
        &mut self,
        id: TransactionId,
    ) -> Result<SyncTransaction, SyncError> {
        let index = self.pending_index(id)?;
        let mut transaction = self.pending.remove(index);
        transaction.status = SyncStatus::RolledBack;

        info!(tx_id = %id, direction = %transaction.direction, "sync transaction rolled back");
        self.push_history(transaction.clone());
        Ok(transaction)
    }

    pub fn pending(&self) -> &[SyncTransaction] {
        &self.pending
    }

    /// Resolved transactions, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &SyncTransaction> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Most recently resolved transaction.
    pub fn last_transaction(&self) -> Option<&SyncTransaction> {
        self.history.back()
    }

    /// Rejected and stale transactions, oldest first.
    pub fn error_log(&self) -> impl ExactSizeIterator<Item = &SyncErrorRecord> {
        self.error_log.iter()
    }

    fn pending_index(&self, id: TransactionId) -> Result<usize, SyncError> {
        self.pending
            .iter()
            .position(|transaction| transaction.id == id)
            .ok_or(SyncError::NotFound { id })
    }

    fn push_history(&mut self, transaction: SyncTransaction) {
        if self.config.history_capacity == 0 {
            return;
        }
        while self.history.len() >= self.config.history_capacity {
            self.history.pop_front();
        }
        self.history.push_back(transaction);
    }

    fn record_error(&mut self, direction: SyncDirection, message: String) {
        if self.config.error_log_capacity == 0 {
            return;
        }
        while self.error_log.len() >= self.config.error_log_capacity {
            self.error_log.pop_front();
        }
        self.error_log.push_back(SyncErrorRecord {
            direction,
            message,
            timestamp: Utc::now(),
        });
    }
}

impl Default for SyncTransactionManager {
    fn default() -> Self {
        Self::new(SyncConfig::default())
    }
}
