//! Energy regeneration metrics.
//!
//! Tracks how often the scheduler fired and why ticks were skipped.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by the energy scheduler on every tick.
///
/// Uses atomics for lock-free access across threads.
#[derive(Debug, Default)]
pub struct RegenMetrics {
    /// Ticks that reached the ledger and added energy
    applied: AtomicU64,

    /// Ticks refused by the activity gate (hidden, unfocused, in combat)
    gated: AtomicU64,

    /// Ticks that reached the ledger but gained nothing (full or not hydrated)
    idle: AtomicU64,

    /// Ticks dropped because the ledger lock was poisoned
    failed: AtomicU64,

    /// Total energy added by the scheduler
    energy_gained: AtomicU64,
}

impl RegenMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_applied(&self, gained: u32) {
        self.applied.fetch_add(1, Ordering::Relaxed);
        self.energy_gained
            .fetch_add(u64::from(gained), Ordering::Relaxed);
    }

    pub(crate) fn record_gated(&self) {
        self.gated.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_idle(&self) {
        self.idle.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Creates a snapshot of all counters for display/logging.
    ///
    /// Individual fields are read atomically; the snapshot as a whole may be
    /// inconsistent if a tick lands while it is taken.
    pub fn snapshot(&self) -> RegenMetricsSnapshot {
        RegenMetricsSnapshot {
            applied: self.applied.load(Ordering::Relaxed),
            gated: self.gated.load(Ordering::Relaxed),
            idle: self.idle.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            energy_gained: self.energy_gained.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegenMetricsSnapshot {
    pub applied: u64,
    pub gated: u64,
    pub idle: u64,
    pub failed: u64,
    pub energy_gained: u64,
}

impl RegenMetricsSnapshot {
    /// Every tick the scheduler processed, whatever its outcome.
    pub fn total_ticks(&self) -> u64 {
        self.applied + self.gated + self.idle + self.failed
    }
}
