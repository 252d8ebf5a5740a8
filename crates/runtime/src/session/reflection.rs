//! Hand-off of finished combat logs to journaling collaborators.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use shadow_core::LogEntry;

/// Everything a reflection collaborator receives when an encounter closes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionRecord {
    pub enemy_id: String,
    pub enemy_name: String,
    pub narrative_insight: String,
    pub victory: bool,
    pub log: Vec<LogEntry>,
}

/// Receives the combat log once a session ends.
///
/// Called synchronously from `end_combat`; implementations must not block.
pub trait ReflectionSink: Send + Sync {
    fn receive(&self, record: ReflectionRecord);
}

/// Sink that keeps every record in memory, for tests and the simulator.
#[derive(Debug, Default)]
pub struct InMemoryJournal {
    records: RwLock<Vec<ReflectionRecord>>,
}

impl InMemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of the records received so far.
    pub fn records(&self) -> Vec<ReflectionRecord> {
        self.records
            .read()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl ReflectionSink for InMemoryJournal {
    fn receive(&self, record: ReflectionRecord) {
        match self.records.write() {
            Ok(mut records) => records.push(record),
            Err(_) => tracing::warn!("reflection journal lock poisoned, dropping record"),
        }
    }
}
