//! Persisted save data.
//!
//! Every section and field falls back to its default when missing, so saves
//! written before leveling or statistics existed still load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shadow_core::ResourceSnapshot;

use crate::statistics::CombatStatistics;

/// Narrative progression inputs consumed by combat formulas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionState {
    pub level: u32,
    pub trust_level: u32,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self {
            level: 1,
            trust_level: 0,
        }
    }
}

/// Everything the runtime persists between sessions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    pub resources: ResourceSnapshot,
    pub progression: ProgressionState,
    pub statistics: CombatStatistics,
    pub saved_at: Option<DateTime<Utc>>,
}
