//! Long-term combat statistics.

use serde::{Deserialize, Serialize};

use shadow_core::ActionTally;

/// Lifetime totals folded in once per finished encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatStatistics {
    pub combat_actions: ActionTally,
    pub encounters: u32,
    pub victories: u32,
    pub defeats: u32,
    pub turns_played: u32,
}

impl CombatStatistics {
    /// The single write path from combat into long-term statistics.
    pub fn update_combat_statistics(&mut self, tally: &ActionTally, victory: bool, turns: u32) {
        self.combat_actions.merge(tally);
        self.encounters = self.encounters.saturating_add(1);
        if victory {
            self.victories = self.victories.saturating_add(1);
        } else {
            self.defeats = self.defeats.saturating_add(1);
        }
        self.turns_played = self.turns_played.saturating_add(turns);
    }
}
