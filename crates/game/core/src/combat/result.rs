//! Outcomes returned by the resolution engine.

use super::ability::AbilityKind;
use super::session::{LogEntry, SessionUpdate};

/// Result of resolving one player action.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerActionOutcome {
    /// Damage dealt to the shadow (0 for non-damaging actions).
    pub damage_dealt: u32,
    /// Next-state values for the session.
    pub update: SessionUpdate,
    pub log_entry: LogEntry,
}

/// Result of resolving one shadow turn.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowActionOutcome {
    pub ability: AbilityKind,
    /// Health removed from the player.
    pub health_damage: u32,
    /// Next-state values for the session.
    pub update: SessionUpdate,
    pub log_entry: LogEntry,
}
