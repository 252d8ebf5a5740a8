//! Event types for different topics.

use serde::{Deserialize, Serialize};

use shadow_core::{AbilityKind, ActionKind, EndReason, ResourceSnapshot};

use crate::sync::{SyncDirection, TransactionId};

/// Everything the runtime announces to observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A session was opened and resources moved into it.
    CombatStarted {
        enemy_id: String,
        enemy_hp: u32,
        resources: ResourceSnapshot,
    },

    /// A player action was resolved.
    ActionResolved {
        turn: u32,
        action: ActionKind,
        damage_dealt: u32,
        enemy_hp: u32,
    },

    /// The shadow took its turn.
    ShadowActed {
        turn: u32,
        ability: AbilityKind,
        health_damage: u32,
        health: u32,
    },

    /// A session was closed.
    CombatEnded {
        enemy_id: String,
        victory: bool,
        reason: EndReason,
        turns_played: u32,
    },

    TransactionCommitted {
        id: TransactionId,
        direction: SyncDirection,
    },

    /// A transaction failed validation; nothing was applied.
    TransactionRejected {
        direction: SyncDirection,
        reason: String,
    },

    TransactionRolledBack {
        id: TransactionId,
        direction: SyncDirection,
    },

    /// Background regeneration added energy to the ledger.
    EnergyRegenerated { gained: u32, energy: u32 },
}
