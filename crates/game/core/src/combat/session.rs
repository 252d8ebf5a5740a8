//! Ephemeral state of a single encounter.

use super::action::ActionTally;
use super::enemy::Enemy;
use super::status::StatusEffects;
use crate::resources::{ResourceDelta, ResourceSnapshot};

/// Where an encounter is in its lifecycle.
///
/// `IDLE` is represented by the absence of a session; a live session moves
/// `PlayerTurn ⇄ ShadowTurn` until it reaches `Ended`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CombatPhase {
    PlayerTurn,
    ShadowTurn,
    Ended { victory: bool, reason: EndReason },
}

/// Why an encounter ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EndReason {
    /// The shadow's HP reached zero.
    EnemyDefeated,
    /// The player's health reached zero.
    PlayerDefeated,
    /// The player withdrew from the encounter.
    Retreated,
    /// The narrative layer closed the encounter with an explicit outcome.
    Resolved,
}

/// Summary handed back to the narrative layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatEndStatus {
    pub is_ended: bool,
    pub victory: bool,
    pub reason: Option<EndReason>,
}

/// Who produced a log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Actor {
    Player,
    Shadow,
}

/// One resolved action, appended to the session log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub turn: u32,
    pub actor: Actor,
    pub action: String,
    pub effect_description: String,
    pub resource_delta: ResourceDelta,
    pub message: String,
}

/// State owned by one encounter.
///
/// `resources` is a working copy of the ledger snapshot, written only by the
/// synchronization boundary at start and read back by it at the end.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSession {
    pub active: bool,
    pub phase: CombatPhase,
    pub enemy: Enemy,
    pub resources: ResourceSnapshot,
    pub turn_number: u32,
    pub log: Vec<LogEntry>,
    pub scene_difficulty: Option<u32>,
    pub status_effects: StatusEffects,
    pub action_tally: ActionTally,
}

impl CombatSession {
    /// Opens an encounter on turn 1 with an empty log.
    pub fn new(enemy: Enemy, resources: ResourceSnapshot, scene_difficulty: Option<u32>) -> Self {
        Self {
            active: true,
            phase: CombatPhase::PlayerTurn,
            enemy,
            resources,
            turn_number: 1,
            log: Vec::new(),
            scene_difficulty,
            status_effects: StatusEffects::new(),
            action_tally: ActionTally::default(),
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, CombatPhase::Ended { .. })
    }

    pub fn end_status(&self) -> CombatEndStatus {
        match self.phase {
            CombatPhase::Ended { victory, reason } => CombatEndStatus {
                is_ended: true,
                victory,
                reason: Some(reason),
            },
            _ => CombatEndStatus::default(),
        }
    }

    /// Marks the session finished. The first recorded outcome wins.
    pub fn finish(&mut self, victory: bool, reason: EndReason) {
        if !self.is_ended() {
            self.phase = CombatPhase::Ended { victory, reason };
        }
        self.active = false;
    }
}

/// Next-state values produced by the engine for the store to apply.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionUpdate {
    pub resources: ResourceSnapshot,
    pub status_effects: StatusEffects,
    pub enemy_hp: u32,
}

impl SessionUpdate {
    /// Update that leaves every field as it is in `session`.
    pub fn unchanged(session: &CombatSession) -> Self {
        Self {
            resources: session.resources,
            status_effects: session.status_effects,
            enemy_hp: session.enemy.current_hp,
        }
    }

    pub fn apply_to(&self, session: &mut CombatSession) {
        session.resources = self.resources;
        session.status_effects = self.status_effects;
        session.enemy.current_hp = self.enemy_hp;
    }
}
