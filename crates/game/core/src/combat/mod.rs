//! Combat resolution system.
//!
//! This module provides pure functions for resolving shadow encounters.
//! All resolution is deterministic and side-effect free.
//!
//! # Architecture
//!
//! - **Pure Functions**: the engine reads a [`CombatSession`] and returns a [`SessionUpdate`]
//! - **Guarded Input**: [`validate_player_action`] runs before the engine, never inside it
//! - **Ability Table**: shadow moves are a closed [`AbilityKind`] enum, not trait objects
//!
//! # Core Functions
//!
//! - `execute_player_action`: ILLUMINATE / REFLECT / ENDURE / EMBRACE
//! - `execute_shadow_action`: ability effect + shadow damage
//! - `calculate_player_defense` / `calculate_shadow_health_damage`: damage formulas

pub mod ability;
pub mod action;
pub mod damage;
pub mod enemy;
pub mod engine;
pub mod env;
pub mod result;
pub mod session;
pub mod status;

pub use ability::{Ability, AbilityKind};
pub use action::{
    ActionCost, ActionError, ActionKind, ActionTally, PlayerAction, validate_player_action,
};
pub use damage::{
    apply_damage_reduction, calculate_illuminate_damage, calculate_player_defense,
    calculate_shadow_health_damage,
};
pub use enemy::{Enemy, EnemyCategory, EnemyOracle, EnemyTemplate};
pub use engine::{execute_player_action, execute_shadow_action, select_shadow_ability};
pub use env::CombatEnv;
pub use result::{PlayerActionOutcome, ShadowActionOutcome};
pub use session::{
    Actor, CombatEndStatus, CombatPhase, CombatSession, EndReason, LogEntry, SessionUpdate,
};
pub use status::StatusEffects;
