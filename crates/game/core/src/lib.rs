//! Deterministic combat rules and resource types for shadow encounters.
//!
//! `shadow-core` defines the canonical rules (actions, damage formulas,
//! abilities, leveling benefits) and the data types exchanged between the
//! resource ledger and combat sessions. Everything here is pure: no I/O, no
//! clocks, no async. The runtime crate owns the stores and the
//! synchronization boundary between them.
pub mod combat;
pub mod config;
pub mod error;
pub mod leveling;
pub mod resources;

pub use combat::{
    Ability, AbilityKind, ActionCost, ActionError, ActionKind, ActionTally, Actor,
    CombatEndStatus, CombatEnv, CombatPhase, CombatSession, EndReason, Enemy, EnemyCategory,
    EnemyOracle, EnemyTemplate, LogEntry, PlayerAction, PlayerActionOutcome, SessionUpdate,
    ShadowActionOutcome, StatusEffects, calculate_player_defense, calculate_shadow_health_damage,
    execute_player_action, execute_shadow_action, select_shadow_ability, validate_player_action,
};
pub use config::CombatConfig;
pub use error::{CombatErrorKind, ErrorSeverity};
pub use leveling::{LevelBenefits, apply_trust_gain, level_benefits};
pub use resources::{
    ResourceDelta, ResourceKind, ResourcePatch, ResourceSnapshot, clamp_add,
    saturating_add_signed,
};
