//! Player actions, their costs and the affordability guard.
//!
//! The engine assumes every action it receives has passed
//! [`validate_player_action`]; guard failures never reach resolution and
//! never mutate anything.

use super::env::CombatEnv;
use super::session::{CombatPhase, CombatSession};
use crate::error::{CombatErrorKind, ErrorSeverity};

/// A move chosen by the player on their turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerAction {
    /// Spend LightPoints to strike the shadow.
    Illuminate,
    /// Convert up to `amount` ShadowPoints into LightPoints.
    Reflect { amount: u32 },
    /// Brace for the next shadow turn.
    Endure,
    /// Accept up to `amount` ShadowPoints, turning them into damage.
    Embrace { amount: u32 },
}

impl PlayerAction {
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Illuminate => ActionKind::Illuminate,
            Self::Reflect { .. } => ActionKind::Reflect,
            Self::Endure => ActionKind::Endure,
            Self::Embrace { .. } => ActionKind::Embrace,
        }
    }
}

/// Payload-free action identifier, used for tallies and log entries.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Illuminate,
    Reflect,
    Endure,
    Embrace,
}

/// Number of times each action was used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActionTally {
    pub illuminate: u32,
    pub reflect: u32,
    pub endure: u32,
    pub embrace: u32,
}

impl ActionTally {
    pub fn get(&self, kind: ActionKind) -> u32 {
        match kind {
            ActionKind::Illuminate => self.illuminate,
            ActionKind::Reflect => self.reflect,
            ActionKind::Endure => self.endure,
            ActionKind::Embrace => self.embrace,
        }
    }

    pub fn record(&mut self, kind: ActionKind) {
        let slot = match kind {
            ActionKind::Illuminate => &mut self.illuminate,
            ActionKind::Reflect => &mut self.reflect,
            ActionKind::Endure => &mut self.endure,
            ActionKind::Embrace => &mut self.embrace,
        };
        *slot = slot.saturating_add(1);
    }

    /// Adds `other` into `self`, field by field.
    pub fn merge(&mut self, other: &Self) {
        self.illuminate = self.illuminate.saturating_add(other.illuminate);
        self.reflect = self.reflect.saturating_add(other.reflect);
        self.endure = self.endure.saturating_add(other.endure);
        self.embrace = self.embrace.saturating_add(other.embrace);
    }

    pub fn total(&self) -> u32 {
        self.illuminate
            .saturating_add(self.reflect)
            .saturating_add(self.endure)
            .saturating_add(self.embrace)
    }
}

/// Resources an action will consume, after level reductions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionCost {
    pub light_points: u32,
    pub shadow_points: u32,
    pub energy: u32,
}

impl ActionCost {
    /// Prices `action` against the current session. Variable-amount actions
    /// are priced at what they will actually move (`min(amount, sp)`).
    pub fn of(action: &PlayerAction, session: &CombatSession, env: &CombatEnv<'_>) -> Self {
        let config = env.config;
        let benefits = &env.benefits;
        let available_sp = session.resources.shadow_points;
        match action {
            PlayerAction::Illuminate => Self {
                light_points: config.illuminate_light_cost,
                shadow_points: 0,
                energy: benefits.reduced_energy_cost(config.illuminate_energy_cost),
            },
            PlayerAction::Reflect { amount } => Self {
                light_points: 0,
                shadow_points: (*amount).min(available_sp),
                energy: benefits.reduced_energy_cost(config.reflect_energy_cost),
            },
            PlayerAction::Endure => Self::default(),
            PlayerAction::Embrace { amount } => Self {
                light_points: 0,
                shadow_points: (*amount).min(available_sp),
                energy: benefits.reduced_energy_cost(config.embrace_energy_cost),
            },
        }
    }
}

/// Reasons a player action is rejected before resolution.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("combat is not waiting for a player action (phase: {phase})")]
    NotPlayerTurn { phase: CombatPhase },

    #[error("{action} requires a non-zero amount")]
    ZeroAmount { action: ActionKind },

    #[error("not enough LightPoints: need {required}, have {available}")]
    InsufficientLightPoints { required: u32, available: u32 },

    #[error("not enough ShadowPoints: need {required}, have {available}")]
    InsufficientShadowPoints { required: u32, available: u32 },

    #[error("not enough energy: need {required}, have {available}")]
    InsufficientEnergy { required: u32, available: u32 },

    #[error("LightPoint generation is blocked for {turns} more turn(s)")]
    LightGenerationBlocked { turns: u32 },
}

impl CombatErrorKind for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotPlayerTurn { .. } | Self::ZeroAmount { .. } => ErrorSeverity::Validation,
            Self::InsufficientLightPoints { .. }
            | Self::InsufficientShadowPoints { .. }
            | Self::InsufficientEnergy { .. }
            | Self::LightGenerationBlocked { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotPlayerTurn { .. } => "not_player_turn",
            Self::ZeroAmount { .. } => "zero_amount",
            Self::InsufficientLightPoints { .. } => "insufficient_light_points",
            Self::InsufficientShadowPoints { .. } => "insufficient_shadow_points",
            Self::InsufficientEnergy { .. } => "insufficient_energy",
            Self::LightGenerationBlocked { .. } => "light_generation_blocked",
        }
    }
}

/// Checks turn order and affordability, returning the price on success.
pub fn validate_player_action(
    action: &PlayerAction,
    session: &CombatSession,
    env: &CombatEnv<'_>,
) -> Result<ActionCost, ActionError> {
    if !session.active || session.phase != CombatPhase::PlayerTurn {
        return Err(ActionError::NotPlayerTurn {
            phase: session.phase,
        });
    }

    let resources = &session.resources;
    match action {
        PlayerAction::Reflect { amount: 0 } => {
            return Err(ActionError::ZeroAmount {
                action: ActionKind::Reflect,
            });
        }
        PlayerAction::Embrace { amount: 0 } => {
            return Err(ActionError::ZeroAmount {
                action: ActionKind::Embrace,
            });
        }
        PlayerAction::Reflect { .. } | PlayerAction::Embrace { .. }
            if resources.shadow_points == 0 =>
        {
            return Err(ActionError::InsufficientShadowPoints {
                required: 1,
                available: 0,
            });
        }
        PlayerAction::Reflect { .. } if session.status_effects.light_generation_blocked() => {
            return Err(ActionError::LightGenerationBlocked {
                turns: session.status_effects.lp_gen_blocked_turns,
            });
        }
        _ => {}
    }

    let cost = ActionCost::of(action, session, env);

    if resources.light_points < cost.light_points {
        return Err(ActionError::InsufficientLightPoints {
            required: cost.light_points,
            available: resources.light_points,
        });
    }
    if resources.energy < cost.energy {
        return Err(ActionError::InsufficientEnergy {
            required: cost.energy,
            available: resources.energy,
        });
    }

    Ok(cost)
}
