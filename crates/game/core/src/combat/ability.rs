//! Shadow abilities.
//!
//! Abilities are a closed table keyed by [`AbilityKind`]. Each kind maps to a
//! pure transform over [`StatusEffects`]; damage is computed afterwards by the
//! engine from the transformed effects.

use super::status::StatusEffects;
use crate::config::CombatConfig;

/// Identifies a shadow ability and its effect.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AbilityKind {
    /// The next hit lands 50% harder.
    SelfDoubt,
    /// LightPoint generation is blocked for two rounds.
    Hesitation,
    /// Healing is blocked for two rounds.
    Withdrawal,
    /// A doubled hit that exhausts the shadow: it skips its next turn.
    Flood,
    /// A slightly harder hit that blocks healing for three rounds.
    ReopenWound,
    /// Fallback attack used while every other ability is cooling down.
    Lingering,
}

impl AbilityKind {
    /// Cooldown applied after the ability is used.
    pub const fn cooldown_length(&self) -> u32 {
        match self {
            Self::SelfDoubt => 2,
            Self::Hesitation | Self::Withdrawal => 3,
            Self::Flood | Self::ReopenWound => 4,
            Self::Lingering => 0,
        }
    }

    /// Applies this ability's effect to the round's status effects.
    pub fn apply(&self, effects: StatusEffects, config: &CombatConfig) -> StatusEffects {
        let mut next = effects;
        match self {
            Self::SelfDoubt => next.damage_multiplier = 1.5,
            Self::Hesitation => next.lp_gen_blocked_turns = next.lp_gen_blocked_turns.max(2),
            Self::Withdrawal => next.healing_blocked_turns = next.healing_blocked_turns.max(2),
            Self::Flood => {
                next.damage_multiplier = 2.0;
                next.skip_next_turn = true;
            }
            Self::ReopenWound => {
                next.damage_multiplier = 1.25;
                next.healing_blocked_turns = next.healing_blocked_turns.max(3);
            }
            Self::Lingering => next.damage_multiplier = config.weak_attack_multiplier,
        }
        next
    }

    /// Short narrative description recorded in the combat log.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::SelfDoubt => "doubt sharpens the next blow",
            Self::Hesitation => "hesitation dims your light",
            Self::Withdrawal => "withdrawal keeps comfort out of reach",
            Self::Flood => "a flood of feeling crashes over you",
            Self::ReopenWound => "an old wound reopens",
            Self::Lingering => "the shadow lingers",
        }
    }
}

/// An ability instance owned by a live enemy, carrying its cooldown state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub kind: AbilityKind,
    pub cooldown_length: u32,
    pub current_cooldown: u32,
}

impl Ability {
    /// Fresh ability, ready to use.
    pub const fn new(kind: AbilityKind) -> Self {
        Self {
            kind,
            cooldown_length: kind.cooldown_length(),
            current_cooldown: 0,
        }
    }

    pub const fn is_ready(&self) -> bool {
        self.current_cooldown == 0
    }

    /// Puts the ability on cooldown after use.
    #[must_use]
    pub const fn used(mut self) -> Self {
        self.current_cooldown = self.cooldown_length;
        self
    }

    /// Counts the cooldown down by one round.
    #[must_use]
    pub const fn ticked(mut self) -> Self {
        self.current_cooldown = self.current_cooldown.saturating_sub(1);
        self
    }
}
