//! Status effects active during an encounter.
//!
//! Unlike persistent conditions, these live only inside a
//! [`CombatSession`](super::CombatSession) and are discarded with it.
//! Turn-counted blocks tick down once per round.

/// Modifiers that shadow abilities and player stances apply to a round.
///
/// `damage_multiplier` scales the next shadow hit and resets after it lands.
/// `damage_reduction` is neutral at `1.0`: values below 1 scale incoming
/// damage down (ENDURE), values above 1 add defense through
/// [`calculate_player_defense`](super::calculate_player_defense).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    pub damage_multiplier: f64,
    pub damage_reduction: f64,
    pub healing_blocked_turns: u32,
    pub lp_gen_blocked_turns: u32,
    /// The shadow forfeits its next turn, letting the player act twice in a row.
    pub skip_next_turn: bool,
    pub consecutive_endure_count: u32,
}

impl StatusEffects {
    pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

    pub const fn new() -> Self {
        Self {
            damage_multiplier: Self::NEUTRAL_MULTIPLIER,
            damage_reduction: Self::NEUTRAL_MULTIPLIER,
            healing_blocked_turns: 0,
            lp_gen_blocked_turns: 0,
            skip_next_turn: false,
            consecutive_endure_count: 0,
        }
    }

    pub fn healing_blocked(&self) -> bool {
        self.healing_blocked_turns > 0
    }

    pub fn light_generation_blocked(&self) -> bool {
        self.lp_gen_blocked_turns > 0
    }

    /// Counts down the turn-limited blocks by one round.
    #[must_use]
    pub fn tick_round(mut self) -> Self {
        self.healing_blocked_turns = self.healing_blocked_turns.saturating_sub(1);
        self.lp_gen_blocked_turns = self.lp_gen_blocked_turns.saturating_sub(1);
        self
    }

    /// Clears the single-hit modifiers once a shadow attack has landed.
    #[must_use]
    pub fn after_shadow_hit(mut self) -> Self {
        self.damage_multiplier = Self::NEUTRAL_MULTIPLIER;
        self.damage_reduction = Self::NEUTRAL_MULTIPLIER;
        self
    }
}

impl Default for StatusEffects {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_round_saturates_at_zero() {
        let effects = StatusEffects {
            healing_blocked_turns: 1,
            lp_gen_blocked_turns: 0,
            ..StatusEffects::new()
        };

        let ticked = effects.tick_round().tick_round();

        assert_eq!(ticked.healing_blocked_turns, 0);
        assert_eq!(ticked.lp_gen_blocked_turns, 0);
        assert!(!ticked.healing_blocked());
    }

    #[test]
    fn shadow_hit_resets_single_hit_modifiers() {
        let effects = StatusEffects {
            damage_multiplier: 2.0,
            damage_reduction: 0.5,
            consecutive_endure_count: 2,
            ..StatusEffects::new()
        };

        let after = effects.after_shadow_hit();

        assert_eq!(after.damage_multiplier, 1.0);
        assert_eq!(after.damage_reduction, 1.0);
        assert_eq!(after.consecutive_endure_count, 2);
    }
}
