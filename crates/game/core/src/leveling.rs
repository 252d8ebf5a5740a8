//! Level-derived formula modifiers.
//!
//! The progression system owns levels and experience; this module only maps a
//! level to the numeric benefits other formulas consume:
//!
//! - Max energy: +10 per 2 levels, starting at level 3
//! - Starting LightPoints: +5 per 3 levels
//! - Energy cost reduction: +1 per 4 levels
//! - Trust gain multiplier: +20% per 5 levels, starting at level 6

/// Numeric benefits granted by a player level.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelBenefits {
    pub max_energy_bonus: u32,
    pub starting_lp_bonus: u32,
    pub energy_cost_reduction: u32,
    pub trust_gain_multiplier: f64,
}

impl LevelBenefits {
    /// Benefits of a fresh level-1 character.
    pub const NONE: Self = Self {
        max_energy_bonus: 0,
        starting_lp_bonus: 0,
        energy_cost_reduction: 0,
        trust_gain_multiplier: 1.0,
    };

    /// Applies the cost reduction to a base energy price (never below 0).
    pub fn reduced_energy_cost(&self, base_cost: u32) -> u32 {
        base_cost.saturating_sub(self.energy_cost_reduction)
    }
}

impl Default for LevelBenefits {
    fn default() -> Self {
        Self::NONE
    }
}

/// Looks up the benefits for `level`. Levels below 1 are treated as 1.
pub fn level_benefits(level: u32) -> LevelBenefits {
    let level = level.max(1);

    let max_energy_bonus = if level >= 3 {
        ((level - 1) / 2).saturating_mul(10)
    } else {
        0
    };
    let starting_lp_bonus = (level / 3).saturating_mul(5);
    let energy_cost_reduction = level / 4;
    let trust_gain_multiplier = if level >= 6 {
        1.0 + 0.2 * f64::from((level - 1) / 5)
    } else {
        1.0
    };

    LevelBenefits {
        max_energy_bonus,
        starting_lp_bonus,
        energy_cost_reduction,
        trust_gain_multiplier,
    }
}

/// Scales a narrative trust gain by the level multiplier, rounding to nearest.
pub fn apply_trust_gain(base_gain: u32, level: u32) -> u32 {
    let multiplier = level_benefits(level).trust_gain_multiplier;
    (f64::from(base_gain) * multiplier)
        .round()
        .min(f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_one_has_no_benefits() {
        assert_eq!(level_benefits(1), LevelBenefits::NONE);
        assert_eq!(level_benefits(0), LevelBenefits::NONE);
    }

    #[test]
    fn max_energy_bonus_starts_at_level_three() {
        assert_eq!(level_benefits(2).max_energy_bonus, 0);
        assert_eq!(level_benefits(3).max_energy_bonus, 10);
        assert_eq!(level_benefits(4).max_energy_bonus, 10);
        assert_eq!(level_benefits(5).max_energy_bonus, 20);
        assert_eq!(level_benefits(10).max_energy_bonus, 40);
    }

    #[test]
    fn light_and_cost_bonuses_follow_their_steps() {
        assert_eq!(level_benefits(2).starting_lp_bonus, 0);
        assert_eq!(level_benefits(3).starting_lp_bonus, 5);
        assert_eq!(level_benefits(9).starting_lp_bonus, 15);

        assert_eq!(level_benefits(3).energy_cost_reduction, 0);
        assert_eq!(level_benefits(4).energy_cost_reduction, 1);
        assert_eq!(level_benefits(8).energy_cost_reduction, 2);
    }

    #[test]
    fn trust_multiplier_starts_at_level_six() {
        assert_eq!(level_benefits(5).trust_gain_multiplier, 1.0);
        assert!((level_benefits(6).trust_gain_multiplier - 1.2).abs() < 1e-9);
        assert!((level_benefits(10).trust_gain_multiplier - 1.2).abs() < 1e-9);
        assert!((level_benefits(11).trust_gain_multiplier - 1.4).abs() < 1e-9);
    }

    #[test]
    fn reduced_cost_saturates() {
        let benefits = level_benefits(16);
        assert_eq!(benefits.energy_cost_reduction, 4);
        assert_eq!(benefits.reduced_energy_cost(3), 0);
        assert_eq!(benefits.reduced_energy_cost(10), 6);
    }

    #[test]
    fn trust_gain_is_scaled() {
        assert_eq!(apply_trust_gain(10, 1), 10);
        assert_eq!(apply_trust_gain(10, 6), 12);
        assert_eq!(apply_trust_gain(10, 11), 14);
    }

    #[test]
    fn huge_levels_saturate() {
        let benefits = level_benefits(u32::MAX);
        assert_eq!(benefits.max_energy_bonus, u32::MAX);
        assert_eq!(benefits.starting_lp_bonus, u32::MAX);
        assert_eq!(benefits.energy_cost_reduction, u32::MAX / 4);
        assert_eq!(apply_trust_gain(u32::MAX, u32::MAX), u32::MAX);
    }
}
