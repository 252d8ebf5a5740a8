//! Damage and defense formulas.

use super::status::StatusEffects;
use crate::config::CombatConfig;

/// Player defense against a shadow hit.
///
/// # Formula
///
/// ```text
/// defense = light_points × 0.5
///         + trust_level × 0.1
///         + max(0, damage_reduction − 1) × 5
/// ```
pub fn calculate_player_defense(
    light_points: u32,
    effects: &StatusEffects,
    trust_level: u32,
) -> f64 {
    let light = f64::from(light_points) * 0.5;
    let trust = f64::from(trust_level) * 0.1;
    let stance = (effects.damage_reduction - 1.0).max(0.0) * 5.0;
    light + trust + stance
}

/// Health damage dealt by a shadow hit.
///
/// # Formula
///
/// ```text
/// anchor = scene_difficulty, or base_shadow_damage when unset
/// damage = max(min_shadow_damage, round((anchor − defense) × damage_multiplier))
/// ```
///
/// The floor guarantees a hit is never fully negated, however high defense is.
pub fn calculate_shadow_health_damage(
    scene_difficulty: Option<u32>,
    light_points: u32,
    effects: &StatusEffects,
    trust_level: u32,
    config: &CombatConfig,
) -> u32 {
    let anchor = f64::from(scene_difficulty.unwrap_or(config.base_shadow_damage));
    let defense = calculate_player_defense(light_points, effects, trust_level);
    let raw = ((anchor - defense) * effects.damage_multiplier).round();
    floor_damage(raw, config)
}

/// Scales a computed hit by a damage reduction below 1.0 (ENDURE), keeping the floor.
pub fn apply_damage_reduction(damage: u32, effects: &StatusEffects, config: &CombatConfig) -> u32 {
    if effects.damage_reduction >= 1.0 {
        return damage;
    }
    let reduction = effects.damage_reduction.max(0.0);
    floor_damage((f64::from(damage) * reduction).round(), config)
}

/// ILLUMINATE damage: `base + floor(trust_level / 4)`.
pub fn calculate_illuminate_damage(trust_level: u32, config: &CombatConfig) -> u32 {
    config.illuminate_base_damage + trust_level / 4
}

fn floor_damage(raw: f64, config: &CombatConfig) -> u32 {
    let min = config.min_shadow_damage;
    if raw.is_nan() || raw <= f64::from(min) {
        min
    } else if raw >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        raw as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defense_combines_light_trust_and_stance() {
        let effects = StatusEffects {
            damage_reduction: 1.4,
            ..StatusEffects::new()
        };

        let defense = calculate_player_defense(10, &effects, 20);

        // 10 × 0.5 + 20 × 0.1 + 0.4 × 5 = 5 + 2 + 2
        assert!((defense - 9.0).abs() < 1e-9);
    }

    #[test]
    fn reduction_below_one_adds_no_defense() {
        let effects = StatusEffects {
            damage_reduction: 0.5,
            ..StatusEffects::new()
        };

        assert_eq!(calculate_player_defense(0, &effects, 0), 0.0);
    }

    #[test]
    fn scene_difficulty_anchors_damage() {
        let config = CombatConfig::default();
        let effects = StatusEffects {
            damage_multiplier: 1.5,
            ..StatusEffects::new()
        };

        // (12 − 4 × 0.5) × 1.5 = 15
        assert_eq!(calculate_shadow_health_damage(Some(12), 4, &effects, 0, &config), 15);
    }

    #[test]
    fn base_damage_used_without_scene_difficulty() {
        let config = CombatConfig::default();
        let effects = StatusEffects::new();

        assert_eq!(
            calculate_shadow_health_damage(None, 0, &effects, 0, &config),
            config.base_shadow_damage
        );
    }

    #[test]
    fn endure_halves_and_keeps_floor() {
        let config = CombatConfig::default();
        let endured = StatusEffects {
            damage_reduction: 0.5,
            ..StatusEffects::new()
        };

        assert_eq!(apply_damage_reduction(9, &endured, &config), 5);
        assert_eq!(apply_damage_reduction(1, &endured, &config), 1);
        assert_eq!(apply_damage_reduction(9, &StatusEffects::new(), &config), 9);
    }

    #[test]
    fn illuminate_scales_with_trust() {
        let config = CombatConfig::default();
        assert_eq!(calculate_illuminate_damage(0, &config), 3);
        assert_eq!(calculate_illuminate_damage(7, &config), 4);
        assert_eq!(calculate_illuminate_damage(8, &config), 5);
    }

    proptest! {
        #[test]
        fn shadow_damage_never_below_floor(
            difficulty in proptest::option::of(0u32..200),
            light_points in 0u32..10_000,
            trust in 0u32..1_000,
            multiplier in 0.0f64..4.0,
            reduction in 0.0f64..3.0,
            floor in 1u32..5,
        ) {
            let config = CombatConfig::default().with_min_shadow_damage(floor);
            let effects = StatusEffects {
                damage_multiplier: multiplier,
                damage_reduction: reduction,
                ..StatusEffects::new()
            };

            let damage = calculate_shadow_health_damage(difficulty, light_points, &effects, trust, &config);
            prop_assert!(damage >= floor);
            prop_assert!(apply_damage_reduction(damage, &effects, &config) >= floor);
        }
    }
}
