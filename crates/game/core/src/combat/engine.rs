//! Pure resolution of player and shadow actions.
//!
//! Both entry points read a [`CombatSession`] and return a
//! [`SessionUpdate`] plus a log entry; they never write the session
//! themselves. Callers are expected to run
//! [`validate_player_action`](super::validate_player_action) first.

use super::ability::AbilityKind;
use super::action::{ActionCost, PlayerAction};
use super::damage::{
    apply_damage_reduction, calculate_illuminate_damage, calculate_shadow_health_damage,
};
use super::env::CombatEnv;
use super::result::{PlayerActionOutcome, ShadowActionOutcome};
use super::session::{Actor, CombatSession, LogEntry, SessionUpdate};

/// Resolves a validated player action against the current session.
pub fn execute_player_action(
    action: &PlayerAction,
    session: &CombatSession,
    env: &CombatEnv<'_>,
) -> PlayerActionOutcome {
    let cost = ActionCost::of(action, session, env);
    let mut update = SessionUpdate::unchanged(session);

    let resources = &mut update.resources;
    resources.light_points = resources.light_points.saturating_sub(cost.light_points);
    resources.shadow_points = resources.shadow_points.saturating_sub(cost.shadow_points);
    resources.energy = resources.energy.saturating_sub(cost.energy);

    let (damage_dealt, effect_description, message) = match action {
        PlayerAction::Illuminate => {
            let damage = calculate_illuminate_damage(env.trust_level, env.config);
            update.status_effects.consecutive_endure_count = 0;
            (
                damage,
                format!("dealt {damage} damage"),
                format!("Your light reveals {} for what it is.", session.enemy.name),
            )
        }
        PlayerAction::Reflect { .. } => {
            let converted = cost.shadow_points;
            update.resources.light_points =
                update.resources.light_points.saturating_add(converted);
            update.status_effects.consecutive_endure_count = 0;
            (
                0,
                format!("converted {converted} ShadowPoints into LightPoints"),
                "You look inward and find light within the shadow.".to_string(),
            )
        }
        PlayerAction::Endure => {
            update.status_effects.damage_reduction = env.config.endure_damage_reduction;
            update.status_effects.consecutive_endure_count = update
                .status_effects
                .consecutive_endure_count
                .saturating_add(1);
            (
                0,
                "braced for the next blow".to_string(),
                "You steady your breath and endure.".to_string(),
            )
        }
        PlayerAction::Embrace { .. } => {
            let accepted = cost.shadow_points;
            update.status_effects.consecutive_endure_count = 0;
            (
                accepted,
                format!("accepted {accepted} ShadowPoints as {accepted} damage"),
                format!("You stop resisting {} and it loosens its grip.", session.enemy.name),
            )
        }
    };

    update.enemy_hp = session.enemy.current_hp.saturating_sub(damage_dealt);

    let log_entry = LogEntry {
        turn: session.turn_number,
        actor: Actor::Player,
        action: action.kind().to_string(),
        effect_description,
        resource_delta: session.resources.delta_to(&update.resources),
        message,
    };

    PlayerActionOutcome {
        damage_dealt,
        update,
        log_entry,
    }
}

/// Resolves one shadow turn using `ability`.
///
/// Turn-limited blocks tick down first, then the ability's effect is
/// applied and damage is computed from the resulting effects. Single-hit
/// modifiers are cleared once the hit lands; `skip_next_turn` is left for
/// the store to consume.
pub fn execute_shadow_action(
    ability: AbilityKind,
    session: &CombatSession,
    env: &CombatEnv<'_>,
) -> ShadowActionOutcome {
    let config = env.config;
    let mut update = SessionUpdate::unchanged(session);

    let effects = ability.apply(session.status_effects.tick_round(), config);
    let raw_damage = calculate_shadow_health_damage(
        session.scene_difficulty,
        session.resources.light_points,
        &effects,
        env.trust_level,
        config,
    );
    let health_damage = apply_damage_reduction(raw_damage, &effects, config);

    update.resources.health = update.resources.health.saturating_sub(health_damage);
    update.status_effects = effects.after_shadow_hit();

    let log_entry = LogEntry {
        turn: session.turn_number,
        actor: Actor::Shadow,
        action: ability.to_string(),
        effect_description: ability.description().to_string(),
        resource_delta: session.resources.delta_to(&update.resources),
        message: format!("{} strikes for {health_damage} damage.", session.enemy.name),
    };

    ShadowActionOutcome {
        ability,
        health_damage,
        update,
        log_entry,
    }
}

/// Picks the shadow's move: the first ready ability, or the weak fallback.
pub fn select_shadow_ability(session: &CombatSession) -> AbilityKind {
    session
        .enemy
        .ready_ability()
        .unwrap_or(AbilityKind::Lingering)
}
