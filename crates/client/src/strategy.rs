//! Scripted player policy for headless encounters.

use shadow_core::{CombatEnv, CombatSession, PlayerAction, validate_player_action};

/// Picks the first affordable action in priority order:
/// ILLUMINATE, then EMBRACE when the remaining shadow can be finished off,
/// then REFLECT to refill LightPoints, falling back to ENDURE.
pub fn choose_action(session: &CombatSession, env: &CombatEnv<'_>) -> PlayerAction {
    let shadow_points = session.resources.shadow_points;
    let mut candidates = vec![PlayerAction::Illuminate];
    if shadow_points > 0 {
        if shadow_points >= session.enemy.current_hp {
            candidates.insert(
                0,
                PlayerAction::Embrace {
                    amount: session.enemy.current_hp,
                },
            );
        }
        candidates.push(PlayerAction::Reflect {
            amount: shadow_points,
        });
    }

    candidates
        .into_iter()
        .find(|action| validate_player_action(action, session, env).is_ok())
        .unwrap_or(PlayerAction::Endure)
}
