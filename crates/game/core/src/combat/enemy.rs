//! Shadow enemies and their immutable templates.

use arrayvec::ArrayVec;

use super::ability::{Ability, AbilityKind};
use crate::config::CombatConfig;

/// Thematic family of a shadow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EnemyCategory {
    Doubt,
    Isolation,
    Overwhelm,
    Grief,
}

/// Read-only description an [`Enemy`] is instantiated from.
///
/// Templates are owned by the content registry and never mutated; every
/// encounter gets a fresh [`Enemy`] built by [`EnemyTemplate::instantiate`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub category: EnemyCategory,
    pub max_hp: u32,
    pub abilities: Vec<AbilityKind>,
    pub narrative_insight: String,
    /// LightPoints granted on victory.
    pub victory_reward: u32,
}

impl EnemyTemplate {
    /// Creates a live enemy at full HP with every ability ready.
    ///
    /// Abilities beyond [`CombatConfig::MAX_ABILITIES`] are ignored.
    pub fn instantiate(&self) -> Enemy {
        let abilities = self
            .abilities
            .iter()
            .take(CombatConfig::MAX_ABILITIES)
            .map(|kind| Ability::new(*kind))
            .collect();

        Enemy {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category,
            current_hp: self.max_hp,
            max_hp: self.max_hp,
            abilities,
            narrative_insight: self.narrative_insight.clone(),
            victory_reward: self.victory_reward,
        }
    }
}

/// Read access to enemy templates by id.
///
/// Implemented by the content registry; the runtime only sees this trait.
pub trait EnemyOracle: Send + Sync {
    /// Returns the template for `id`, if registered.
    fn template(&self, id: &str) -> Option<EnemyTemplate>;
}

/// A shadow taking part in the current encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enemy {
    pub id: String,
    pub name: String,
    pub category: EnemyCategory,
    pub current_hp: u32,
    pub max_hp: u32,
    pub abilities: ArrayVec<Ability, { CombatConfig::MAX_ABILITIES }>,
    pub narrative_insight: String,
    pub victory_reward: u32,
}

impl Enemy {
    pub fn is_defeated(&self) -> bool {
        self.current_hp == 0
    }

    /// First ability that is off cooldown, in template order.
    pub fn ready_ability(&self) -> Option<AbilityKind> {
        self.abilities
            .iter()
            .find(|ability| ability.is_ready())
            .map(|ability| ability.kind)
    }

    /// Counts every ability cooldown down by one round.
    pub fn tick_cooldowns(&mut self) {
        for ability in self.abilities.iter_mut() {
            *ability = ability.ticked();
        }
    }

    /// Puts `kind` on cooldown. Unknown kinds (the fallback attack) are ignored.
    pub fn mark_used(&mut self, kind: AbilityKind) {
        if let Some(ability) = self.abilities.iter_mut().find(|a| a.kind == kind) {
            *ability = ability.used();
        }
    }
}
