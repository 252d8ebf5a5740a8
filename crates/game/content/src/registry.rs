//! Built-in shadow templates and the registry that serves them.

use std::collections::BTreeMap;

use shadow_core::{AbilityKind, EnemyCategory, EnemyOracle, EnemyTemplate};

/// Id of the gentlest built-in shadow, used as the default encounter.
pub const WHISPER_OF_DOUBT: &str = "whisper_of_doubt";
pub const VEIL_OF_ISOLATION: &str = "veil_of_isolation";
pub const STORM_OF_OVERWHELM: &str = "storm_of_overwhelm";
pub const ECHO_OF_OLD_WOUNDS: &str = "echo_of_old_wounds";

/// The four built-in shadows, in ascending difficulty.
pub fn builtin_templates() -> Vec<EnemyTemplate> {
    vec![
        EnemyTemplate {
            id: WHISPER_OF_DOUBT.into(),
            name: "Whisper of Doubt".into(),
            category: EnemyCategory::Doubt,
            max_hp: 15,
            abilities: vec![AbilityKind::SelfDoubt, AbilityKind::Hesitation],
            narrative_insight: "Doubt asks questions; it does not get to answer them.".into(),
            victory_reward: 5,
        },
        EnemyTemplate {
            id: VEIL_OF_ISOLATION.into(),
            name: "Veil of Isolation".into(),
            category: EnemyCategory::Isolation,
            max_hp: 18,
            abilities: vec![AbilityKind::Withdrawal, AbilityKind::Hesitation],
            narrative_insight: "Distance felt safe, but it also kept help away.".into(),
            victory_reward: 6,
        },
        EnemyTemplate {
            id: STORM_OF_OVERWHELM.into(),
            name: "Storm of Overwhelm".into(),
            category: EnemyCategory::Overwhelm,
            max_hp: 20,
            abilities: vec![AbilityKind::Flood, AbilityKind::SelfDoubt],
            narrative_insight: "Storms pass faster when you stop bracing against every gust."
                .into(),
            victory_reward: 7,
        },
        EnemyTemplate {
            id: ECHO_OF_OLD_WOUNDS.into(),
            name: "Echo of Old Wounds".into(),
            category: EnemyCategory::Grief,
            max_hp: 22,
            abilities: vec![AbilityKind::ReopenWound, AbilityKind::Withdrawal],
            narrative_insight: "What still hurts is asking to be seen, not relived.".into(),
            victory_reward: 8,
        },
    ]
}

/// Enemy templates keyed by id.
///
/// Templates are cloned out on lookup so combat can never mutate the roster.
#[derive(Clone, Debug, Default)]
pub struct EnemyRegistry {
    templates: BTreeMap<String, EnemyTemplate>,
}

impl EnemyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the four built-in shadows.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for template in builtin_templates() {
            registry.insert(template);
        }
        registry
    }

    /// Adds or replaces a template.
    pub fn insert(&mut self, template: EnemyTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    /// Adds every template, replacing same-id entries.
    pub fn extend(&mut self, templates: impl IntoIterator<Item = EnemyTemplate>) {
        for template in templates {
            self.insert(template);
        }
    }

    pub fn get(&self, id: &str) -> Option<&EnemyTemplate> {
        self.templates.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl EnemyOracle for EnemyRegistry {
    fn template(&self, id: &str) -> Option<EnemyTemplate> {
        self.templates.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_roster_matches_known_ids() {
        let registry = EnemyRegistry::builtin();
        assert_eq!(registry.len(), 4);

        let expected = [
            (WHISPER_OF_DOUBT, 15, 5),
            (VEIL_OF_ISOLATION, 18, 6),
            (STORM_OF_OVERWHELM, 20, 7),
            (ECHO_OF_OLD_WOUNDS, 22, 8),
        ];
        for (id, hp, reward) in expected {
            let template = registry.template(id).expect("built-in template");
            assert_eq!(template.max_hp, hp, "{id}");
            assert_eq!(template.victory_reward, reward, "{id}");
            assert!(!template.abilities.is_empty());
        }
    }

    #[test]
    fn builtin_roster_ascends_in_hp() {
        let hps: Vec<u32> = builtin_templates().iter().map(|t| t.max_hp).collect();
        assert!(hps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn unknown_id_is_none() {
        assert!(EnemyRegistry::builtin().template("not_a_shadow").is_none());
    }

    #[test]
    fn insert_replaces_same_id() {
        let mut registry = EnemyRegistry::builtin();
        let mut stronger = registry.template(WHISPER_OF_DOUBT).unwrap();
        stronger.max_hp = 30;

        registry.insert(stronger);

        assert_eq!(registry.len(), 4);
        assert_eq!(registry.template(WHISPER_OF_DOUBT).unwrap().max_hp, 30);
    }
}
