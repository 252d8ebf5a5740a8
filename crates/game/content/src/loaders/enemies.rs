//! Enemy catalog loader.
//!
//! Loads additional shadow templates from RON files.

use std::path::Path;

use shadow_core::EnemyTemplate;

use crate::loaders::{LoadResult, read_file};
use crate::registry::EnemyRegistry;

/// Loader for enemy catalogs from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    /// Load an enemy catalog from a RON file.
    ///
    /// RON format: `Vec<EnemyTemplate>`
    ///
    /// ```ron
    /// [
    ///     (
    ///         id: "knot_of_worry",
    ///         name: "Knot of Worry",
    ///         category: Overwhelm,
    ///         max_hp: 16,
    ///         abilities: [Hesitation, SelfDoubt],
    ///         narrative_insight: "Worry rehearses a future that rarely arrives.",
    ///         victory_reward: 5,
    ///     ),
    /// ]
    /// ```
    pub fn load(path: &Path) -> LoadResult<Vec<EnemyTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse an enemy catalog from RON text, rejecting unusable templates.
    pub fn parse(content: &str) -> LoadResult<Vec<EnemyTemplate>> {
        let templates: Vec<EnemyTemplate> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy catalog RON: {}", e))?;

        for template in &templates {
            if template.max_hp == 0 {
                anyhow::bail!("Enemy '{}' must have at least 1 HP", template.id);
            }
            if template.id.is_empty() {
                anyhow::bail!("Enemy '{}' has an empty id", template.name);
            }
        }

        Ok(templates)
    }

    /// Built-in roster extended (and possibly overridden) by a RON catalog.
    pub fn load_into_builtin(path: &Path) -> LoadResult<EnemyRegistry> {
        let mut registry = EnemyRegistry::builtin();
        registry.extend(Self::load(path)?);
        Ok(registry)
    }
}
