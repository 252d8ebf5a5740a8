//! Combat balance loader.

use std::path::Path;

use shadow_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat balance from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`CombatConfig`] from a TOML file.
    ///
    /// Keys missing from the file keep their defaults, so a file only needs
    /// to list the values it tunes:
    ///
    /// ```toml
    /// min_shadow_damage = 2
    /// base_shadow_damage = 10
    /// ```
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a [`CombatConfig`] from TOML text.
    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse combat TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse("min_shadow_damage = 2\n").unwrap();

        assert_eq!(config.min_shadow_damage, 2);
        assert_eq!(
            config.base_shadow_damage,
            CombatConfig::DEFAULT_BASE_SHADOW_DAMAGE
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(ConfigLoader::parse("min_shadow_damage = \"lots\"").is_err());
    }
}
