//! Simulator configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use shadow_content::registry::WHISPER_OF_DOUBT;

/// Settings for one scripted encounter.
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub enemy_id: String,
    pub scene_difficulty: Option<u32>,
    pub level: Option<u32>,
    pub trust_level: Option<u32>,
    pub max_turns: u32,
    pub save_dir: Option<PathBuf>,
    pub enemy_file: Option<PathBuf>,
    pub combat_config_file: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            enemy_id: WHISPER_OF_DOUBT.to_string(),
            scene_difficulty: None,
            level: None,
            trust_level: None,
            max_turns: 50,
            save_dir: None,
            enemy_file: None,
            combat_config_file: None,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SHADOW_ENEMY` - Enemy template id (default: whisper_of_doubt)
    /// - `SHADOW_SCENE_DIFFICULTY` - Damage anchor for the scene (default: unset)
    /// - `SHADOW_LEVEL` - Player level override (default: saved level)
    /// - `SHADOW_TRUST_LEVEL` - Trust level override (default: saved trust)
    /// - `SHADOW_MAX_TURNS` - Give up and retreat after this many actions (default: 50)
    /// - `SHADOW_SAVE_DIR` - Directory for save.json (default: platform data dir)
    /// - `SHADOW_ENEMY_FILE` - RON file with extra enemy templates
    /// - `SHADOW_COMBAT_CONFIG` - TOML file with combat balance overrides
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(enemy) = env::var("SHADOW_ENEMY") {
            config.enemy_id = enemy;
        }
        config.scene_difficulty = read_env::<u32>("SHADOW_SCENE_DIFFICULTY");
        config.level = read_env::<u32>("SHADOW_LEVEL");
        config.trust_level = read_env::<u32>("SHADOW_TRUST_LEVEL");
        if let Some(turns) = read_env::<u32>("SHADOW_MAX_TURNS") {
            config.max_turns = turns.max(1);
        }
        config.save_dir = env::var("SHADOW_SAVE_DIR").ok().map(PathBuf::from);
        config.enemy_file = env::var("SHADOW_ENEMY_FILE").ok().map(PathBuf::from);
        config.combat_config_file = env::var("SHADOW_COMBAT_CONFIG").ok().map(PathBuf::from);

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
