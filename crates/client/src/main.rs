//! Headless shadow encounter simulator.
//!
//! Composition root that assembles the runtime from environment settings,
//! plays one encounter with a scripted policy and saves the result.
//!
//! ```bash
//! SHADOW_ENEMY=storm_of_overwhelm RUST_LOG=debug cargo run -p shadow-client
//! ```

mod config;
mod strategy;

use std::sync::Arc;

use anyhow::{Context, Result};
use shadow_content::{ConfigLoader, EnemyLoader, EnemyRegistry};
use shadow_core::{CombatConfig, CombatEnv};
use shadow_runtime::{
    FileSaveRepository, InMemoryJournal, Runtime, RuntimeConfig, SaveRepository,
};
use tracing::{info, warn};

use config::SimConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::from_env();
    run(config).await
}

async fn run(config: SimConfig) -> Result<()> {
    let combat = match &config.combat_config_file {
        Some(path) => ConfigLoader::load(path)?,
        None => CombatConfig::default(),
    };
    let enemies = match &config.enemy_file {
        Some(path) => EnemyLoader::load_into_builtin(path)?,
        None => EnemyRegistry::builtin(),
    };
    let repository = match &config.save_dir {
        Some(dir) => FileSaveRepository::new(dir),
        None => FileSaveRepository::in_data_dir(),
    }
    .context("failed to open save directory")?;
    info!("save file: {}", repository.path().display());
    let had_save = repository.exists();

    let journal = Arc::new(InMemoryJournal::new());
    let mut runtime = Runtime::builder()
        .config(RuntimeConfig {
            combat,
            ..RuntimeConfig::default()
        })
        .enemies(enemies)
        .repository(repository)
        .reflection_sink(journal.clone())
        .build()
        .await?;

    if !had_save {
        info!("no save found, starting fresh");
    }
    if let Some(level) = config.level {
        runtime.set_level(level)?;
    }
    if let Some(trust) = config.trust_level {
        runtime.set_trust_level(trust);
    }

    let session = runtime
        .start_combat(&config.enemy_id, config.scene_difficulty)
        .with_context(|| format!("could not start combat against '{}'", config.enemy_id))?;
    info!(
        enemy = %session.enemy.name,
        hp = session.enemy.current_hp,
        health = session.resources.health,
        light = session.resources.light_points,
        shadow = session.resources.shadow_points,
        "encounter begins"
    );

    let mut actions = 0;
    while !runtime.combat_end_status().is_ended && actions < config.max_turns {
        let Some(session) = runtime.session() else {
            break;
        };
        let progression = runtime.progression();
        let env = CombatEnv::new(&runtime.config().combat, progression.trust_level)
            .with_benefits(runtime.level_benefits());
        let action = strategy::choose_action(session, &env);

        let report = runtime.execute_action(action)?;
        actions += 1;

        info!("{}", report.player.log_entry.message);
        match &report.shadow {
            Some(shadow) => info!("{}", shadow.log_entry.message),
            None if report.shadow_skipped => info!("the shadow falters and loses its turn"),
            None => {}
        }
    }

    let summary = if runtime.combat_end_status().is_ended {
        let victory = runtime.combat_end_status().victory;
        runtime.end_combat(victory)?
    } else {
        warn!(actions, "turn limit reached, retreating");
        runtime.retreat()?
    };

    info!(
        victory = summary.victory,
        reason = %summary.reason,
        turns = summary.turns_played,
        "encounter over"
    );
    if let Err(error) = &summary.transaction {
        warn!("combat results were not applied: {}", error);
    }
    for record in journal.records() {
        info!("insight: {}", record.narrative_insight);
    }

    let resources = runtime.resource_snapshot()?;
    info!(
        health = resources.health,
        energy = resources.energy,
        light = resources.light_points,
        shadow = resources.shadow_points,
        "ledger after combat"
    );

    runtime.save()?;
    let statistics = runtime.statistics();
    info!(
        encounters = statistics.encounters,
        victories = statistics.victories,
        defeats = statistics.defeats,
        "progress saved"
    );

    runtime.shutdown().await?;
    Ok(())
}
