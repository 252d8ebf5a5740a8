//! Saving and restoring progress through the runtime.

use shadow_content::registry::WHISPER_OF_DOUBT;
use shadow_core::{ActionKind, PlayerAction, ResourceSnapshot};
use shadow_runtime::{
    FileSaveRepository, InMemorySaveRepository, ProgressionState, Runtime, RuntimeError,
    SaveData, SaveRepository,
};
use tempfile::TempDir;

#[tokio::test]
async fn progress_survives_a_restart() {
    let dir = TempDir::new().unwrap();

    let mut runtime = Runtime::builder()
        .repository(FileSaveRepository::new(dir.path()).unwrap())
        .initial_resources(ResourceSnapshot::new(80, 100, 90, 100, 12, 4))
        .progression(ProgressionState {
            level: 2,
            trust_level: 7,
        })
        .enable_energy_regen(false)
        .build()
        .await
        .unwrap();

    runtime.start_combat(WHISPER_OF_DOUBT, None).unwrap();
    runtime.execute_action(PlayerAction::Illuminate).unwrap();
    runtime.retreat().unwrap();
    let expected = runtime.resource_snapshot().unwrap();
    let saved = runtime.save().unwrap();
    assert!(saved.saved_at.is_some());
    runtime.shutdown().await.unwrap();

    let restored = Runtime::builder()
        .repository(FileSaveRepository::new(dir.path()).unwrap())
        .enable_energy_regen(false)
        .build()
        .await
        .unwrap();

    assert_eq!(restored.resource_snapshot().unwrap(), expected);
    assert_eq!(restored.progression().level, 2);
    assert_eq!(restored.progression().trust_level, 7);
    assert_eq!(restored.statistics().encounters, 1);
    assert_eq!(
        restored
            .statistics()
            .combat_actions
            .get(ActionKind::Illuminate),
        1
    );
}

#[tokio::test]
async fn missing_save_starts_from_defaults() {
    let mut runtime = Runtime::builder()
        .repository(InMemorySaveRepository::new())
        .enable_energy_regen(false)
        .build()
        .await
        .unwrap();

    assert_eq!(runtime.resource_snapshot().unwrap(), ResourceSnapshot::default());
    assert_eq!(runtime.progression(), ProgressionState::default());
    assert!(!runtime.load().unwrap());
}

#[tokio::test]
async fn load_is_refused_during_combat() {
    let repository = InMemorySaveRepository::with_save(SaveData::default());
    let mut runtime = Runtime::builder()
        .repository(repository)
        .enable_energy_regen(false)
        .build()
        .await
        .unwrap();

    runtime.start_combat(WHISPER_OF_DOUBT, None).unwrap();
    assert!(matches!(runtime.load(), Err(RuntimeError::CombatInProgress)));
}

#[tokio::test]
async fn save_without_repository_fails() {
    let runtime = Runtime::builder()
        .enable_energy_regen(false)
        .build()
        .await
        .unwrap();

    assert!(matches!(
        runtime.save(),
        Err(RuntimeError::RepositoryNotConfigured)
    ));
    // the snapshot is still available for external collaborators
    assert_eq!(runtime.save_data().unwrap().progression.level, 1);
}

#[test]
fn legacy_save_without_statistics_loads() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("save.json"),
        r#"{ "resources": { "health": 40, "max_health": 100, "energy": 20,
             "max_energy": 100, "light_points": 3, "shadow_points": 9 } }"#,
    )
    .unwrap();

    let repository = FileSaveRepository::new(dir.path()).unwrap();
    let data = repository.load().unwrap().unwrap();

    assert_eq!(data.resources.health, 40);
    assert_eq!(data.statistics.encounters, 0);
    assert_eq!(data.progression.level, 1);
}
