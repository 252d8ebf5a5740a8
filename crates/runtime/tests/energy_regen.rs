//! Background energy regeneration against a running runtime.

use std::time::Duration;

use shadow_content::registry::WHISPER_OF_DOUBT;
use shadow_core::ResourceSnapshot;
use shadow_runtime::{CombatEvent, Runtime, RuntimeConfig, SchedulerConfig, Topic};

async fn runtime_with_energy(energy: u32) -> Runtime {
    let config = RuntimeConfig {
        scheduler: SchedulerConfig {
            interval: Duration::from_secs(30),
            regen_amount: 1,
        },
        ..RuntimeConfig::default()
    };
    Runtime::builder()
        .config(config)
        .initial_resources(ResourceSnapshot::new(100, 100, energy, 100, 10, 0))
        .build()
        .await
        .unwrap()
}

fn ledger_energy(runtime: &Runtime) -> u32 {
    runtime.resource_snapshot().unwrap().energy
}

#[tokio::test(start_paused = true)]
async fn regeneration_pauses_for_combat() {
    let mut runtime = runtime_with_energy(50).await;

    runtime.start_combat(WHISPER_OF_DOUBT, None).unwrap();
    tokio::time::sleep(Duration::from_secs(95)).await;
    assert_eq!(ledger_energy(&runtime), 50);

    runtime.retreat().unwrap();
    assert_eq!(ledger_energy(&runtime), 50);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(ledger_energy(&runtime), 51);

    let metrics = runtime.scheduler_metrics().unwrap();
    assert_eq!(metrics.gated, 3);
    assert_eq!(metrics.applied, 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn regeneration_pauses_while_hidden() {
    let runtime = runtime_with_energy(50).await;

    runtime.set_visible(false);
    tokio::time::sleep(Duration::from_secs(65)).await;
    assert_eq!(ledger_energy(&runtime), 50);

    runtime.set_visible(true);
    runtime.set_focused(false);
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(ledger_energy(&runtime), 50);

    runtime.set_focused(true);
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(ledger_energy(&runtime), 51);

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn regeneration_events_reach_subscribers() {
    let runtime = runtime_with_energy(98).await;
    let mut events = runtime.subscribe(Topic::Energy);

    tokio::time::sleep(Duration::from_secs(125)).await;

    assert_eq!(
        events.recv().await.unwrap(),
        CombatEvent::EnergyRegenerated {
            gained: 1,
            energy: 99
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        CombatEvent::EnergyRegenerated {
            gained: 1,
            energy: 100
        }
    );
    assert!(events.try_recv().is_err());
    assert_eq!(ledger_energy(&runtime), 100);

    runtime.shutdown().await.unwrap();
}
