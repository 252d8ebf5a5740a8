//! Transfers between the resource ledger and a combat session.

use proptest::prelude::*;
use shadow_core::{
    CombatConfig, CombatSession, EnemyCategory, EnemyTemplate, ResourceKind, ResourceSnapshot,
    StatusEffects, calculate_shadow_health_damage,
};
use shadow_runtime::{
    ResourceLedger, ResourceStore, SyncConfig, SyncDirection, SyncError, SyncStatus,
    SyncTransactionManager, TransactionId,
};

fn session_with(resources: ResourceSnapshot) -> CombatSession {
    let template = EnemyTemplate {
        id: "mirror".into(),
        name: "Mirror".into(),
        category: EnemyCategory::Doubt,
        max_hp: 10,
        abilities: vec![],
        narrative_insight: String::new(),
        victory_reward: 0,
    };
    CombatSession::new(template.instantiate(), resources, None)
}

#[test]
fn extreme_change_is_rejected_before_anything_moves() {
    let start = ResourceSnapshot::new(100, 100, 100, 100, 10, 0);
    let mut ledger = ResourceLedger::new(start);
    let mut session = session_with(start);
    let mut manager = SyncTransactionManager::default();

    let mut target = start;
    target.light_points = 150;
    let result = manager.begin_sync_transaction(SyncDirection::SessionToLedger, start, target);

    assert!(matches!(
        result,
        Err(SyncError::ExtremeChange {
            field: ResourceKind::LightPoints,
            change: 140,
            limit: 100,
        })
    ));
    assert_eq!(ledger.resource_snapshot(), start);
    assert_eq!(session.resource_snapshot(), start);
    assert!(manager.pending().is_empty());
    assert_eq!(manager.history_len(), 0);
    assert_eq!(manager.error_log().len(), 1);

    // the stores are still usable afterwards
    target.light_points = 60;
    let tx = manager
        .begin_sync_transaction(SyncDirection::SessionToLedger, start, target)
        .unwrap();
    manager
        .commit_sync_transaction(tx.id, &mut ledger, &mut session)
        .unwrap();
    assert_eq!(ledger.resource_snapshot().light_points, 60);
}

#[test]
fn unknown_id_leaves_manager_untouched() {
    let start = ResourceSnapshot::default();
    let mut ledger = ResourceLedger::new(start);
    let mut session = session_with(start);
    let mut manager = SyncTransactionManager::default();
    manager
        .begin_sync_transaction(SyncDirection::LedgerToSession, start, start)
        .unwrap();

    let missing = TransactionId(999);
    assert!(matches!(
        manager.commit_sync_transaction(missing, &mut ledger, &mut session),
        Err(SyncError::NotFound { .. })
    ));
    assert!(matches!(
        manager.rollback_sync_transaction(missing),
        Err(SyncError::NotFound { .. })
    ));
    assert_eq!(manager.pending().len(), 1);
    assert_eq!(manager.history_len(), 0);
}

#[test]
fn stale_receiver_rolls_back() {
    let start = ResourceSnapshot::new(100, 100, 50, 100, 0, 0);
    let mut ledger = ResourceLedger::new(start);
    let mut session = session_with(start);
    let mut manager = SyncTransactionManager::default();

    let mut target = start;
    target.energy = 40;
    let tx = manager
        .begin_sync_transaction(SyncDirection::SessionToLedger, start, target)
        .unwrap();
    // a regeneration tick slipped in between begin and commit
    ledger.regenerate_energy(1);

    assert!(matches!(
        manager.commit_sync_transaction(tx.id, &mut ledger, &mut session),
        Err(SyncError::StaleSource { .. })
    ));
    assert_eq!(ledger.resource_snapshot().energy, 51);
    assert_eq!(
        manager.last_transaction().map(|tx| tx.status),
        Some(SyncStatus::RolledBack)
    );
}

#[test]
fn history_is_bounded() {
    let start = ResourceSnapshot::default();
    let mut ledger = ResourceLedger::new(start);
    let mut session = session_with(start);
    let mut manager = SyncTransactionManager::new(SyncConfig {
        history_capacity: 3,
        ..SyncConfig::default()
    });

    for _ in 0..5 {
        let tx = manager
            .begin_sync_transaction(SyncDirection::LedgerToSession, start, start)
            .unwrap();
        manager
            .commit_sync_transaction(tx.id, &mut ledger, &mut session)
            .unwrap();
    }

    let ids: Vec<_> = manager.history().map(|tx| tx.id).collect();
    assert_eq!(ids, vec![TransactionId(3), TransactionId(4), TransactionId(5)]);
}

fn arb_snapshot() -> impl Strategy<Value = ResourceSnapshot> {
    (1u32..500, 1u32..500, 0u32..1000, 0u32..1000).prop_flat_map(|(max_h, max_e, lp, sp)| {
        (0..=max_h, 0..=max_e)
            .prop_map(move |(h, e)| ResourceSnapshot::new(h, max_h, e, max_e, lp, sp))
    })
}

proptest! {
    #[test]
    fn ledger_stays_in_bounds(
        start in arb_snapshot(),
        deltas in prop::collection::vec((0usize..4, -300i64..300), 0..40),
    ) {
        let mut ledger = ResourceLedger::new(start);
        let kinds = [
            ResourceKind::Health,
            ResourceKind::Energy,
            ResourceKind::LightPoints,
            ResourceKind::ShadowPoints,
        ];
        for (kind, delta) in deltas {
            ledger.modify(kinds[kind], delta);
            let snapshot = ledger.resource_snapshot();
            prop_assert!(snapshot.health <= snapshot.max_health);
            prop_assert!(snapshot.energy <= snapshot.max_energy);
        }
    }

    #[test]
    fn conversion_conserves_points(start in arb_snapshot(), amount in 0u32..2000) {
        let mut ledger = ResourceLedger::new(start);
        let moved = ledger.convert_shadow_to_light(amount);
        let after = ledger.resource_snapshot();

        prop_assert_eq!(moved, amount.min(start.shadow_points));
        prop_assert_eq!(
            u64::from(after.light_points) + u64::from(after.shadow_points),
            u64::from(start.light_points) + u64::from(start.shadow_points)
        );
    }

    #[test]
    fn shadow_hits_never_fall_below_floor(
        difficulty in prop::option::of(0u32..200),
        light_points in 0u32..10_000,
        trust in 0u32..10_000,
        multiplier in prop::sample::select(vec![0.5, 1.0, 1.25, 1.5, 2.0]),
    ) {
        let config = CombatConfig::default();
        let effects = StatusEffects {
            damage_multiplier: multiplier,
            ..StatusEffects::new()
        };
        let damage =
            calculate_shadow_health_damage(difficulty, light_points, &effects, trust, &config);
        prop_assert!(damage >= config.min_shadow_damage);
    }
}
