//! Lifecycle of a single combat encounter.
//!
//! ```text
//! IDLE ── start_combat ──▶ PLAYER_TURN ⇄ SHADOW_TURN ── defeat / victory ──▶ ENDED
//!   ▲                                                                          │
//!   └──────────────────────────── end_combat / retreat ◀──────────────────────┘
//! ```
//!
//! The store drives the pure engine in `shadow-core` and is the only caller
//! of the transaction manager: resources enter the session through a
//! ledger→session transaction at start and leave through a session→ledger
//! transaction at the end.

use std::sync::Arc;

use tracing::{debug, info, warn};

use shadow_core::{
    ActionError, ActionTally, CombatEndStatus, CombatEnv, CombatErrorKind, CombatPhase,
    CombatSession, EndReason, EnemyTemplate, PlayerAction, PlayerActionOutcome, ResourcePatch,
    ResourceSnapshot, ShadowActionOutcome, execute_player_action, execute_shadow_action,
    select_shadow_ability, validate_player_action,
};

use super::reflection::{ReflectionRecord, ReflectionSink};
use crate::ledger::{ResourceLedger, ResourceStore};
use crate::statistics::CombatStatistics;
use crate::sync::{SyncConfig, SyncDirection, SyncError, SyncTransaction, SyncTransactionManager};

/// Errors raised by the session store's lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("a combat session against '{enemy_id}' is already active")]
    AlreadyActive { enemy_id: String },

    #[error("no combat session is active")]
    NoActiveSession,

    #[error("combat has ended; call end_combat to close the session")]
    CombatEnded,

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("resources could not be moved into the session")]
    StartRejected(#[source] SyncError),
}

/// Result of one `execute_action` call.
#[derive(Clone, Debug)]
pub struct TurnReport {
    pub player: PlayerActionOutcome,
    /// The shadow's reply, absent when the enemy fell or forfeited its turn.
    pub shadow: Option<ShadowActionOutcome>,
    pub shadow_skipped: bool,
    pub end_status: CombatEndStatus,
}

/// What `end_combat` produced.
#[derive(Clone, Debug)]
pub struct CombatSummary {
    pub enemy_id: String,
    pub victory: bool,
    pub reason: EndReason,
    pub turns_played: u32,
    pub tally: ActionTally,
    /// Session resources after rewards, i.e. what the ledger was asked to take.
    pub final_resources: ResourceSnapshot,
    /// The committed session→ledger transaction, or why the ledger kept its
    /// pre-combat values.
    pub transaction: Result<SyncTransaction, SyncError>,
}

impl ResourceStore for CombatSession {
    fn resource_snapshot(&self) -> ResourceSnapshot {
        self.resources
    }

    fn apply_snapshot(&mut self, snapshot: &ResourceSnapshot) {
        self.resources = self
            .resources
            .patched(&ResourcePatch::from_snapshot(snapshot));
    }
}

/// Owns the active encounter, the transaction manager and long-term combat
/// statistics.
pub struct CombatSessionStore {
    sync: SyncTransactionManager,
    statistics: CombatStatistics,
    session: Option<CombatSession>,
    /// Ledger values the active session was opened from; the write-back
    /// is checked against them.
    ledger_baseline: Option<ResourceSnapshot>,
    last_outcome: CombatEndStatus,
    reflection: Option<Arc<dyn ReflectionSink>>,
}

impl CombatSessionStore {
    pub fn new(sync_config: SyncConfig) -> Self {
        Self {
            sync: SyncTransactionManager::new(sync_config),
            statistics: CombatStatistics::default(),
            session: None,
            ledger_baseline: None,
            last_outcome: CombatEndStatus::default(),
            reflection: None,
        }
    }

    /// Routes finished combat logs to `sink` instead of discarding them.
    pub fn set_reflection_sink(&mut self, sink: Arc<dyn ReflectionSink>) {
        self.reflection = Some(sink);
    }

    pub fn session(&self) -> Option<&CombatSession> {
        self.session.as_ref()
    }

    /// True from `start_combat` until `end_combat`, including the ended phase.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn sync(&self) -> &SyncTransactionManager {
        &self.sync
    }

    pub fn statistics(&self) -> &CombatStatistics {
        &self.statistics
    }

    /// Replaces the statistics with persisted values.
    pub fn restore_statistics(&mut self, statistics: CombatStatistics) {
        self.statistics = statistics;
    }

    /// End status of the live session, or of the last one if idle.
    pub fn combat_end_status(&self) -> CombatEndStatus {
        self.session
            .as_ref()
            .map(CombatSession::end_status)
            .unwrap_or(self.last_outcome)
    }

    /// Opens an encounter against a fresh instance of `template`.
    ///
    /// The working copy is moved in through a ledger→session transaction
    /// that also grants the level's starting LightPoints bonus, capped at the
    /// per-field change bound. If the transaction is refused no session is
    /// created.
    pub fn start_combat(
        &mut self,
        template: &EnemyTemplate,
        scene_difficulty: Option<u32>,
        ledger: &mut ResourceLedger,
        env: &CombatEnv<'_>,
    ) -> Result<&CombatSession, SessionError> {
        if let Some(active) = &self.session {
            return Err(SessionError::AlreadyActive {
                enemy_id: active.enemy.id.clone(),
            });
        }

        let source = ledger.resource_snapshot();
        let bonus = env
            .benefits
            .starting_lp_bonus
            .min(self.sync.config().max_field_change);
        let mut target = source;
        target.light_points = target.light_points.saturating_add(bonus);

        let mut session = CombatSession::new(template.instantiate(), source, scene_difficulty);

        let transaction = self
            .sync
            .begin_sync_transaction(SyncDirection::LedgerToSession, source, target)
            .map_err(SessionError::StartRejected)?;
        self.sync
            .commit_sync_transaction(transaction.id, ledger, &mut session)
            .map_err(SessionError::StartRejected)?;

        info!(
            enemy = %template.id,
            hp = template.max_hp,
            scene_difficulty = ?scene_difficulty,
            "combat started"
        );

        self.ledger_baseline = Some(source);
        self.last_outcome = CombatEndStatus::default();
        Ok(self.session.insert(session))
    }

    /// Resolves one player action and, unless the shadow falls or forfeits
    /// its turn, the shadow's reply.
    ///
    /// Guard failures are returned before anything is touched.
    pub fn execute_action(
        &mut self,
        action: PlayerAction,
        env: &CombatEnv<'_>,
    ) -> Result<TurnReport, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        if session.is_ended() {
            return Err(SessionError::CombatEnded);
        }

        if let Err(error) = validate_player_action(&action, session, env) {
            warn!(
                action = %action.kind(),
                code = error.error_code(),
                "player action rejected: {}",
                error
            );
            return Err(error.into());
        }

        let player = execute_player_action(&action, session, env);
        player.update.apply_to(session);
        session.log.push(player.log_entry.clone());
        session.action_tally.record(action.kind());
        session.enemy.tick_cooldowns();

        debug!(
            turn = session.turn_number,
            action = %action.kind(),
            damage = player.damage_dealt,
            enemy_hp = session.enemy.current_hp,
            "player action resolved"
        );

        if session.enemy.is_defeated() {
            session.finish(true, EndReason::EnemyDefeated);
            return Ok(TurnReport {
                player,
                shadow: None,
                shadow_skipped: false,
                end_status: session.end_status(),
            });
        }

        if session.status_effects.skip_next_turn {
            session.status_effects.skip_next_turn = false;
            debug!(turn = session.turn_number, "shadow forfeits its turn");
            return Ok(TurnReport {
                player,
                shadow: None,
                shadow_skipped: true,
                end_status: session.end_status(),
            });
        }

        session.phase = CombatPhase::ShadowTurn;
        let ability = select_shadow_ability(session);
        let shadow = execute_shadow_action(ability, session, env);
        shadow.update.apply_to(session);
        session.enemy.mark_used(ability);
        session.log.push(shadow.log_entry.clone());

        debug!(
            turn = session.turn_number,
            ability = %ability,
            damage = shadow.health_damage,
            health = session.resources.health,
            "shadow acted"
        );

        if session.resources.health == 0 {
            session.finish(false, EndReason::PlayerDefeated);
        } else {
            session.phase = CombatPhase::PlayerTurn;
            session.turn_number += 1;
        }

        Ok(TurnReport {
            player,
            shadow: Some(shadow),
            shadow_skipped: false,
            end_status: session.end_status(),
        })
    }

    /// Closes the encounter and moves its resources back into the ledger.
    ///
    /// If the session already reached an outcome (enemy or player defeated)
    /// that outcome wins over `victory`. A ledger that changed since the
    /// session opened makes the write-back stale: it is rolled back and the
    /// ledger keeps its current values.
    pub fn end_combat(
        &mut self,
        victory: bool,
        ledger: &mut ResourceLedger,
        env: &CombatEnv<'_>,
    ) -> Result<CombatSummary, SessionError> {
        self.close(victory, EndReason::Resolved, ledger, env)
    }

    /// Withdraws from the encounter without a victory.
    pub fn retreat(
        &mut self,
        ledger: &mut ResourceLedger,
        env: &CombatEnv<'_>,
    ) -> Result<CombatSummary, SessionError> {
        self.close(false, EndReason::Retreated, ledger, env)
    }

    fn close(
        &mut self,
        victory: bool,
        reason: EndReason,
        ledger: &mut ResourceLedger,
        env: &CombatEnv<'_>,
    ) -> Result<CombatSummary, SessionError> {
        let mut session = self.session.take().ok_or(SessionError::NoActiveSession)?;
        let baseline = self
            .ledger_baseline
            .take()
            .unwrap_or_else(|| ledger.resource_snapshot());
        session.finish(victory, reason);

        let status = session.end_status();
        let victory = status.victory;
        let reason = status.reason.unwrap_or(reason);

        if victory {
            let resources = &mut session.resources;
            resources.light_points = resources
                .light_points
                .saturating_add(session.enemy.victory_reward);
            if !session.status_effects.healing_blocked() {
                resources.health = resources
                    .health
                    .saturating_add(env.config.victory_heal)
                    .min(resources.max_health);
            }
        }

        let final_resources = session.resources;
        let transaction = self
            .sync
            .begin_sync_transaction(SyncDirection::SessionToLedger, baseline, final_resources)
            .and_then(|transaction| {
                self.sync
                    .commit_sync_transaction(transaction.id, ledger, &mut session)
            });

        if let Err(error) = &transaction {
            warn!(
                enemy = %session.enemy.id,
                "combat resources were not written back, ledger keeps its values: {}",
                error
            );
        }

        let turns_played = session.turn_number;
        self.statistics
            .update_combat_statistics(&session.action_tally, victory, turns_played);
        self.last_outcome = status;

        info!(
            enemy = %session.enemy.id,
            victory,
            reason = %reason,
            turns = turns_played,
            "combat ended"
        );

        let summary = CombatSummary {
            enemy_id: session.enemy.id.clone(),
            victory,
            reason,
            turns_played,
            tally: session.action_tally,
            final_resources,
            transaction,
        };

        if let Some(sink) = &self.reflection {
            sink.receive(ReflectionRecord {
                enemy_id: session.enemy.id,
                enemy_name: session.enemy.name,
                narrative_insight: session.enemy.narrative_insight,
                victory,
                log: session.log,
            });
        }

        Ok(summary)
    }
}

impl Default for CombatSessionStore {
    fn default() -> Self {
        Self::new(SyncConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::InMemoryJournal;
    use shadow_core::{AbilityKind, ActionKind, CombatConfig, EnemyCategory, LevelBenefits};

    fn template(abilities: Vec<AbilityKind>) -> EnemyTemplate {
        EnemyTemplate {
            id: "test_shadow".into(),
            name: "Test Shadow".into(),
            category: EnemyCategory::Doubt,
            max_hp: 15,
            abilities,
            narrative_insight: "insight".into(),
            victory_reward: 5,
        }
    }

    fn ledger(lp: u32, sp: u32) -> ResourceLedger {
        ResourceLedger::new(ResourceSnapshot::new(100, 100, 100, 100, lp, sp))
    }

    #[test]
    fn start_moves_resources_through_a_transaction() {
        let config = CombatConfig::default();
        let benefits = LevelBenefits {
            starting_lp_bonus: 5,
            ..LevelBenefits::NONE
        };
        let env = CombatEnv::new(&config, 0).with_benefits(benefits);
        let mut store = CombatSessionStore::default();
        let mut ledger = ledger(10, 0);

        let session = store
            .start_combat(&template(vec![AbilityKind::SelfDoubt]), Some(6), &mut ledger, &env)
            .unwrap();

        assert_eq!(session.resources.light_points, 15);
        assert_eq!(session.turn_number, 1);
        assert!(session.log.is_empty());
        // the ledger is only written on the way out
        assert_eq!(ledger.resource_snapshot().light_points, 10);
        assert_eq!(store.sync().history_len(), 1);
    }

    #[test]
    fn starting_bonus_is_capped_at_the_change_bound() {
        let config = CombatConfig::default();
        let benefits = LevelBenefits {
            starting_lp_bonus: 105,
            ..LevelBenefits::NONE
        };
        let env = CombatEnv::new(&config, 0).with_benefits(benefits);
        let mut store = CombatSessionStore::default();
        let mut ledger = ledger(10, 0);

        let session = store
            .start_combat(&template(vec![]), None, &mut ledger, &env)
            .unwrap();

        assert_eq!(session.resources.light_points, 110);
        assert!(store.sync().error_log().next().is_none());
    }

    #[test]
    fn second_start_is_refused() {
        let config = CombatConfig::default();
        let env = CombatEnv::new(&config, 0);
        let mut store = CombatSessionStore::default();
        let mut ledger = ledger(10, 0);
        let template = template(vec![]);

        store.start_combat(&template, None, &mut ledger, &env).unwrap();

        assert!(matches!(
            store.start_combat(&template, None, &mut ledger, &env),
            Err(SessionError::AlreadyActive { .. })
        ));
    }

    #[test]
    fn rejected_action_mutates_nothing() {
        let config = CombatConfig::default();
        let env = CombatEnv::new(&config, 0);
        let mut store = CombatSessionStore::default();
        let mut ledger = ledger(0, 0);
        store
            .start_combat(&template(vec![AbilityKind::SelfDoubt]), None, &mut ledger, &env)
            .unwrap();
        let before = store.session().cloned();

        let result = store.execute_action(PlayerAction::Illuminate, &env);

        assert!(matches!(
            result,
            Err(SessionError::Action(ActionError::InsufficientLightPoints { .. }))
        ));
        assert_eq!(store.session().cloned(), before);
    }

    #[test]
    fn action_runs_player_then_shadow_turn() {
        let config = CombatConfig::default();
        let env = CombatEnv::new(&config, 0);
        let mut store = CombatSessionStore::default();
        let mut ledger = ledger(10, 0);
        store
            .start_combat(&template(vec![AbilityKind::SelfDoubt]), None, &mut ledger, &env)
            .unwrap();

        let report = store.execute_action(PlayerAction::Illuminate, &env).unwrap();

        let shadow = report.shadow.unwrap();
        assert_eq!(shadow.ability, AbilityKind::SelfDoubt);
        let session = store.session().unwrap();
        assert_eq!(session.turn_number, 2);
        assert_eq!(session.phase, CombatPhase::PlayerTurn);
        assert_eq!(session.log.len(), 2);
        assert_eq!(session.action_tally.get(ActionKind::Illuminate), 1);
        assert_eq!(session.enemy.abilities[0].current_cooldown, 2);
    }

    #[test]
    fn flood_lets_the_player_act_twice() {
        let config = CombatConfig::default();
        let env = CombatEnv::new(&config, 0);
        let mut store = CombatSessionStore::default();
        let mut ledger = ledger(20, 0);
        store
            .start_combat(&template(vec![AbilityKind::Flood]), None, &mut ledger, &env)
            .unwrap();

        let first = store.execute_action(PlayerAction::Endure, &env).unwrap();
        assert_eq!(first.shadow.map(|s| s.ability), Some(AbilityKind::Flood));

        let second = store.execute_action(PlayerAction::Endure, &env).unwrap();
        assert!(second.shadow_skipped);
        assert!(second.shadow.is_none());
        assert_eq!(store.session().unwrap().turn_number, 2);

        let third = store.execute_action(PlayerAction::Endure, &env).unwrap();
        assert_eq!(third.shadow.map(|s| s.ability), Some(AbilityKind::Lingering));
    }

    #[test]
    fn defeat_ends_the_session() {
        let config = CombatConfig::default().with_base_shadow_damage(1000);
        let env = CombatEnv::new(&config, 0);
        let mut store = CombatSessionStore::default();
        let mut ledger = ledger(0, 0);
        store
            .start_combat(&template(vec![]), None, &mut ledger, &env)
            .unwrap();

        let report = store.execute_action(PlayerAction::Endure, &env).unwrap();

        assert!(report.end_status.is_ended);
        assert!(!report.end_status.victory);
        assert_eq!(report.end_status.reason, Some(EndReason::PlayerDefeated));
        assert!(matches!(
            store.execute_action(PlayerAction::Endure, &env),
            Err(SessionError::CombatEnded)
        ));
    }

    #[test]
    fn victory_rewards_reach_the_ledger() {
        let config = CombatConfig::default();
        let env = CombatEnv::new(&config, 0);
        let mut store = CombatSessionStore::default();
        let journal = Arc::new(InMemoryJournal::new());
        store.set_reflection_sink(journal.clone());
        let mut ledger = ledger(0, 20);
        store
            .start_combat(&template(vec![]), None, &mut ledger, &env)
            .unwrap();

        let report = store
            .execute_action(PlayerAction::Embrace { amount: 15 }, &env)
            .unwrap();
        assert_eq!(report.end_status.reason, Some(EndReason::EnemyDefeated));

        let summary = store.end_combat(false, &mut ledger, &env).unwrap();

        assert!(summary.victory);
        assert!(summary.transaction.is_ok());
        let snapshot = ledger.resource_snapshot();
        assert_eq!(snapshot.shadow_points, 5);
        assert_eq!(snapshot.light_points, 5);
        assert_eq!(snapshot.energy, 96);
        assert!(!store.is_active());
        assert!(store.combat_end_status().victory);
        assert_eq!(store.statistics().victories, 1);
        assert_eq!(journal.records().len(), 1);
        assert_eq!(journal.records()[0].log.len(), 1);
    }

    #[test]
    fn end_without_session_fails() {
        let config = CombatConfig::default();
        let env = CombatEnv::new(&config, 0);
        let mut store = CombatSessionStore::default();
        let mut ledger = ledger(0, 0);

        assert!(matches!(
            store.end_combat(true, &mut ledger, &env),
            Err(SessionError::NoActiveSession)
        ));
    }

    #[test]
    fn ledger_drift_during_combat_makes_write_back_stale() {
        let config = CombatConfig::default();
        let env = CombatEnv::new(&config, 0);
        let mut store = CombatSessionStore::default();
        let mut ledger = ledger(10, 0);
        store
            .start_combat(&template(vec![]), None, &mut ledger, &env)
            .unwrap();
        store.execute_action(PlayerAction::Illuminate, &env).unwrap();

        ledger.modify_light_points(40);
        let summary = store.retreat(&mut ledger, &env).unwrap();

        assert!(matches!(
            summary.transaction,
            Err(SyncError::StaleSource { .. })
        ));
        assert_eq!(ledger.resource_snapshot().light_points, 50);
        assert_eq!(
            store.sync().last_transaction().map(|tx| tx.status),
            Some(crate::sync::SyncStatus::RolledBack)
        );
        assert_eq!(store.statistics().defeats, 1);
    }

    #[test]
    fn rejected_write_back_keeps_ledger_and_still_counts() {
        let config = CombatConfig::default();
        let env = CombatEnv::new(&config, 0);
        let mut store = CombatSessionStore::new(SyncConfig {
            max_field_change: 3,
            ..SyncConfig::default()
        });
        let mut ledger = ledger(0, 10);
        store
            .start_combat(&template(vec![]), None, &mut ledger, &env)
            .unwrap();
        store
            .execute_action(PlayerAction::Reflect { amount: 10 }, &env)
            .unwrap();

        let summary = store.retreat(&mut ledger, &env).unwrap();

        assert!(matches!(
            summary.transaction,
            Err(SyncError::ExtremeChange { .. })
        ));
        assert_eq!(ledger.resource_snapshot(), ResourceSnapshot::new(100, 100, 100, 100, 0, 10));
        assert_eq!(summary.reason, EndReason::Retreated);
        assert_eq!(store.statistics().defeats, 1);
        assert_eq!(store.sync().error_log().len(), 1);
    }
}
