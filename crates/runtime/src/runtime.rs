//! High-level runtime orchestrator.
//!
//! The runtime owns the resource ledger, the combat session store, the
//! energy scheduler and the save repository, and exposes a builder-based API
//! for the narrative layer to drive encounters.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{info, warn};

use shadow_content::EnemyRegistry;
use shadow_core::{
    CombatConfig, CombatEndStatus, CombatEnv, CombatSession, EnemyOracle, LevelBenefits,
    PlayerAction, ResourceKind, ResourceSnapshot, apply_trust_gain, level_benefits,
};

use crate::error::{Result, RuntimeError};
use crate::events::{CombatEvent, EventBus, Topic};
use crate::ledger::{LedgerHandle, LedgerReader, ResourceLedger};
use crate::repository::{ProgressionState, SaveData, SaveRepository};
use crate::session::{CombatSessionStore, CombatSummary, ReflectionSink, SessionError, TurnReport};
use crate::statistics::CombatStatistics;
use crate::sync::{SyncConfig, SyncError, SyncStatus, SyncTransaction, SyncTransactionManager};
use crate::workers::{
    ActivityGate, EnergyScheduler, EnergySchedulerHandle, RegenMetricsSnapshot, SchedulerConfig,
};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    pub sync: SyncConfig,
    pub scheduler: SchedulerConfig,
    pub event_buffer_size: usize,
    /// Run the background energy scheduler (default: true)
    pub enable_energy_regen: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            sync: SyncConfig::default(),
            scheduler: SchedulerConfig::default(),
            event_buffer_size: 100,
            enable_energy_regen: true,
        }
    }
}

/// Main runtime that coordinates combat and resource synchronization
///
/// All state transitions run synchronously inside a single call; the energy
/// scheduler is the only background task and touches the ledger through the
/// shared [`LedgerHandle`].
pub struct Runtime {
    config: RuntimeConfig,
    ledger: LedgerHandle,
    sessions: CombatSessionStore,
    enemies: Arc<dyn EnemyOracle>,
    progression: ProgressionState,
    gate: Arc<ActivityGate>,
    event_bus: EventBus,
    repository: Option<Arc<dyn SaveRepository>>,
    scheduler: Option<EnergySchedulerHandle>,
}

fn combat_env(config: &CombatConfig, progression: ProgressionState) -> CombatEnv<'_> {
    CombatEnv::new(config, progression.trust_level).with_benefits(level_benefits(progression.level))
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Opens an encounter against the registered template `enemy_id`.
    ///
    /// Background regeneration is suspended until the session is closed.
    pub fn start_combat(
        &mut self,
        enemy_id: &str,
        scene_difficulty: Option<u32>,
    ) -> Result<CombatSession> {
        let template = self
            .enemies
            .template(enemy_id)
            .ok_or_else(|| RuntimeError::UnknownEnemy(enemy_id.to_string()))?;
        let env = combat_env(&self.config.combat, self.progression);

        let started = {
            let mut ledger = self.ledger.write().map_err(|_| RuntimeError::LockPoisoned)?;
            let started = self
                .sessions
                .start_combat(&template, scene_difficulty, &mut ledger, &env)
                .map(CombatSession::clone);
            if started.is_ok() {
                self.gate.set_combat_active(true);
            }
            started
        };

        match started {
            Ok(session) => {
                if let Some(transaction) = self.sessions.sync().last_transaction() {
                    publish_transaction(&self.event_bus, transaction);
                }
                self.event_bus.publish(CombatEvent::CombatStarted {
                    enemy_id: session.enemy.id.clone(),
                    enemy_hp: session.enemy.current_hp,
                    resources: session.resources,
                });
                Ok(session)
            }
            Err(SessionError::StartRejected(error)) => {
                self.publish_sync_failure(&error);
                Err(SessionError::StartRejected(error).into())
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Resolves one player action (and the shadow's reply) in the active session.
    pub fn execute_action(&mut self, action: PlayerAction) -> Result<TurnReport> {
        let env = combat_env(&self.config.combat, self.progression);
        let report = self.sessions.execute_action(action, &env)?;

        self.event_bus.publish(CombatEvent::ActionResolved {
            turn: report.player.log_entry.turn,
            action: action.kind(),
            damage_dealt: report.player.damage_dealt,
            enemy_hp: report.player.update.enemy_hp,
        });
        if let Some(shadow) = &report.shadow {
            self.event_bus.publish(CombatEvent::ShadowActed {
                turn: shadow.log_entry.turn,
                ability: shadow.ability,
                health_damage: shadow.health_damage,
                health: shadow.update.resources.health,
            });
        }

        Ok(report)
    }

    /// Closes the active session, writing its resources back to the ledger.
    pub fn end_combat(&mut self, victory: bool) -> Result<CombatSummary> {
        self.close_session(|sessions, ledger, env| sessions.end_combat(victory, ledger, env))
    }

    /// Withdraws from the active session without a victory.
    pub fn retreat(&mut self) -> Result<CombatSummary> {
        self.close_session(|sessions, ledger, env| sessions.retreat(ledger, env))
    }

    fn close_session<F>(&mut self, close: F) -> Result<CombatSummary>
    where
        F: FnOnce(
            &mut CombatSessionStore,
            &mut ResourceLedger,
            &CombatEnv<'_>,
        ) -> std::result::Result<CombatSummary, SessionError>,
    {
        let env = combat_env(&self.config.combat, self.progression);

        let summary = {
            let mut ledger = self.ledger.write().map_err(|_| RuntimeError::LockPoisoned)?;
            let summary = close(&mut self.sessions, &mut *ledger, &env)?;
            self.gate.set_combat_active(false);
            summary
        };

        match &summary.transaction {
            Ok(transaction) => publish_transaction(&self.event_bus, transaction),
            Err(error) => self.publish_sync_failure(error),
        }
        self.event_bus.publish(CombatEvent::CombatEnded {
            enemy_id: summary.enemy_id.clone(),
            victory: summary.victory,
            reason: summary.reason,
            turns_played: summary.turns_played,
        });

        Ok(summary)
    }

    fn publish_sync_failure(&self, error: &SyncError) {
        match error {
            SyncError::StaleSource { .. } => {
                if let Some(transaction) = self.sessions.sync().last_transaction() {
                    publish_transaction(&self.event_bus, transaction);
                }
            }
            _ => {
                if let Some(record) = self.sessions.sync().error_log().last() {
                    self.event_bus.publish(CombatEvent::TransactionRejected {
                        direction: record.direction,
                        reason: record.message.clone(),
                    });
                }
            }
        }
    }

    /// Outcome of the live session, or of the last one when idle.
    pub fn combat_end_status(&self) -> CombatEndStatus {
        self.sessions.combat_end_status()
    }

    pub fn session(&self) -> Option<&CombatSession> {
        self.sessions.session()
    }

    pub fn is_combat_active(&self) -> bool {
        self.sessions.is_active()
    }

    pub fn statistics(&self) -> &CombatStatistics {
        self.sessions.statistics()
    }

    pub fn sync(&self) -> &SyncTransactionManager {
        self.sessions.sync()
    }

    /// Consistent point-in-time copy of the ledger.
    pub fn resource_snapshot(&self) -> Result<ResourceSnapshot> {
        self.ledger
            .read()
            .map(|ledger| ledger.resource_snapshot())
            .map_err(|_| RuntimeError::LockPoisoned)
    }

    /// Read-only ledger view for external collaborators.
    pub fn ledger(&self) -> LedgerReader {
        LedgerReader::new(Arc::clone(&self.ledger))
    }

    /// Adjusts one ledger field outside combat, returning the new value.
    ///
    /// Refused while a session is active; combat results reach the ledger
    /// only through the session write-back.
    pub fn modify_resource(&mut self, kind: ResourceKind, delta: i64) -> Result<u32> {
        if self.sessions.is_active() {
            return Err(RuntimeError::CombatInProgress);
        }
        let mut ledger = self.ledger.write().map_err(|_| RuntimeError::LockPoisoned)?;
        Ok(ledger.modify(kind, delta))
    }

    pub fn activity_gate(&self) -> Arc<ActivityGate> {
        Arc::clone(&self.gate)
    }

    pub fn set_visible(&self, visible: bool) {
        self.gate.set_visible(visible);
    }

    pub fn set_focused(&self, focused: bool) {
        self.gate.set_focused(focused);
    }

    pub fn progression(&self) -> ProgressionState {
        self.progression
    }

    pub fn level_benefits(&self) -> LevelBenefits {
        level_benefits(self.progression.level)
    }

    /// Changes the player level and recomputes the energy ceiling.
    pub fn set_level(&mut self, level: u32) -> Result<LevelBenefits> {
        if self.sessions.is_active() {
            return Err(RuntimeError::CombatInProgress);
        }

        let level = level.max(1);
        let benefits = level_benefits(level);
        {
            let mut ledger = self.ledger.write().map_err(|_| RuntimeError::LockPoisoned)?;
            ledger.set_max_energy(
                ResourceSnapshot::BASE_MAX_ENERGY.saturating_add(benefits.max_energy_bonus),
            );
        }
        self.progression.level = level;

        info!(level, max_energy_bonus = benefits.max_energy_bonus, "level changed");
        Ok(benefits)
    }

    pub fn set_trust_level(&mut self, trust_level: u32) {
        self.progression.trust_level = trust_level;
    }

    /// Adds a narrative trust gain, scaled by the level multiplier.
    ///
    /// Returns the amount actually added.
    pub fn gain_trust(&mut self, base_gain: u32) -> u32 {
        let gained = apply_trust_gain(base_gain, self.progression.level);
        self.progression.trust_level = self.progression.trust_level.saturating_add(gained);
        gained
    }

    /// Subscribe to runtime events on `topic`
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<CombatEvent> {
        self.event_bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> EventBus {
        self.event_bus.clone()
    }

    pub fn scheduler_metrics(&self) -> Option<RegenMetricsSnapshot> {
        self.scheduler
            .as_ref()
            .map(|scheduler| scheduler.metrics().snapshot())
    }

    /// Collects everything that is persisted.
    pub fn save_data(&self) -> Result<SaveData> {
        Ok(SaveData {
            resources: self.resource_snapshot()?,
            progression: self.progression,
            statistics: self.sessions.statistics().clone(),
            saved_at: Some(Utc::now()),
        })
    }

    /// Writes the current ledger, progression and statistics to the repository.
    ///
    /// During combat this saves the pre-combat ledger values.
    pub fn save(&self) -> Result<SaveData> {
        let repository = self
            .repository
            .as_ref()
            .ok_or(RuntimeError::RepositoryNotConfigured)?;
        let data = self.save_data()?;
        repository.save(&data)?;

        info!(
            level = data.progression.level,
            encounters = data.statistics.encounters,
            "progress saved"
        );
        Ok(data)
    }

    /// Hydrates the ledger, progression and statistics from the repository.
    ///
    /// Returns `false` when no save exists; the ledger is then marked ready
    /// with its current values. Errors leave every in-memory value untouched.
    pub fn load(&mut self) -> Result<bool> {
        if self.sessions.is_active() {
            return Err(RuntimeError::CombatInProgress);
        }
        let repository = self
            .repository
            .as_ref()
            .ok_or(RuntimeError::RepositoryNotConfigured)?;
        let loaded = repository.load()?;

        let mut ledger = self.ledger.write().map_err(|_| RuntimeError::LockPoisoned)?;
        match loaded {
            Some(data) => {
                ledger.hydrate(data.resources);
                self.progression = data.progression;
                self.sessions.restore_statistics(data.statistics);
                info!(level = self.progression.level, "progress loaded");
                Ok(true)
            }
            None => {
                let current = ledger.resource_snapshot();
                ledger.hydrate(current);
                Ok(false)
            }
        }
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        if let Some(scheduler) = self.scheduler {
            scheduler.stop().await.map_err(RuntimeError::WorkerJoin)?;
        }
        Ok(())
    }
}

fn publish_transaction(event_bus: &EventBus, transaction: &SyncTransaction) {
    let event = match transaction.status {
        SyncStatus::Committed => CombatEvent::TransactionCommitted {
            id: transaction.id,
            direction: transaction.direction,
        },
        SyncStatus::RolledBack => CombatEvent::TransactionRolledBack {
            id: transaction.id,
            direction: transaction.direction,
        },
        SyncStatus::Pending => return,
    };
    event_bus.publish(event);
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    resources: Option<ResourceSnapshot>,
    progression: ProgressionState,
    enemies: Option<Arc<dyn EnemyOracle>>,
    repository: Option<Arc<dyn SaveRepository>>,
    reflection: Option<Arc<dyn ReflectionSink>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            resources: None,
            progression: ProgressionState::default(),
            enemies: None,
            repository: None,
            reflection: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override combat balance
    pub fn combat_config(mut self, combat: CombatConfig) -> Self {
        self.config.combat = combat;
        self
    }

    /// Provide initial ledger contents, skipping repository hydration
    pub fn initial_resources(mut self, resources: ResourceSnapshot) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Provide initial level and trust
    pub fn progression(mut self, progression: ProgressionState) -> Self {
        self.progression = progression;
        self
    }

    /// Set the enemy template source (default: the built-in registry)
    pub fn enemies(mut self, enemies: impl EnemyOracle + 'static) -> Self {
        self.enemies = Some(Arc::new(enemies));
        self
    }

    /// Set the save repository (optional)
    pub fn repository(mut self, repository: impl SaveRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Route finished combat logs to a reflection collaborator (optional)
    pub fn reflection_sink(mut self, sink: Arc<dyn ReflectionSink>) -> Self {
        self.reflection = Some(sink);
        self
    }

    /// Enable or disable the background energy scheduler
    pub fn enable_energy_regen(mut self, enable: bool) -> Self {
        self.config.enable_energy_regen = enable;
        self
    }

    /// Build the runtime
    ///
    /// With a repository and no explicit resources, the ledger starts out
    /// awaiting hydration and is loaded from the repository. A failed load is
    /// logged and leaves the ledger waiting, so regeneration cannot write
    /// over a save that could not be read.
    pub async fn build(self) -> Result<Runtime> {
        let ledger = match (self.resources, &self.repository) {
            (Some(resources), _) => ResourceLedger::new(resources),
            (None, Some(_)) => ResourceLedger::awaiting_hydration(),
            (None, None) => ResourceLedger::default(),
        }
        .into_handle();

        let mut sessions = CombatSessionStore::new(self.config.sync.clone());
        if let Some(sink) = self.reflection {
            sessions.set_reflection_sink(sink);
        }

        let gate = Arc::new(ActivityGate::new());
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let scheduler = if self.config.enable_energy_regen {
            let scheduler = EnergyScheduler::new(
                Arc::clone(&ledger),
                Arc::clone(&gate),
                self.config.scheduler.clone(),
            )
            .with_event_bus(event_bus.clone());
            Some(scheduler.spawn())
        } else {
            None
        };

        let enemies = self
            .enemies
            .unwrap_or_else(|| Arc::new(EnemyRegistry::builtin()));

        let hydrate_from_repository = self.resources.is_none() && self.repository.is_some();

        let mut runtime = Runtime {
            config: self.config,
            ledger,
            sessions,
            enemies,
            progression: self.progression,
            gate,
            event_bus,
            repository: self.repository,
            scheduler,
        };

        if hydrate_from_repository {
            if let Err(error) = runtime.load() {
                warn!("failed to load saved progress, ledger stays unhydrated: {}", error);
            }
        }

        Ok(runtime)
    }
}
