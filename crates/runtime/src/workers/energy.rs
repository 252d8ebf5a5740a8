//! Periodic energy regeneration.
//!
//! The scheduler adds a fixed amount of energy to the ledger on every tick,
//! unless the [`ActivityGate`] says the player is away (hidden or unfocused)
//! or a combat session is running. Combat suspends regeneration so that no
//! implicit ledger write can interleave with an in-flight transaction.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::events::{CombatEvent, EventBus};
use crate::ledger::LedgerHandle;
use crate::workers::RegenMetrics;

/// Scheduler timing and step size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub interval: Duration,
    pub regen_amount: u32,
}

impl SchedulerConfig {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);
    pub const DEFAULT_REGEN_AMOUNT: u32 = 1;
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            regen_amount: Self::DEFAULT_REGEN_AMOUNT,
        }
    }
}

/// Visibility, focus and combat flags consulted on every tick.
#[derive(Debug)]
pub struct ActivityGate {
    visible: AtomicBool,
    focused: AtomicBool,
    combat_active: AtomicBool,
}

impl ActivityGate {
    /// Visible and focused, no combat.
    pub fn new() -> Self {
        Self {
            visible: AtomicBool::new(true),
            focused: AtomicBool::new(true),
            combat_active: AtomicBool::new(false),
        }
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    pub fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::SeqCst);
    }

    pub fn set_combat_active(&self, active: bool) {
        self.combat_active.store(active, Ordering::SeqCst);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    pub fn is_focused(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }

    pub fn is_combat_active(&self) -> bool {
        self.combat_active.load(Ordering::SeqCst)
    }

    pub fn allows_regeneration(&self) -> bool {
        self.is_visible() && self.is_focused() && !self.is_combat_active()
    }
}

impl Default for ActivityGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Background actor that regenerates ledger energy.
pub struct EnergyScheduler {
    ledger: LedgerHandle,
    gate: Arc<ActivityGate>,
    config: SchedulerConfig,
    event_bus: Option<EventBus>,
    metrics: Arc<RegenMetrics>,
}

impl EnergyScheduler {
    pub fn new(ledger: LedgerHandle, gate: Arc<ActivityGate>, config: SchedulerConfig) -> Self {
        Self {
            ledger,
            gate,
            config,
            event_bus: None,
            metrics: Arc::new(RegenMetrics::new()),
        }
    }

    /// Publishes an [`CombatEvent::EnergyRegenerated`] for every applied tick.
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Returns a clone of the metrics Arc for external querying.
    pub fn metrics(&self) -> Arc<RegenMetrics> {
        Arc::clone(&self.metrics)
    }

    /// One regeneration step. Returns the energy actually added.
    ///
    /// The gate is read under the ledger write lock; the runtime flips the
    /// combat flag while holding the same lock.
    pub fn regen_tick(&self) -> u32 {
        let (gained, energy) = match self.ledger.write() {
            Ok(mut ledger) => {
                if !self.gate.allows_regeneration() {
                    trace!("energy tick skipped by activity gate");
                    self.metrics.record_gated();
                    return 0;
                }
                let gained = ledger.regenerate_energy(self.config.regen_amount);
                (gained, ledger.resource_snapshot().energy)
            }
            Err(_) => {
                warn!("ledger lock poisoned, energy tick dropped");
                self.metrics.record_failure();
                return 0;
            }
        };

        if gained == 0 {
            self.metrics.record_idle();
            return 0;
        }

        self.metrics.record_applied(gained);
        debug!(gained, energy, "energy regenerated");
        if let Some(bus) = &self.event_bus {
            bus.publish(CombatEvent::EnergyRegenerated { gained, energy });
        }
        gained
    }

    /// Starts the periodic task. The first tick fires one interval from now.
    pub fn spawn(self) -> EnergySchedulerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let metrics = self.metrics();
        let task = tokio::spawn(async move {
            self.run(shutdown_rx).await;
        });

        EnergySchedulerHandle {
            shutdown: Some(shutdown_tx),
            task,
            metrics,
        }
    }

    async fn run(self, mut shutdown: oneshot::Receiver<()>) {
        let period = self.config.interval.max(Duration::from_millis(1));
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // interval() completes its first tick immediately
        ticker.tick().await;

        info!(interval = ?period, amount = self.config.regen_amount, "energy scheduler started");

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.regen_tick();
                }
            }
        }

        info!("energy scheduler stopped");
    }
}

/// Owner's handle to a running [`EnergyScheduler`].
pub struct EnergySchedulerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
    metrics: Arc<RegenMetrics>,
}

impl EnergySchedulerHandle {
    pub fn metrics(&self) -> Arc<RegenMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signals the task to stop and waits for it to exit.
    pub async fn stop(mut self) -> Result<(), tokio::task::JoinError> {
        if let Some(shutdown) = self.shutdown.take() {
            // the task may already be gone; joining below reports that
            let _ = shutdown.send(());
        }
        self.task.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ResourceLedger;
    use shadow_core::ResourceSnapshot;

    fn ledger_with_energy(energy: u32) -> LedgerHandle {
        ResourceLedger::new(ResourceSnapshot::new(100, 100, energy, 100, 0, 0)).into_handle()
    }

    fn energy(ledger: &LedgerHandle) -> u32 {
        ledger.read().unwrap().resource_snapshot().energy
    }

    #[test]
    fn tick_respects_gate() {
        let ledger = ledger_with_energy(50);
        let gate = Arc::new(ActivityGate::new());
        let scheduler =
            EnergyScheduler::new(ledger.clone(), gate.clone(), SchedulerConfig::default());

        gate.set_combat_active(true);
        for _ in 0..5 {
            assert_eq!(scheduler.regen_tick(), 0);
        }
        assert_eq!(energy(&ledger), 50);

        gate.set_combat_active(false);
        gate.set_visible(false);
        assert_eq!(scheduler.regen_tick(), 0);

        gate.set_visible(true);
        gate.set_focused(false);
        assert_eq!(scheduler.regen_tick(), 0);

        gate.set_focused(true);
        assert_eq!(scheduler.regen_tick(), 1);
        assert_eq!(energy(&ledger), 51);

        let metrics = scheduler.metrics().snapshot();
        assert_eq!(metrics.gated, 7);
        assert_eq!(metrics.applied, 1);
    }

    #[test]
    fn tick_waiting_on_the_lock_sees_combat_start() {
        let ledger = ledger_with_energy(50);
        let gate = Arc::new(ActivityGate::new());
        let scheduler =
            EnergyScheduler::new(ledger.clone(), gate.clone(), SchedulerConfig::default());

        let guard = ledger.write().unwrap();
        let tick = std::thread::spawn(move || scheduler.regen_tick());
        std::thread::sleep(Duration::from_millis(20));
        gate.set_combat_active(true);
        drop(guard);

        assert_eq!(tick.join().unwrap(), 0);
        assert_eq!(energy(&ledger), 50);
    }

    #[test]
    fn tick_clamps_at_max() {
        let ledger = ledger_with_energy(100);
        let scheduler = EnergyScheduler::new(
            ledger.clone(),
            Arc::new(ActivityGate::new()),
            SchedulerConfig::default(),
        );

        assert_eq!(scheduler.regen_tick(), 0);
        assert_eq!(energy(&ledger), 100);
        assert_eq!(scheduler.metrics().snapshot().idle, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn task_ticks_once_per_interval() {
        let ledger = ledger_with_energy(10);
        let config = SchedulerConfig {
            interval: Duration::from_secs(30),
            regen_amount: 1,
        };
        let handle =
            EnergyScheduler::new(ledger.clone(), Arc::new(ActivityGate::new()), config).spawn();

        time::sleep(Duration::from_secs(105)).await;
        assert_eq!(energy(&ledger), 13);

        handle.stop().await.unwrap();
        time::sleep(Duration::from_secs(120)).await;
        assert_eq!(energy(&ledger), 13);
    }

    #[tokio::test(start_paused = true)]
    async fn event_published_per_applied_tick() {
        let ledger = ledger_with_energy(99);
        let bus = EventBus::new();
        let mut events = bus.subscribe(crate::events::Topic::Energy);
        let handle = EnergyScheduler::new(
            ledger.clone(),
            Arc::new(ActivityGate::new()),
            SchedulerConfig::default(),
        )
        .with_event_bus(bus)
        .spawn();

        time::sleep(Duration::from_secs(95)).await;
        handle.stop().await.unwrap();

        assert_eq!(
            events.try_recv().unwrap(),
            CombatEvent::EnergyRegenerated {
                gained: 1,
                energy: 100
            }
        );
        assert!(events.try_recv().is_err());
    }
}
