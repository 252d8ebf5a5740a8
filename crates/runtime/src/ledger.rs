//! Authoritative, persisted store of player resources.
//!
//! The ledger is the only long-lived owner of health, energy, LightPoints and
//! ShadowPoints. Combat never writes it directly: values cross into and out
//! of a session through [`SyncTransactionManager`](crate::sync::SyncTransactionManager).
//!
//! Every mutator clamps, so `0 <= value <= max` holds after any call.

use std::sync::{Arc, RwLock};

use shadow_core::{
    ResourceKind, ResourcePatch, ResourceSnapshot, clamp_add, saturating_add_signed,
};

/// Shared handle to the ledger used by the runtime and the energy scheduler.
pub type LedgerHandle = Arc<RwLock<ResourceLedger>>;

/// Read-only view of the shared ledger for collaborators outside the runtime.
#[derive(Clone, Debug)]
pub struct LedgerReader {
    handle: LedgerHandle,
}

impl LedgerReader {
    pub fn new(handle: LedgerHandle) -> Self {
        Self { handle }
    }

    /// Current values, or `None` if the lock was poisoned.
    pub fn resource_snapshot(&self) -> Option<ResourceSnapshot> {
        self.handle
            .read()
            .ok()
            .map(|ledger| ledger.resource_snapshot())
    }

    pub fn is_hydrated(&self) -> bool {
        self.handle
            .read()
            .map(|ledger| ledger.is_hydrated())
            .unwrap_or(false)
    }
}

/// A store that can take part in a resource synchronization.
///
/// The transaction manager reads the receiving store before committing and
/// writes the transaction's target into it on commit.
pub trait ResourceStore {
    /// Consistent point-in-time view of the store's resources.
    fn resource_snapshot(&self) -> ResourceSnapshot;

    /// Overwrites every field with `snapshot`, clamped.
    fn apply_snapshot(&mut self, snapshot: &ResourceSnapshot);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceLedger {
    resources: ResourceSnapshot,
    hydrated: bool,
}

impl ResourceLedger {
    /// Ledger holding `resources`, ready for use.
    pub fn new(resources: ResourceSnapshot) -> Self {
        Self {
            resources: resources.clamped(),
            hydrated: true,
        }
    }

    /// Ledger with default resources that is waiting for a save to load.
    ///
    /// Background regeneration is refused until [`ResourceLedger::hydrate`]
    /// runs, so ticks that fire before loading cannot leak into the save.
    pub fn awaiting_hydration() -> Self {
        Self {
            resources: ResourceSnapshot::default(),
            hydrated: false,
        }
    }

    /// Replaces the contents with persisted values and marks the ledger ready.
    pub fn hydrate(&mut self, resources: ResourceSnapshot) {
        self.resources = resources.clamped();
        self.hydrated = true;
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// The only sanctioned read path for building a sync transaction.
    pub fn resource_snapshot(&self) -> ResourceSnapshot {
        self.resources
    }

    pub fn modify_health(&mut self, delta: i64) -> u32 {
        let resources = &mut self.resources;
        resources.health = clamp_add(resources.health, delta, resources.max_health);
        resources.health
    }

    pub fn modify_energy(&mut self, delta: i64) -> u32 {
        let resources = &mut self.resources;
        resources.energy = clamp_add(resources.energy, delta, resources.max_energy);
        resources.energy
    }

    pub fn modify_light_points(&mut self, delta: i64) -> u32 {
        self.resources.light_points = saturating_add_signed(self.resources.light_points, delta);
        self.resources.light_points
    }

    pub fn modify_shadow_points(&mut self, delta: i64) -> u32 {
        self.resources.shadow_points = saturating_add_signed(self.resources.shadow_points, delta);
        self.resources.shadow_points
    }

    /// Adjusts a single spendable field by `delta`, returning the new value.
    ///
    /// Maximums are not spendable; use [`ResourceLedger::set_all_resources`]
    /// or [`ResourceLedger::set_max_energy`] for those.
    pub fn modify(&mut self, kind: ResourceKind, delta: i64) -> u32 {
        match kind {
            ResourceKind::Health => self.modify_health(delta),
            ResourceKind::Energy => self.modify_energy(delta),
            ResourceKind::LightPoints => self.modify_light_points(delta),
            ResourceKind::ShadowPoints => self.modify_shadow_points(delta),
            ResourceKind::MaxHealth | ResourceKind::MaxEnergy => self.resources.get(kind),
        }
    }

    /// Applies only the provided fields, each clamped independently.
    pub fn set_all_resources(&mut self, patch: &ResourcePatch) {
        self.resources = self.resources.patched(patch);
    }

    /// Changes the energy ceiling, pulling current energy under it if needed.
    pub fn set_max_energy(&mut self, max_energy: u32) {
        self.set_all_resources(&ResourcePatch {
            max_energy: Some(max_energy),
            ..ResourcePatch::default()
        });
    }

    /// Moves `min(amount, shadow_points)` ShadowPoints into LightPoints.
    ///
    /// Both fields are written together; returns the amount moved. Nothing
    /// beyond what LightPoints can hold is taken from ShadowPoints.
    pub fn convert_shadow_to_light(&mut self, amount: u32) -> u32 {
        let headroom = u32::MAX - self.resources.light_points;
        let moved = amount.min(self.resources.shadow_points).min(headroom);
        self.resources.shadow_points -= moved;
        self.resources.light_points += moved;
        moved
    }

    /// Background regeneration step. Returns the energy actually gained.
    ///
    /// A ledger still awaiting hydration gains nothing.
    pub fn regenerate_energy(&mut self, amount: u32) -> u32 {
        if !self.hydrated {
            return 0;
        }
        let before = self.resources.energy;
        let after = self.modify_energy(i64::from(amount));
        after - before
    }

    pub fn into_handle(self) -> LedgerHandle {
        Arc::new(RwLock::new(self))
    }
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self::new(ResourceSnapshot::default())
    }
}

impl ResourceStore for ResourceLedger {
    fn resource_snapshot(&self) -> ResourceSnapshot {
        self.resources
    }

    fn apply_snapshot(&mut self, snapshot: &ResourceSnapshot) {
        self.set_all_resources(&ResourcePatch::from_snapshot(snapshot));
    }
}
