//! Player resource pools shared between the ledger and combat sessions.
//!
//! Resources come in two flavours:
//! - Meters with a maximum (health, energy): clamped to `0..=max`
//! - Currencies without a maximum (LightPoints, ShadowPoints): clamped at 0
//!
//! Values are unsigned, so the non-negative half of every invariant is
//! structural; the helpers here keep the upper half.

/// Enum representing individual resource fields.
///
/// Used by validation errors and log deltas to name a specific field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    Health,
    MaxHealth,
    Energy,
    MaxEnergy,
    LightPoints,
    ShadowPoints,
}

/// Point-in-time copy of every player resource.
///
/// Invariant: `health <= max_health` and `energy <= max_energy`. Use
/// [`ResourceSnapshot::clamped`] when building one from untrusted input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResourceSnapshot {
    pub health: u32,
    pub max_health: u32,
    pub energy: u32,
    pub max_energy: u32,
    pub light_points: u32,
    pub shadow_points: u32,
}

impl ResourceSnapshot {
    pub const BASE_MAX_HEALTH: u32 = 100;
    pub const BASE_MAX_ENERGY: u32 = 100;

    pub const fn new(
        health: u32,
        max_health: u32,
        energy: u32,
        max_energy: u32,
        light_points: u32,
        shadow_points: u32,
    ) -> Self {
        Self {
            health,
            max_health,
            energy,
            max_energy,
            light_points,
            shadow_points,
        }
    }

    /// Returns a copy with the meters pulled back under their maximums.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.health = self.health.min(self.max_health);
        self.energy = self.energy.min(self.max_energy);
        self
    }

    /// Returns true if every meter is within its declared maximum.
    pub fn is_within_bounds(&self) -> bool {
        self.health <= self.max_health && self.energy <= self.max_energy
    }

    /// Reads a single field.
    pub fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Health => self.health,
            ResourceKind::MaxHealth => self.max_health,
            ResourceKind::Energy => self.energy,
            ResourceKind::MaxEnergy => self.max_energy,
            ResourceKind::LightPoints => self.light_points,
            ResourceKind::ShadowPoints => self.shadow_points,
        }
    }

    /// Applies a partial update, clamping each provided field independently.
    ///
    /// Maximums are applied first so a patch that lowers `max_health` and
    /// sets `health` in the same call is clamped against the new maximum.
    #[must_use]
    pub fn patched(mut self, patch: &ResourcePatch) -> Self {
        if let Some(max_health) = patch.max_health {
            self.max_health = max_health;
        }
        if let Some(max_energy) = patch.max_energy {
            self.max_energy = max_energy;
        }
        if let Some(health) = patch.health {
            self.health = health;
        }
        if let Some(energy) = patch.energy {
            self.energy = energy;
        }
        if let Some(light_points) = patch.light_points {
            self.light_points = light_points;
        }
        if let Some(shadow_points) = patch.shadow_points {
            self.shadow_points = shadow_points;
        }
        self.clamped()
    }

    /// Signed per-field difference `after - self`.
    pub fn delta_to(&self, after: &Self) -> ResourceDelta {
        ResourceDelta {
            health: signed_diff(self.health, after.health),
            energy: signed_diff(self.energy, after.energy),
            light_points: signed_diff(self.light_points, after.light_points),
            shadow_points: signed_diff(self.shadow_points, after.shadow_points),
        }
    }
}

impl Default for ResourceSnapshot {
    fn default() -> Self {
        Self::new(
            Self::BASE_MAX_HEALTH,
            Self::BASE_MAX_HEALTH,
            Self::BASE_MAX_ENERGY,
            Self::BASE_MAX_ENERGY,
            0,
            0,
        )
    }
}

/// Partial resource update; `None` fields are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResourcePatch {
    pub health: Option<u32>,
    pub max_health: Option<u32>,
    pub energy: Option<u32>,
    pub max_energy: Option<u32>,
    pub light_points: Option<u32>,
    pub shadow_points: Option<u32>,
}

impl ResourcePatch {
    /// Patch that overwrites every field with the snapshot's values.
    pub fn from_snapshot(snapshot: &ResourceSnapshot) -> Self {
        Self {
            health: Some(snapshot.health),
            max_health: Some(snapshot.max_health),
            energy: Some(snapshot.energy),
            max_energy: Some(snapshot.max_energy),
            light_points: Some(snapshot.light_points),
            shadow_points: Some(snapshot.shadow_points),
        }
    }
}

/// Signed change of the spendable resources, recorded in combat log entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceDelta {
    pub health: i64,
    pub energy: i64,
    pub light_points: i64,
    pub shadow_points: i64,
}

impl ResourceDelta {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// `clamp(current + delta, 0, max)` without intermediate overflow.
pub fn clamp_add(current: u32, delta: i64, max: u32) -> u32 {
    let next = i64::from(current).saturating_add(delta);
    next.clamp(0, i64::from(max)) as u32
}

/// `max(current + delta, 0)` for currencies without a declared maximum.
pub fn saturating_add_signed(current: u32, delta: i64) -> u32 {
    clamp_add(current, delta, u32::MAX)
}

fn signed_diff(before: u32, after: u32) -> i64 {
    i64::from(after) - i64::from(before)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn patch_applies_maximums_before_meters() {
        let snapshot = ResourceSnapshot::new(80, 100, 50, 100, 3, 4);
        let patch = ResourcePatch {
            max_health: Some(40),
            light_points: Some(9),
            ..ResourcePatch::default()
        };

        let patched = snapshot.patched(&patch);

        assert_eq!(patched.max_health, 40);
        assert_eq!(patched.health, 40);
        assert_eq!(patched.light_points, 9);
        assert_eq!(patched.shadow_points, 4);
    }

    #[test]
    fn delta_reports_signed_differences() {
        let before = ResourceSnapshot::new(50, 100, 10, 100, 5, 5);
        let after = ResourceSnapshot::new(45, 100, 10, 100, 8, 2);

        let delta = before.delta_to(&after);

        assert_eq!(delta.health, -5);
        assert_eq!(delta.energy, 0);
        assert_eq!(delta.light_points, 3);
        assert_eq!(delta.shadow_points, -3);
    }

    proptest! {
        #[test]
        fn clamp_add_stays_in_bounds(current in 0u32..=500, max in 0u32..=500, delta in any::<i64>()) {
            let current = current.min(max);
            let next = clamp_add(current, delta, max);
            prop_assert!(next <= max);
        }
    }
}
