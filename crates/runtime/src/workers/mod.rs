//! Background tasks that back the runtime.
//!
//! The only periodic actor is the energy scheduler; it is started and
//! stopped explicitly by the runtime rather than living as a global timer.

mod energy;
mod metrics;

pub use energy::{ActivityGate, EnergyScheduler, EnergySchedulerHandle, SchedulerConfig};
pub use metrics::{RegenMetrics, RegenMetricsSnapshot};
