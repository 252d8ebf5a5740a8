//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::CombatEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Session lifecycle and resolved turns
    Combat,
    /// Ledger/session transactions
    Sync,
    /// Background energy regeneration
    Energy,
}

impl CombatEvent {
    pub fn topic(&self) -> Topic {
        match self {
            CombatEvent::CombatStarted { .. }
            | CombatEvent::ActionResolved { .. }
            | CombatEvent::ShadowActed { .. }
            | CombatEvent::CombatEnded { .. } => Topic::Combat,
            CombatEvent::TransactionCommitted { .. }
            | CombatEvent::TransactionRejected { .. }
            | CombatEvent::TransactionRolledBack { .. } => Topic::Sync,
            CombatEvent::EnergyRegenerated { .. } => Topic::Energy,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing is best-effort and never blocks.
#[derive(Clone)]
pub struct EventBus {
    combat: broadcast::Sender<CombatEvent>,
    sync: broadcast::Sender<CombatEvent>,
    energy: broadcast::Sender<CombatEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            combat: broadcast::channel(capacity).0,
            sync: broadcast::channel(capacity).0,
            energy: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<CombatEvent> {
        match topic {
            Topic::Combat => &self.combat,
            Topic::Sync => &self.sync,
            Topic::Energy => &self.energy,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: CombatEvent) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<CombatEvent> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> Vec<(Topic, broadcast::Receiver<CombatEvent>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::SyncDirection;

    #[test]
    fn events_route_by_topic() {
        let bus = EventBus::new();
        let mut sync = bus.subscribe(Topic::Sync);
        let mut energy = bus.subscribe(Topic::Energy);

        bus.publish(CombatEvent::TransactionRejected {
            direction: SyncDirection::SessionToLedger,
            reason: "too large".into(),
        });

        assert!(matches!(
            sync.try_recv(),
            Ok(CombatEvent::TransactionRejected { .. })
        ));
        assert!(energy.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::with_capacity(4);
        bus.publish(CombatEvent::EnergyRegenerated {
            gained: 1,
            energy: 51,
        });
    }
}
