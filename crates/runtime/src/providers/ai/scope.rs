//! Event subscriptions owned by the planner.

use skirmish_core::{EventKind, WorldEvent};
use tokio::sync::broadcast::Receiver;

use crate::events::{Event, EventBus, Topic, drain};

/// Set of world-event subscriptions that lives exactly as long as the
/// planner keeps it. Clearing the scope drops every receiver.
pub struct SubscriptionScope {
    bus: EventBus,
    receivers: Vec<(EventKind, Receiver<Event>)>,
}

impl SubscriptionScope {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            receivers: Vec::new(),
        }
    }

    /// Subscribes to `kind`; subscribing twice is a no-op.
    pub fn subscribe(&mut self, kind: EventKind) {
        if self.is_subscribed(kind) {
            return;
        }
        self.receivers
            .push((kind, self.bus.subscribe(Topic::World(kind))));
    }

    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.receivers.iter().any(|(subscribed, _)| *subscribed == kind)
    }

    /// Events received since the last drain, grouped by kind in
    /// subscription order.
    pub fn drain(&mut self) -> Vec<WorldEvent> {
        self.receivers
            .iter_mut()
            .flat_map(|(_, receiver)| drain(receiver))
            .filter_map(|event| match event {
                Event::World(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.receivers.clear();
    }

    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::{Position, UnitId};

    use super::*;

    #[test]
    fn cleared_scope_stops_receiving() {
        let bus = EventBus::new();
        let mut scope = SubscriptionScope::new(bus.clone());
        scope.subscribe(EventKind::Sound);
        scope.subscribe(EventKind::Sound);
        assert_eq!(scope.len(), 1);

        let sound = WorldEvent::Sound {
            source: UnitId(3),
            at: Position::new(2, 2),
        };
        bus.publish(Event::World(sound.clone()));
        bus.publish(Event::World(WorldEvent::TurnEnded { unit: UnitId(3) }));
        assert_eq!(scope.drain(), vec![sound.clone()]);

        scope.clear();
        bus.publish(Event::World(sound));
        assert!(scope.is_empty());
        assert!(scope.drain().is_empty());
    }
}
