//! Topic-based event bus implementation.

use std::sync::Arc;

use skirmish_core::{
    ActionKind, ActionState, AttackReport, EventKind, Presentation, UnitId, WorldEvent,
};
use strum::{EnumCount, IntoEnumIterator};
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Topic {
    /// One kind of world event (ticks, movement, deaths, sounds, ...)
    World(EventKind),
    /// Outcome of an attack, for presentation
    AttackResolved,
    /// Lifecycle changes of queued actions
    ActionState,
}

impl Topic {
    pub fn all() -> impl Iterator<Item = Topic> {
        EventKind::iter()
            .map(Topic::World)
            .chain([Topic::AttackResolved, Topic::ActionState])
    }

    fn index(self) -> usize {
        match self {
            Topic::World(kind) => kind as usize,
            Topic::AttackResolved => EventKind::COUNT,
            Topic::ActionState => EventKind::COUNT + 1,
        }
    }
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone)]
pub enum Event {
    World(WorldEvent),
    AttackResolved(AttackReport),
    ActionState {
        unit: UnitId,
        action: ActionKind,
        state: ActionState,
    },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::World(event) => Topic::World(event.kind()),
            Event::AttackResolved(_) => Topic::AttackResolved,
            Event::ActionState { .. } => Topic::ActionState,
        }
    }

    pub fn world(&self) -> Option<&WorldEvent> {
        match self {
            Event::World(event) => Some(event),
            _ => None,
        }
    }
}

/// Topic-based event bus
///
/// Cloning is cheap and every clone publishes into the same channels.
/// Publishing never blocks: events nobody listens to are dropped, and a
/// receiver that falls more than the channel capacity behind loses the
/// oldest events.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<[broadcast::Sender<Event>]>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::all()
            .map(|_| broadcast::channel(capacity.max(1)).0)
            .collect();
        Self { channels }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        &self.channels[topic.index()]
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// The receiver only sees events published after this call.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Presentation for EventBus {
    fn on_attack_resolved(&mut self, report: &AttackReport) {
        self.publish(Event::AttackResolved(report.clone()));
    }

    fn on_action_state_changed(&mut self, unit: UnitId, action: ActionKind, state: ActionState) {
        self.publish(Event::ActionState {
            unit,
            action,
            state,
        });
    }

    fn on_world_event(&mut self, event: &WorldEvent) {
        self.publish(Event::World(event.clone()));
    }
}

/// Takes every event currently buffered in `receiver` without blocking.
pub fn drain(receiver: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Lagged(missed)) => {
                tracing::warn!(missed, "event receiver lagged, oldest events dropped");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    events
}
