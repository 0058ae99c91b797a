//! Topic-based event bus for simulation events.
//!
//! The engine reports everything through its presentation collaborator; the
//! [`EventBus`] is that collaborator. It fans events out to broadcast
//! channels per [`Topic`] so planners and clients receive only what they
//! subscribed to.

mod bus;

pub use bus::{Event, EventBus, Topic, drain};
