//! Runtime orchestration for the turn-based combat simulation.
//!
//! This crate wires the deterministic rules of `skirmish-core` to concrete
//! collaborators and autonomous decision making. Consumers embed
//! [`Simulation`] to drive turns, queue player actions and subscribe to
//! events.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the simulation context and turn driver loop
//! - [`providers`] holds the goal planner and behaviors for autonomous units
//! - [`events`] provides the topic-based event bus that doubles as the
//!   engine's presentation sink
//! - [`oracle`] provides the in-memory grid and equipment adapters
pub mod error;
pub mod events;
pub mod oracle;
pub mod providers;
pub mod runtime;

pub use error::{Result, RuntimeError};
pub use events::{Event, EventBus, Topic};
pub use oracle::{GridPathfinding, InMemoryEquipment};
pub use providers::{AiContext, Goal, GoalBehavior, Plan, Planner, Routine};
pub use runtime::{Progress, RunSummary, Simulation, SimulationConfig};
