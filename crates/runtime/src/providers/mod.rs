//! Decision providers for units that are not driven by input.

pub mod ai;

pub use ai::{AiContext, Goal, GoalBehavior, Plan, Planner, Routine};
