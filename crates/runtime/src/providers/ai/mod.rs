//! Goal-oriented planner for autonomous units.
//!
//! Every autonomous unit owns one [`Planner`] holding one long-lived
//! [`GoalBehavior`] per [`Goal`]. Each decision the planner asks every
//! behavior for its cost, activates the cheapest one and lets it tick:
//!
//! 1. **Cost**: non-negative, lower is preferred, at or above
//!    `AiTuning::not_applicable` the behavior is skipped
//! 2. **Activation**: `on_activated` subscribes the behavior to the world
//!    events it needs through a [`SubscriptionScope`] owned by the planner
//! 3. **Tick**: `on_tick` turns the situation into actions to enqueue
//! 4. **Deactivation**: `on_deactivated` resets counters; the planner drops
//!    the scope so no subscription outlives the active window
//!
//! A behavior may hand control to another goal (Fight to Flee) or release
//! it when it has nothing left to do.
//!
//! # Core Components
//!
//! - [`Planner`]: behavior registry, selection and lock-in
//! - [`AiContext`]: read access to the world plus helpers shared by behaviors
//! - [`behaviors`]: the standard behavior set
//! - [`weighted_pick`]: cumulative-weight draw used for attack selection

pub mod behaviors;
pub mod context;
pub mod goal;
pub mod planner;
pub mod scope;
pub mod selection;

pub use context::AiContext;
pub use goal::{Decision, Goal, GoalBehavior};
pub use planner::{Plan, Planner, Routine};
pub use scope::SubscriptionScope;
pub use selection::weighted_pick;
