//! Goals and the behavior contract.

use skirmish_core::{Action, EventKind, MovementMode, WorldEvent};

use super::{AiContext, SubscriptionScope};

/// A named intent an autonomous unit pursues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Goal {
    Fight,
    Flee,
    SwitchStance,
    Patrol,
    Wander,
    Follow,
    InspectSound,
    Idle,
}

/// What an active behavior wants after one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Enqueue these actions in order.
    Act(Vec<Action>),
    /// Nothing to do this turn.
    Wait,
    /// Activate the given goal and keep it until it releases.
    HandOff(Goal),
    /// Done; let the planner pick something else.
    Release,
}

/// One long-lived behavior per goal per unit.
///
/// Only one behavior is active at a time. `on_activated` and
/// `on_deactivated` bracket the active window; `on_tick` runs once per
/// planner decision while active.
pub trait GoalBehavior {
    fn goal(&self) -> Goal;

    /// Lower is preferred. Values at or above the tuning's
    /// `not_applicable` take the behavior out of the running.
    fn cost(&mut self, ctx: &mut AiContext<'_>) -> f32;

    /// World events this behavior listens to even while inactive.
    fn ambient(&self) -> &'static [EventKind] {
        &[]
    }

    /// Receives one event of an [`GoalBehavior::ambient`] kind.
    fn observe(&mut self, _ctx: &AiContext<'_>, _event: &WorldEvent) {}

    /// Preferred movement style while active.
    fn movement_mode(&self) -> MovementMode {
        MovementMode::Walk
    }

    fn on_activated(&mut self, _ctx: &AiContext<'_>, _scope: &mut SubscriptionScope) {}

    /// `events` holds everything the active scope received since the last
    /// tick.
    fn on_tick(&mut self, ctx: &mut AiContext<'_>, events: &[WorldEvent]) -> Decision;

    fn on_deactivated(&mut self) {}
}
