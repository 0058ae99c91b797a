use skirmish_core::WorldEvent;

use crate::providers::ai::{AiContext, Decision, Goal, GoalBehavior};

/// Fallback that lets the turn pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdleBehavior;

impl GoalBehavior for IdleBehavior {
    fn goal(&self) -> Goal {
        Goal::Idle
    }

    fn cost(&mut self, ctx: &mut AiContext<'_>) -> f32 {
        ctx.tuning().idle_cost
    }

    fn on_tick(&mut self, _ctx: &mut AiContext<'_>, _events: &[WorldEvent]) -> Decision {
        Decision::Wait
    }
}
