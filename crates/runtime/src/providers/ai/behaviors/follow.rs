use skirmish_core::{Action, UnitId, WorldEvent};

use crate::providers::ai::{AiContext, Decision, Goal, GoalBehavior};

/// Stays within `follow_distance` of a leader.
#[derive(Clone, Debug, Default)]
pub struct FollowBehavior {
    leader: Option<UnitId>,
    /// Consecutive decisions without a path to the leader.
    lost: u32,
}

impl FollowBehavior {
    pub fn new(leader: Option<UnitId>) -> Self {
        Self { leader, lost: 0 }
    }
}

impl GoalBehavior for FollowBehavior {
    fn goal(&self) -> Goal {
        Goal::Follow
    }

    fn cost(&mut self, ctx: &mut AiContext<'_>) -> f32 {
        let tuning = ctx.tuning();
        let here = ctx.position();
        let trailing = self
            .leader
            .and_then(|id| ctx.living(id))
            .is_some_and(|leader| leader.position.chebyshev(here) > tuning.follow_distance);
        if trailing && self.lost < tuning.search_turns {
            tuning.follow_cost
        } else {
            tuning.not_applicable
        }
    }

    fn on_tick(&mut self, ctx: &mut AiContext<'_>, _events: &[WorldEvent]) -> Decision {
        let Some(leader) = self.leader.and_then(|id| ctx.living(id)) else {
            return Decision::Release;
        };
        match ctx.step_towards(leader.position, ctx.tuning().follow_distance) {
            Some(cell) => {
                self.lost = 0;
                Decision::Act(vec![Action::move_to(cell)])
            }
            None => {
                self.lost += 1;
                Decision::Release
            }
        }
    }

    fn on_deactivated(&mut self) {
        self.lost = 0;
    }
}
