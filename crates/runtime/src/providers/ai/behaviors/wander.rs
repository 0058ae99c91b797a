use skirmish_core::{Action, WorldEvent};

use crate::providers::ai::{AiContext, Decision, Goal, GoalBehavior};

/// Short random walks around the current position.
#[derive(Clone, Debug, Default)]
pub struct WanderBehavior {
    walks: u32,
}

impl GoalBehavior for WanderBehavior {
    fn goal(&self) -> Goal {
        Goal::Wander
    }

    /// Applicable until `wander_limit` walks were made in one active window.
    fn cost(&mut self, ctx: &mut AiContext<'_>) -> f32 {
        let tuning = ctx.tuning();
        if self.walks < tuning.wander_limit {
            tuning.wander_cost
        } else {
            tuning.not_applicable
        }
    }

    fn on_tick(&mut self, ctx: &mut AiContext<'_>, _events: &[WorldEvent]) -> Decision {
        self.walks += 1;
        let cells = ctx.affordable_cells(ctx.tuning().wander_radius);
        match ctx.pick(&cells) {
            Some(cell) => Decision::Act(vec![Action::move_to(cell)]),
            None => Decision::Wait,
        }
    }

    fn on_deactivated(&mut self) {
        self.walks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ai::behaviors::testing::Arena;

    #[test]
    fn wanders_within_radius_until_the_limit() {
        let mut arena = Arena::new(20, 20);
        let me = arena.spawn("drifter", 1, 10, 10);
        let mut wander = WanderBehavior::default();

        for _ in 0..3 {
            let (cost, decision) =
                arena.with_ctx(me, |ctx| (wander.cost(ctx), wander.on_tick(ctx, &[])));
            assert_eq!(cost, 60.0);
            let Decision::Act(actions) = decision else {
                panic!("expected a walk");
            };
            let target = actions[0].target.cell().unwrap();
            assert!((1..=4).contains(&target.chebyshev(skirmish_core::Position::new(10, 10))));
        }
        assert_eq!(arena.with_ctx(me, |ctx| wander.cost(ctx)), 100.0);

        wander.on_deactivated();
        assert_eq!(arena.with_ctx(me, |ctx| wander.cost(ctx)), 60.0);
    }
}
