use skirmish_core::{Action, Position, WorldEvent};

use crate::providers::ai::{AiContext, Decision, Goal, GoalBehavior};

/// Walks a fixed route of waypoints in a loop.
#[derive(Clone, Debug, Default)]
pub struct PatrolBehavior {
    route: Vec<Position>,
    next: usize,
}

impl PatrolBehavior {
    pub fn new(route: Vec<Position>) -> Self {
        Self { route, next: 0 }
    }

    pub fn next_waypoint(&self) -> Option<Position> {
        self.route.get(self.next).copied()
    }
}

impl GoalBehavior for PatrolBehavior {
    fn goal(&self) -> Goal {
        Goal::Patrol
    }

    fn cost(&mut self, ctx: &mut AiContext<'_>) -> f32 {
        if self.route.is_empty() {
            ctx.tuning().not_applicable
        } else {
            ctx.tuning().patrol_cost
        }
    }

    fn on_tick(&mut self, ctx: &mut AiContext<'_>, _events: &[WorldEvent]) -> Decision {
        let here = ctx.position();
        if self.next_waypoint() == Some(here) {
            self.next = (self.next + 1) % self.route.len();
        }
        let Some(waypoint) = self.next_waypoint().filter(|waypoint| *waypoint != here) else {
            return Decision::Wait;
        };
        // Someone standing on the waypoint: get as close as possible.
        let destination = if ctx.world.unit_at(waypoint).is_some() {
            ctx.step_towards(waypoint, 1)
        } else {
            Some(waypoint)
        };
        match destination {
            Some(cell) => Decision::Act(vec![Action::move_to(cell)]),
            None => Decision::Wait,
        }
    }

    fn on_deactivated(&mut self) {
        self.next = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ai::behaviors::testing::Arena;

    #[test]
    fn advances_to_the_next_waypoint_on_arrival() {
        let mut arena = Arena::new(8, 8);
        let me = arena.spawn("sentry", 1, 1, 1);
        let route = vec![Position::new(1, 1), Position::new(5, 1), Position::new(5, 5)];
        let mut patrol = PatrolBehavior::new(route);

        let decision = arena.with_ctx(me, |ctx| patrol.on_tick(ctx, &[]));
        assert_eq!(decision, Decision::Act(vec![Action::move_to(Position::new(5, 1))]));

        arena.world.get_mut(me).unwrap().position = Position::new(5, 1);
        arena.sync();
        let decision = arena.with_ctx(me, |ctx| patrol.on_tick(ctx, &[]));
        assert_eq!(decision, Decision::Act(vec![Action::move_to(Position::new(5, 5))]));

        patrol.on_deactivated();
        assert_eq!(patrol.next_waypoint(), Some(Position::new(1, 1)));
    }

    #[test]
    fn empty_route_is_not_applicable() {
        let mut arena = Arena::new(4, 4);
        let me = arena.spawn("sentry", 1, 1, 1);
        let mut patrol = PatrolBehavior::default();
        assert_eq!(arena.with_ctx(me, |ctx| patrol.cost(ctx)), 100.0);
    }
}
