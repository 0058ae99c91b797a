//! Running from a threat.

use skirmish_core::{Action, EventKind, MovementMode, ObstacleMask, Position, UnitId, WorldEvent};

use crate::providers::ai::{AiContext, Decision, Goal, GoalBehavior, SubscriptionScope};

/// Keeps a band of distance between the unit and its threat. Never chosen by
/// cost; Fight hands off to it.
#[derive(Clone, Debug, Default)]
pub struct FleeBehavior {
    threat: Option<UnitId>,
    destination: Option<Position>,
    /// Distance to the threat when the destination was chosen.
    distance_at_choice: u32,
}

impl FleeBehavior {
    pub fn threat(&self) -> Option<UnitId> {
        self.threat
    }

    pub fn destination(&self) -> Option<Position> {
        self.destination
    }

    /// Random reachable cell inside the flee band, or failing that the
    /// reachable cell farthest from the threat.
    fn choose(&self, ctx: &mut AiContext<'_>, threat: Position) -> Option<Position> {
        let tuning = ctx.tuning();
        let near = tuning.flee_distance;
        let far = tuning.flee_distance + tuning.flee_band;
        let here = ctx.position();
        let cells = ctx
            .env
            .pathfinding
            .reachable_cells(here, 1, far, ObstacleMask::all());
        let band: Vec<Position> = cells
            .iter()
            .copied()
            .filter(|cell| (near..=far).contains(&cell.chebyshev(threat)))
            .collect();
        if let Some(cell) = ctx.pick(&band) {
            return Some(cell);
        }
        let current = here.chebyshev(threat);
        cells
            .into_iter()
            .filter(|cell| cell.chebyshev(threat) > current)
            .max_by_key(|cell| cell.chebyshev(threat))
    }
}

impl GoalBehavior for FleeBehavior {
    fn goal(&self) -> Goal {
        Goal::Flee
    }

    fn cost(&mut self, ctx: &mut AiContext<'_>) -> f32 {
        ctx.tuning().not_applicable
    }

    fn movement_mode(&self) -> MovementMode {
        MovementMode::Run
    }

    fn on_activated(&mut self, ctx: &AiContext<'_>, scope: &mut SubscriptionScope) {
        self.threat = ctx.nearest_enemy().map(|enemy| enemy.id);
        scope.subscribe(EventKind::UnitDied);
    }

    fn on_tick(&mut self, ctx: &mut AiContext<'_>, events: &[WorldEvent]) -> Decision {
        for event in events {
            if let WorldEvent::UnitDied { unit, .. } = event
                && self.threat == Some(*unit)
            {
                self.threat = None;
            }
        }
        if self.threat.is_none() {
            self.threat = ctx.nearest_enemy().map(|enemy| enemy.id);
        }
        let Some(threat) = self.threat.and_then(|id| ctx.living(id)) else {
            return Decision::Release;
        };

        let here = ctx.position();
        let distance = here.chebyshev(threat.position);
        let closing = ctx.tuning().flee_retarget_closing;
        let closed_in = self.distance_at_choice.saturating_sub(distance) >= closing;
        if self.destination.is_none_or(|cell| cell == here) || closed_in {
            self.destination = self.choose(ctx, threat.position);
            self.distance_at_choice = distance;
            tracing::debug!(unit = %ctx.unit, threat = %threat.id, destination = ?self.destination, "flee destination");
        }

        match self.destination {
            Some(cell) if cell != here => Decision::Act(vec![Action::move_to(cell)]),
            _ => Decision::Wait,
        }
    }

    fn on_deactivated(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use crate::providers::ai::behaviors::testing::Arena;

    fn in_band(cell: Position, threat: Position) -> bool {
        (10..=25).contains(&cell.chebyshev(threat))
    }

    #[test]
    fn runs_to_a_cell_inside_the_band() {
        let mut arena = Arena::new(40, 40);
        let me = arena.spawn("peasant", 1, 20, 20);
        let hero = arena.spawn("hero", 0, 23, 20);
        arena.spot(me, &[hero]);

        let mut flee = FleeBehavior::default();
        let mut scope = SubscriptionScope::new(EventBus::new());
        let decision = arena.with_ctx(me, |ctx| {
            flee.on_activated(ctx, &mut scope);
            flee.on_tick(ctx, &[])
        });
        assert_eq!(flee.threat(), Some(hero));
        let destination = flee.destination().unwrap();
        assert!(in_band(destination, Position::new(23, 20)));
        assert_eq!(decision, Decision::Act(vec![Action::move_to(destination)]));
    }

    #[test]
    fn retargets_when_the_threat_closes_in() {
        let mut arena = Arena::new(40, 40);
        let me = arena.spawn("peasant", 1, 20, 20);
        let hero = arena.spawn("hero", 0, 23, 20);
        arena.spot(me, &[hero]);

        let mut flee = FleeBehavior::default();
        arena.with_ctx(me, |ctx| flee.on_tick(ctx, &[]));
        let first = flee.destination().unwrap();

        arena.world.get_mut(hero).unwrap().position = Position::new(21, 20);
        arena.sync();
        arena.with_ctx(me, |ctx| flee.on_tick(ctx, &[]));
        let second = flee.destination().unwrap();
        assert!(in_band(first, Position::new(23, 20)));
        assert!(in_band(second, Position::new(21, 20)));
        assert_eq!(flee.distance_at_choice, 1);
    }

    #[test]
    fn releases_once_the_threat_is_dead() {
        let mut arena = Arena::new(20, 20);
        let me = arena.spawn("peasant", 1, 5, 5);
        let hero = arena.spawn("hero", 0, 6, 5);
        arena.spot(me, &[hero]);

        let mut flee = FleeBehavior::default();
        arena.with_ctx(me, |ctx| flee.on_tick(ctx, &[]));
        assert!(flee.destination().is_some());

        arena.world.get_mut(hero).unwrap().alive = false;
        let died = WorldEvent::UnitDied {
            unit: hero,
            killer: None,
        };
        let decision = arena.with_ctx(me, |ctx| flee.on_tick(ctx, &[died]));
        assert_eq!(decision, Decision::Release);

        flee.on_deactivated();
        assert_eq!(flee.destination(), None);
    }
}
