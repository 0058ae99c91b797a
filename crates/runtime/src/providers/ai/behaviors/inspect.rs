use skirmish_core::{Action, EventKind, MovementMode, Position, WorldEvent};

use crate::providers::ai::{AiContext, Decision, Goal, GoalBehavior, SubscriptionScope};

/// Radius of the random search once the sound's origin is reached.
const SEARCH_RADIUS: u32 = 2;

/// Sneaks towards the last combat noise heard and searches around it.
#[derive(Clone, Debug, Default)]
pub struct InspectSoundBehavior {
    heard: Option<Position>,
    /// Decisions spent searching at the sound's origin.
    searched: u32,
}

impl InspectSoundBehavior {
    pub fn heard(&self) -> Option<Position> {
        self.heard
    }

    fn hear(&mut self, ctx: &AiContext<'_>, event: &WorldEvent) {
        let WorldEvent::Sound { source, at } = *event else {
            return;
        };
        let Some(me) = ctx.me() else {
            return;
        };
        let audible = me.position.chebyshev(at) <= ctx.config().perception.hearing_range;
        if source != me.id && audible {
            self.heard = Some(at);
        }
    }
}

impl GoalBehavior for InspectSoundBehavior {
    fn goal(&self) -> Goal {
        Goal::InspectSound
    }

    fn cost(&mut self, ctx: &mut AiContext<'_>) -> f32 {
        if self.heard.is_some() && ctx.known_enemies().is_empty() {
            ctx.tuning().inspect_sound_cost
        } else {
            ctx.tuning().not_applicable
        }
    }

    fn ambient(&self) -> &'static [EventKind] {
        &[EventKind::Sound]
    }

    fn observe(&mut self, ctx: &AiContext<'_>, event: &WorldEvent) {
        self.hear(ctx, event);
    }

    fn movement_mode(&self) -> MovementMode {
        MovementMode::Sneak
    }

    fn on_activated(&mut self, _ctx: &AiContext<'_>, scope: &mut SubscriptionScope) {
        scope.subscribe(EventKind::Sound);
    }

    fn on_tick(&mut self, ctx: &mut AiContext<'_>, events: &[WorldEvent]) -> Decision {
        for event in events {
            self.hear(ctx, event);
        }
        let Some(origin) = self.heard else {
            return Decision::Release;
        };

        if ctx.position().chebyshev(origin) > 1 {
            return match ctx.step_towards(origin, 1) {
                Some(cell) => Decision::Act(vec![Action::move_to(cell)]),
                None => {
                    self.heard = None;
                    Decision::Release
                }
            };
        }

        self.searched += 1;
        if self.searched > ctx.tuning().search_turns {
            tracing::debug!(unit = %ctx.unit, at = %origin, "search finished");
            self.heard = None;
            self.searched = 0;
            return Decision::Release;
        }
        let cells = ctx.affordable_cells(SEARCH_RADIUS);
        match ctx.pick(&cells) {
            Some(cell) => Decision::Act(vec![Action::move_to(cell)]),
            None => Decision::Wait,
        }
    }

    fn on_deactivated(&mut self) {
        self.searched = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ai::behaviors::testing::Arena;

    #[test]
    fn hears_nearby_sounds_and_sneaks_over() {
        let mut arena = Arena::new(20, 20);
        let me = arena.spawn("sentry", 1, 2, 2);
        let noisy = arena.spawn("brawler", 2, 15, 15);
        let mut inspect = InspectSoundBehavior::default();

        let far = WorldEvent::Sound {
            source: noisy,
            at: Position::new(15, 15),
        };
        let near = WorldEvent::Sound {
            source: noisy,
            at: Position::new(8, 2),
        };
        let (before, after, decision) = arena.with_ctx(me, |ctx| {
            inspect.observe(ctx, &far);
            let before = inspect.cost(ctx);
            inspect.observe(ctx, &near);
            let after = inspect.cost(ctx);
            (before, after, inspect.on_tick(ctx, &[]))
        });
        assert_eq!(before, 100.0);
        assert_eq!(after, 30.0);
        assert_eq!(decision, Decision::Act(vec![Action::move_to(Position::new(7, 2))]));
    }

    #[test]
    fn gives_up_after_searching() {
        let mut arena = Arena::new(20, 20);
        let me = arena.spawn("sentry", 1, 5, 5);
        let mut inspect = InspectSoundBehavior::default();
        inspect.heard = Some(Position::new(5, 6));

        for _ in 0..2 {
            let decision = arena.with_ctx(me, |ctx| inspect.on_tick(ctx, &[]));
            assert!(matches!(decision, Decision::Act(_)));
        }
        let decision = arena.with_ctx(me, |ctx| inspect.on_tick(ctx, &[]));
        assert_eq!(decision, Decision::Release);
        assert_eq!(inspect.heard(), None);
    }
}
