//! Behavior selection for one autonomous unit.

use std::collections::BTreeSet;

use skirmish_core::{Action, EventKind, MovementMode, Position, UnitId};

use super::behaviors::{
    FightBehavior, FleeBehavior, FollowBehavior, IdleBehavior, InspectSoundBehavior,
    PatrolBehavior, SwitchStanceBehavior, WanderBehavior,
};
use super::{AiContext, Decision, Goal, GoalBehavior, SubscriptionScope};
use crate::events::EventBus;

/// Per-unit routine data that shapes the low-priority behaviors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Routine {
    pub patrol: Vec<Position>,
    pub follow: Option<UnitId>,
}

/// Outcome of one planner decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    /// Goal that produced the plan; `None` when nothing was applicable.
    pub goal: Option<Goal>,
    /// Actions to enqueue in order. Empty means the unit waits.
    pub actions: Vec<Action>,
    pub movement_mode: MovementMode,
}

impl Plan {
    fn wait(goal: Option<Goal>, movement_mode: MovementMode) -> Self {
        Self {
            goal,
            actions: Vec::new(),
            movement_mode,
        }
    }

    pub fn is_wait(&self) -> bool {
        self.actions.is_empty()
    }
}

pub struct Planner {
    unit: UnitId,
    behaviors: Vec<Box<dyn GoalBehavior>>,
    active: Option<usize>,
    /// Behavior activated by a hand-off; costs are not evaluated while set.
    locked: Option<usize>,
    scope: SubscriptionScope,
    /// Subscriptions for the behaviors' ambient kinds.
    ambient: SubscriptionScope,
}

impl Planner {
    /// Planner without behaviors.
    pub fn new(unit: UnitId, bus: EventBus) -> Self {
        Self {
            unit,
            behaviors: Vec::new(),
            active: None,
            locked: None,
            scope: SubscriptionScope::new(bus.clone()),
            ambient: SubscriptionScope::new(bus),
        }
    }

    /// Planner with the standard behavior set, in tie-breaking order.
    pub fn standard(unit: UnitId, bus: EventBus, routine: &Routine) -> Self {
        let mut planner = Self::new(unit, bus);
        planner.register(Box::new(FightBehavior::default()));
        planner.register(Box::new(FleeBehavior::default()));
        planner.register(Box::new(SwitchStanceBehavior::default()));
        planner.register(Box::new(InspectSoundBehavior::default()));
        planner.register(Box::new(FollowBehavior::new(routine.follow)));
        planner.register(Box::new(PatrolBehavior::new(routine.patrol.clone())));
        planner.register(Box::new(WanderBehavior::default()));
        planner.register(Box::new(IdleBehavior));
        planner
    }

    /// Adds a behavior. Earlier registrations win cost ties.
    pub fn register(&mut self, behavior: Box<dyn GoalBehavior>) {
        for kind in behavior.ambient() {
            self.ambient.subscribe(*kind);
        }
        self.behaviors.push(behavior);
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn active_goal(&self) -> Option<Goal> {
        self.active.map(|index| self.behaviors[index].goal())
    }

    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }

    /// Kinds the active behavior is subscribed to.
    pub fn subscriptions(&self) -> usize {
        self.scope.len()
    }

    /// Picks and ticks a behavior, following hand-offs and releases until a
    /// behavior acts or waits. Each behavior ticks at most once per decision.
    pub fn decide(&mut self, ctx: &mut AiContext<'_>) -> Plan {
        self.deliver_ambient(ctx);

        let mut ticked = BTreeSet::new();
        loop {
            let Some(index) = self.select(ctx, &ticked) else {
                tracing::debug!(unit = %self.unit, "no applicable goal");
                self.deactivate();
                return Plan::wait(None, MovementMode::Walk);
            };
            ticked.insert(index);
            self.activate(index, ctx);

            let events = self.scope.drain();
            let behavior = &mut self.behaviors[index];
            let goal = behavior.goal();
            let mode = behavior.movement_mode();
            match behavior.on_tick(ctx, &events) {
                Decision::Act(actions) => {
                    tracing::debug!(unit = %self.unit, %goal, count = actions.len(), "goal acted");
                    return Plan {
                        goal: Some(goal),
                        actions,
                        movement_mode: mode,
                    };
                }
                Decision::Wait => return Plan::wait(Some(goal), mode),
                Decision::HandOff(next) => {
                    let target = self
                        .behaviors
                        .iter()
                        .position(|behavior| behavior.goal() == next)
                        .filter(|target| !ticked.contains(target));
                    tracing::debug!(unit = %self.unit, from = %goal, to = %next, "goal handed off");
                    self.locked = target;
                }
                Decision::Release => {
                    tracing::debug!(unit = %self.unit, %goal, "goal released");
                    self.locked = None;
                }
            }
        }
    }

    fn deliver_ambient(&mut self, ctx: &AiContext<'_>) {
        for event in self.ambient.drain() {
            let kind: EventKind = event.kind();
            for behavior in &mut self.behaviors {
                if behavior.ambient().contains(&kind) {
                    behavior.observe(ctx, &event);
                }
            }
        }
    }

    /// Locked behavior, or the cheapest applicable one not yet ticked.
    fn select(&mut self, ctx: &mut AiContext<'_>, ticked: &BTreeSet<usize>) -> Option<usize> {
        if let Some(locked) = self.locked {
            return Some(locked);
        }
        let not_applicable = ctx.tuning().not_applicable;
        let mut best: Option<(usize, f32)> = None;
        for (index, behavior) in self.behaviors.iter_mut().enumerate() {
            if ticked.contains(&index) {
                continue;
            }
            let cost = behavior.cost(ctx);
            tracing::trace!(unit = %self.unit, goal = %behavior.goal(), cost, "goal cost");
            if cost >= not_applicable {
                continue;
            }
            if best.is_none_or(|(_, lowest)| cost < lowest) {
                best = Some((index, cost));
            }
        }
        best.map(|(index, _)| index)
    }

    fn activate(&mut self, index: usize, ctx: &AiContext<'_>) {
        if self.active == Some(index) {
            return;
        }
        self.deactivate();
        let behavior = &mut self.behaviors[index];
        tracing::debug!(unit = %self.unit, goal = %behavior.goal(), "goal activated");
        behavior.on_activated(ctx, &mut self.scope);
        self.active = Some(index);
    }

    fn deactivate(&mut self) {
        if let Some(previous) = self.active.take() {
            self.behaviors[previous].on_deactivated();
            self.scope.clear();
            if self.locked == Some(previous) {
                self.locked = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use skirmish_core::{
        ActionKind, Env, Faction, GameConfig, NullPresentation, UnitSpec, World, WorldEvent,
    };

    use super::*;
    use crate::oracle::{GridPathfinding, InMemoryEquipment};
    use skirmish_content::MapLayout;

    /// Behavior with a fixed cost that records its lifecycle.
    struct Fixed {
        goal: Goal,
        cost: f32,
        decision: Decision,
        log: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
    }

    impl Fixed {
        fn new(
            goal: Goal,
            cost: f32,
            decision: Decision,
            log: &std::rc::Rc<std::cell::RefCell<Vec<String>>>,
        ) -> Box<Self> {
            Box::new(Self {
                goal,
                cost,
                decision,
                log: log.clone(),
            })
        }
    }

    impl GoalBehavior for Fixed {
        fn goal(&self) -> Goal {
            self.goal
        }

        fn cost(&mut self, _ctx: &mut AiContext<'_>) -> f32 {
            self.cost
        }

        fn on_activated(&mut self, _ctx: &AiContext<'_>, scope: &mut SubscriptionScope) {
            scope.subscribe(EventKind::Sound);
            self.log.borrow_mut().push(format!("activate {}", self.goal));
        }

        fn on_tick(&mut self, _ctx: &mut AiContext<'_>, _events: &[WorldEvent]) -> Decision {
            self.log.borrow_mut().push(format!("tick {}", self.goal));
            self.decision.clone()
        }

        fn on_deactivated(&mut self) {
            self.log.borrow_mut().push(format!("deactivate {}", self.goal));
        }
    }

    struct Harness {
        config: GameConfig,
        world: World,
        pathfinding: GridPathfinding,
        equipment: InMemoryEquipment,
        rng: ChaCha8Rng,
        unit: UnitId,
    }

    impl Harness {
        fn new() -> Self {
            let config = GameConfig::default();
            let mut world = World::new();
            let unit = world
                .spawn(UnitSpec::new("grunt", Faction(1), Position::new(2, 2)), &config)
                .unwrap();
            Self {
                config,
                world,
                pathfinding: GridPathfinding::new(MapLayout::new(8, 8)),
                equipment: InMemoryEquipment::new(),
                rng: ChaCha8Rng::seed_from_u64(7),
                unit,
            }
        }

        fn decide(&mut self, planner: &mut Planner) -> Plan {
            let mut presentation = NullPresentation;
            let env = Env::new(
                &self.config,
                &self.pathfinding,
                &mut self.equipment,
                &mut presentation,
                &mut self.rng,
            );
            let mut ctx = AiContext::new(self.unit, &self.world, env);
            planner.decide(&mut ctx)
        }
    }

    fn turn_action() -> Action {
        Action::new(
            ActionKind::Turn,
            skirmish_core::ActionTarget::Cell(Position::new(3, 2)),
        )
    }

    #[test]
    fn lowest_cost_wins_and_ties_go_to_first_registered() {
        let mut harness = Harness::new();
        let log = Default::default();
        let mut planner = Planner::new(harness.unit, EventBus::new());
        planner.register(Fixed::new(Goal::Patrol, 20.0, Decision::Wait, &log));
        planner.register(Fixed::new(Goal::Wander, 10.0, Decision::Act(vec![turn_action()]), &log));
        planner.register(Fixed::new(Goal::Idle, 10.0, Decision::Wait, &log));

        for _ in 0..3 {
            let plan = harness.decide(&mut planner);
            assert_eq!(plan.goal, Some(Goal::Wander));
            assert_eq!(plan.actions, vec![turn_action()]);
        }
        assert_eq!(
            *log.borrow(),
            vec!["activate wander", "tick wander", "tick wander", "tick wander"]
        );
    }

    #[test]
    fn nothing_applicable_waits_and_drops_subscriptions() {
        let mut harness = Harness::new();
        let log = Default::default();
        let mut planner = Planner::new(harness.unit, EventBus::new());
        planner.register(Fixed::new(Goal::Idle, 100.0, Decision::Wait, &log));

        let plan = harness.decide(&mut planner);
        assert_eq!(plan.goal, None);
        assert!(plan.is_wait());
        assert_eq!(planner.subscriptions(), 0);
    }

    #[test]
    fn hand_off_locks_and_release_reselects() {
        let mut harness = Harness::new();
        let log = Default::default();
        let mut planner = Planner::new(harness.unit, EventBus::new());
        planner.register(Fixed::new(Goal::Fight, 1.0, Decision::HandOff(Goal::Flee), &log));
        planner.register(Fixed::new(Goal::Flee, 100.0, Decision::Act(vec![turn_action()]), &log));

        let plan = harness.decide(&mut planner);
        assert_eq!(plan.goal, Some(Goal::Flee));
        assert!(planner.is_locked());
        assert_eq!(planner.subscriptions(), 1);
        assert_eq!(
            *log.borrow(),
            vec!["activate fight", "tick fight", "deactivate fight", "activate flee", "tick flee"]
        );

        // Locked: fight's cheaper cost is not even considered.
        let plan = harness.decide(&mut planner);
        assert_eq!(plan.goal, Some(Goal::Flee));
        assert_eq!(planner.active_goal(), Some(Goal::Flee));
    }

    #[test]
    fn released_behavior_is_skipped_for_the_rest_of_the_decision() {
        let mut harness = Harness::new();
        let log = Default::default();
        let mut planner = Planner::new(harness.unit, EventBus::new());
        planner.register(Fixed::new(Goal::InspectSound, 5.0, Decision::Release, &log));
        planner.register(Fixed::new(Goal::Idle, 90.0, Decision::Wait, &log));

        let plan = harness.decide(&mut planner);
        assert_eq!(plan.goal, Some(Goal::Idle));
        assert_eq!(
            *log.borrow(),
            vec![
                "activate inspect_sound",
                "tick inspect_sound",
                "deactivate inspect_sound",
                "activate idle",
                "tick idle",
            ]
        );
    }
}
