//! Engaging known enemies.

use std::cmp::Reverse;

use skirmish_core::action::melee_reach;
use skirmish_core::{
    Action, ActionKind, ActionTarget, EventKind, MovementMode, Position, Unit, UnitId, WorldEvent,
};

use crate::providers::ai::selection::{positive_total, weighted_pick};
use crate::providers::ai::{AiContext, Decision, Goal, GoalBehavior, SubscriptionScope};

/// How far a unit looks for a cell to swing from, or to back off to.
const REPOSITION_LIMIT: u32 = 6;

/// Attacks known enemies with a weighted random choice among (attack,
/// position) pairs, pursuing when nothing is in reach.
#[derive(Clone, Debug, Default)]
pub struct FightBehavior {
    /// Last enemy that hurt this unit. Preferred as a target.
    locked: Option<UnitId>,
}

struct Candidate {
    /// Cell to walk to first, if any.
    approach: Option<Position>,
    action: Action,
    value: f32,
}

impl FightBehavior {
    pub fn locked_target(&self) -> Option<UnitId> {
        self.locked
    }

    fn note(&mut self, me: UnitId, event: &WorldEvent) {
        match *event {
            WorldEvent::TookDamage { unit, attacker, .. } if unit == me => {
                self.locked = Some(attacker);
            }
            WorldEvent::UnitDied { unit, .. } if self.locked == Some(unit) => {
                self.locked = None;
            }
            _ => {}
        }
    }

    /// Known enemies plus the locked target, even if it is out of sight.
    fn targets<'a>(&self, ctx: &AiContext<'a>) -> Vec<&'a Unit> {
        let mut targets = ctx.known_enemies();
        if let Some(locked) = self.locked.and_then(|id| ctx.living(id))
            && !targets.iter().any(|enemy| enemy.id == locked.id)
        {
            targets.push(locked);
        }
        targets
    }

    fn value(&self, ctx: &AiContext<'_>, action: &Action, origin: Position, target: &Unit) -> f32 {
        let tuning = ctx.tuning();
        let blocked = ctx
            .world
            .unit_at(origin)
            .is_some_and(|occupant| occupant.id != ctx.unit);
        if blocked || !ctx.is_valid(action, origin) {
            return tuning.invalid_value;
        }
        let mut value = tuning.enemy_value * (1.0 - tuning.health_weight * target.health.fraction());
        if self.locked == Some(target.id) {
            value += tuning.locked_target_bonus;
        }
        value
    }

    /// Attacks from where the unit stands. Only when none of them is
    /// possible are melee swings after a short approach considered.
    fn candidates(&self, ctx: &AiContext<'_>, targets: &[&Unit]) -> Vec<Candidate> {
        let here = ctx.position();
        let mut candidates = Vec::new();
        for target in targets {
            for kind in [ActionKind::MeleeAttack, ActionKind::RangedAttack] {
                if !ctx.can(kind) {
                    continue;
                }
                let action = Action::new(kind, ActionTarget::Unit(target.id));
                candidates.push(Candidate {
                    approach: None,
                    action,
                    value: self.value(ctx, &action, here, target),
                });
            }
        }
        if candidates.iter().any(|candidate| candidate.value > 0.0)
            || !ctx.can(ActionKind::MeleeAttack)
            || !ctx.can(ActionKind::Move)
        {
            return candidates;
        }

        let reach = melee_reach(&ctx.loadout());
        let cells = ctx.affordable_cells(REPOSITION_LIMIT);
        for target in targets {
            let action = Action::melee(target.id);
            for cell in cells
                .iter()
                .filter(|cell| cell.chebyshev(target.position) <= reach)
            {
                candidates.push(Candidate {
                    approach: Some(*cell),
                    action,
                    value: self.value(ctx, &action, *cell, target),
                });
            }
        }
        candidates
    }

    /// Reachable cell farthest from every target, at least `min_range` away.
    fn retreat(&self, ctx: &AiContext<'_>, targets: &[&Unit], min_range: u32) -> Option<Position> {
        let here = ctx.position();
        let distance = |cell: Position| {
            targets
                .iter()
                .map(|enemy| enemy.position.chebyshev(cell))
                .min()
                .unwrap_or(u32::MAX)
        };
        ctx.affordable_cells(REPOSITION_LIMIT)
            .into_iter()
            .filter(|cell| distance(*cell) >= min_range.max(2))
            .max_by_key(|cell| (distance(*cell), Reverse(here.chebyshev(*cell))))
    }
}

impl GoalBehavior for FightBehavior {
    fn goal(&self) -> Goal {
        Goal::Fight
    }

    fn cost(&mut self, ctx: &mut AiContext<'_>) -> f32 {
        if self.targets(ctx).is_empty() {
            ctx.tuning().not_applicable
        } else {
            ctx.tuning().fight_cost
        }
    }

    fn ambient(&self) -> &'static [EventKind] {
        &[EventKind::TookDamage]
    }

    fn observe(&mut self, ctx: &AiContext<'_>, event: &WorldEvent) {
        self.note(ctx.unit, event);
    }

    fn movement_mode(&self) -> MovementMode {
        MovementMode::Run
    }

    /// Damage already arrives through the ambient scope.
    fn on_activated(&mut self, _ctx: &AiContext<'_>, scope: &mut SubscriptionScope) {
        scope.subscribe(EventKind::UnitDied);
    }

    fn on_tick(&mut self, ctx: &mut AiContext<'_>, events: &[WorldEvent]) -> Decision {
        for event in events {
            self.note(ctx.unit, event);
        }
        let targets = self.targets(ctx);
        let here = ctx.position();
        let Some(nearest) = targets
            .iter()
            .min_by_key(|enemy| (here.chebyshev(enemy.position), enemy.id))
            .copied()
        else {
            return Decision::Release;
        };

        let loadout = ctx.loadout();
        if loadout.ranged_weapon().is_none()
            && !loadout.has_melee_option()
            && !loadout.has_alternate_set()
        {
            return Decision::HandOff(Goal::Flee);
        }

        if let Some((_, weapon)) = loadout.ranged_weapon() {
            let pressed = targets
                .iter()
                .any(|enemy| enemy.position.is_adjacent(here));
            if pressed {
                if loadout.alternate_has_melee() && ctx.can(ActionKind::SwapWeaponSet) {
                    return Decision::Act(vec![Action::new(
                        ActionKind::SwapWeaponSet,
                        ActionTarget::None,
                    )]);
                }
                if let Some(cell) = self.retreat(ctx, &targets, weapon.min_range) {
                    return Decision::Act(vec![Action::move_to(cell)]);
                }
            } else if !weapon.is_loaded && ctx.can(ActionKind::Reload) {
                return Decision::Act(vec![Action::new(ActionKind::Reload, ActionTarget::None)]);
            }
        }

        let candidates = self.candidates(ctx, &targets);
        let values: Vec<f32> = candidates.iter().map(|candidate| candidate.value).collect();
        let draw = ctx.draw(positive_total(&values));
        if let Some(chosen) = weighted_pick(&values, draw).and_then(|index| candidates.get(index)) {
            let actions = chosen
                .approach
                .map(Action::move_to)
                .into_iter()
                .chain([chosen.action])
                .collect();
            return Decision::Act(actions);
        }

        match ctx.step_towards(nearest.position, 1) {
            Some(cell) => Decision::Act(vec![Action::move_to(cell)]),
            None => Decision::Wait,
        }
    }

    fn on_deactivated(&mut self) {
        self.locked = None;
    }
}
