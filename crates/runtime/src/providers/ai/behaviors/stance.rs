//! Raising combat stances.

use skirmish_core::action::quote;
use skirmish_core::{Action, ActionKind, ActionTarget, CostQuote, StanceKind, WorldEvent};
use strum::IntoEnumIterator;

use crate::providers::ai::{AiContext, Decision, Goal, GoalBehavior};

/// Raises a stance when the per-stance roll succeeds. The roll happens when
/// the cost is evaluated, so the behavior only wins a decision in which it
/// has something to do.
#[derive(Clone, Debug, Default)]
pub struct SwitchStanceBehavior {
    chosen: Option<StanceKind>,
}

impl SwitchStanceBehavior {
    /// Whether raising `stance` is valid and affordable right now.
    fn can_raise(ctx: &AiContext<'_>, stance: StanceKind) -> bool {
        let kind = ActionKind::Stance(stance);
        let Some(me) = ctx.me() else {
            return false;
        };
        if me.stances.is_active(stance) || !ctx.can(kind) {
            return false;
        }
        let action = Action::new(kind, ActionTarget::None);
        if !ctx.is_valid(&action, me.position) {
            return false;
        }
        matches!(
            quote(ctx.world, ctx.unit, &action, me.position, &ctx.env),
            Ok(CostQuote::Cost(cost)) if cost <= me.ledger.ap()
        )
    }
}

impl GoalBehavior for SwitchStanceBehavior {
    fn goal(&self) -> Goal {
        Goal::SwitchStance
    }

    fn cost(&mut self, ctx: &mut AiContext<'_>) -> f32 {
        self.chosen = None;
        if ctx.known_enemies().is_empty() {
            return ctx.tuning().not_applicable;
        }
        for stance in StanceKind::iter() {
            if !Self::can_raise(ctx, stance) {
                continue;
            }
            let chance = ctx.config().stances.get(stance).npc_switch_chance;
            if ctx.roll() < chance {
                self.chosen = Some(stance);
                return ctx.tuning().switch_stance_cost;
            }
        }
        ctx.tuning().not_applicable
    }

    fn on_tick(&mut self, _ctx: &mut AiContext<'_>, _events: &[WorldEvent]) -> Decision {
        match self.chosen.take() {
            Some(stance) => Decision::Act(vec![Action::new(
                ActionKind::Stance(stance),
                ActionTarget::None,
            )]),
            None => Decision::Release,
        }
    }

    fn on_deactivated(&mut self) {
        self.chosen = None;
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::{EquipSlot, ItemStats, WeaponType};

    use super::*;
    use crate::providers::ai::behaviors::testing::Arena;

    fn shieldbearer(arena: &mut Arena) -> (skirmish_core::UnitId, skirmish_core::UnitId) {
        let me = arena.spawn("shieldbearer", 1, 2, 2);
        let hero = arena.spawn("hero", 0, 6, 2);
        arena.equip(me, EquipSlot::MainHand, ItemStats::weapon(WeaponType::Mace, 5, 3.0));
        arena.equip(me, EquipSlot::OffHand, ItemStats::shield(1.0, 4, 5.0));
        (me, hero)
    }

    #[test]
    fn raises_guard_when_the_roll_succeeds() {
        let mut arena = Arena::new(8, 8);
        arena.config.stances.raised_guard.npc_switch_chance = 1.0;
        let (me, hero) = shieldbearer(&mut arena);
        arena.spot(me, &[hero]);

        let mut behavior = SwitchStanceBehavior::default();
        let (cost, decision) =
            arena.with_ctx(me, |ctx| (behavior.cost(ctx), behavior.on_tick(ctx, &[])));
        assert_eq!(cost, 0.5);
        assert_eq!(
            decision,
            Decision::Act(vec![Action::new(
                ActionKind::Stance(StanceKind::RaisedGuard),
                ActionTarget::None
            )])
        );
    }

    #[test]
    fn not_applicable_without_enemies_or_luck() {
        let mut arena = Arena::new(8, 8);
        for stance in StanceKind::iter() {
            let chance = match stance {
                StanceKind::RaisedGuard => &mut arena.config.stances.raised_guard,
                StanceKind::BracedPolearm => &mut arena.config.stances.braced_polearm,
                StanceKind::TwoHandedGrip => &mut arena.config.stances.two_handed_grip,
            };
            chance.npc_switch_chance = 0.0;
        }
        let (me, hero) = shieldbearer(&mut arena);

        let mut behavior = SwitchStanceBehavior::default();
        let quiet = arena.with_ctx(me, |ctx| behavior.cost(ctx));
        assert_eq!(quiet, 100.0);

        arena.spot(me, &[hero]);
        let unlucky = arena.with_ctx(me, |ctx| behavior.cost(ctx));
        assert_eq!(unlucky, 100.0);
        let decision = arena.with_ctx(me, |ctx| behavior.on_tick(ctx, &[]));
        assert_eq!(decision, Decision::Release);
    }
}
