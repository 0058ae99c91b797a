//! Execution of a fully paid queue head.

use rand::Rng;

use crate::action::{Action, ActionError, ActionKind, ActionTarget};
use crate::combat::{
    AttackContext, AttackKind, AttackReport, Combatant, DefenseRolls, apply_damage, resolve_target,
};
use crate::env::{ActionState, EquipSlot, EquipmentChange, Env, Hand, Loadout};
use crate::event::WorldEvent;
use crate::stance::{StanceChange, StanceKind};
use crate::state::{MovementState, Position, UnitId};

use super::{GameEngine, StepOutcome};

impl<'a> GameEngine<'a> {
    /// Runs the head action. Kinds flagged as used instantly complete in
    /// this step; the rest go in flight. A failure here cancels the whole
    /// queue.
    pub(super) fn execute(&mut self, actor: UnitId, action: Action, env: &mut Env<'_>) -> StepOutcome {
        let result = if action.kind.is_used_instantly() {
            self.execute_instant(actor, action.kind, action.target, env)
                .map(|()| match self.finish_head(actor, env) {
                    Some(kind) => StepOutcome::Completed(kind),
                    None => StepOutcome::Idle,
                })
        } else {
            self.start_in_flight(actor, action, env)
        };

        match result {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(unit = %actor, %action, %error, "action failed during execution");
                self.clear_queue(actor, true, env);
                self.emit(env, WorldEvent::ActionCancelled { unit: actor, action });
                StepOutcome::Cancelled(action)
            }
        }
    }

    fn start_in_flight(
        &mut self,
        actor: UnitId,
        action: Action,
        env: &mut Env<'_>,
    ) -> Result<StepOutcome, ActionError> {
        match (action.kind, action.target) {
            (ActionKind::Move, ActionTarget::Cell(destination)) => {
                self.start_move(actor, destination, env)
            }
            (ActionKind::MeleeAttack, ActionTarget::Unit(target)) => {
                self.attack(actor, target, AttackKind::Melee, env)
            }
            (ActionKind::RangedAttack, ActionTarget::Unit(target)) => {
                self.attack(actor, target, AttackKind::Ranged, env)
            }
            (kind, _) => Err(ActionError::WrongTarget { kind }),
        }
    }

    fn start_move(
        &mut self,
        actor: UnitId,
        destination: Position,
        env: &mut Env<'_>,
    ) -> Result<StepOutcome, ActionError> {
        let unit = self.world.get_mut(actor).map_err(|_| ActionError::UnknownUnit(actor))?;
        let path = env
            .pathfinding
            .path(unit.position, destination)
            .ok_or(ActionError::NoPath(destination))?;
        unit.movement = Some(MovementState::new(path));
        unit.queue.mark_performing();
        env.presentation
            .on_action_state_changed(actor, ActionKind::Move, ActionState::Started);
        Ok(StepOutcome::Started(ActionKind::Move))
    }

    /// Walks one waypoint of the in-flight move, or finishes it when the
    /// path is exhausted or blocked.
    pub(super) fn advance_movement(&mut self, actor: UnitId, env: &mut Env<'_>) -> StepOutcome {
        let next = self
            .world
            .unit_mut(actor)
            .and_then(|unit| unit.movement.as_mut())
            .and_then(|movement| movement.remaining.pop_front());

        let free = next.filter(|cell| {
            env.pathfinding.is_walkable(*cell)
                && self.world.unit_at(*cell).is_none_or(|occupant| occupant.id == actor)
        });

        let Some(unit) = self.world.unit_mut(actor) else {
            return StepOutcome::Idle;
        };
        let from = unit.position;

        match free {
            Some(to) => {
                if let Some(direction) = from.direction_to(to) {
                    unit.facing = direction;
                }
                unit.position = to;
                self.emit(env, WorldEvent::UnitMoved { unit: actor, from, to });
                StepOutcome::Advanced { to }
            }
            None => {
                if next.is_some() {
                    tracing::debug!(unit = %actor, at = %from, "path blocked, stopping");
                }
                unit.movement = None;
                self.emit(env, WorldEvent::UnitStoppedMoving { unit: actor, at: from });
                self.finish_head(actor, env);
                StepOutcome::Completed(ActionKind::Move)
            }
        }
    }

    fn attack(
        &mut self,
        actor: UnitId,
        target: UnitId,
        kind: AttackKind,
        env: &mut Env<'_>,
    ) -> Result<StepOutcome, ActionError> {
        let config = env.config;
        let tables = &config.combat;

        let target_position = self
            .world
            .unit(target)
            .ok_or(ActionError::TargetNotFound(target))?
            .position;
        let unit = self.world.get_mut(actor).map_err(|_| ActionError::UnknownUnit(actor))?;
        if let Some(direction) = unit.position.direction_to(target_position) {
            unit.facing = direction;
        }

        let attacker = self.capture(actor, env).ok_or(ActionError::UnknownUnit(actor))?;
        let primary = self.capture(target, env).ok_or(ActionError::TargetNotFound(target))?;

        let context = match kind {
            AttackKind::Melee => AttackContext::melee(attacker, tables),
            AttackKind::Ranged => {
                let roll: f32 = env.rng.gen_range(0.0..1.0);
                let context = AttackContext::ranged(attacker, &primary, roll, tables);
                env.equipment.apply(
                    actor,
                    EquipmentChange::Discharge {
                        slot: context.hand.slot(),
                    },
                )?;
                context
            }
        };

        let mut defenders = vec![primary];
        if kind == AttackKind::Melee
            && context.weapon.is_some_and(|weapon| weapon.weapon_type.sweeps())
        {
            let swept = self.swept_targets(actor, target);
            defenders.extend(swept.into_iter().filter_map(|id| self.capture(id, env)));
        }

        let mut report = AttackReport::new(&context);
        for defender in &defenders {
            let rolls = DefenseRolls::draw(&mut *env.rng);
            report.push(resolve_target(&context, defender, rolls, tables));
        }
        tracing::debug!(
            unit = %actor,
            %kind,
            targets = report.targets.len(),
            damage = report.total_damage(),
            "attack resolved"
        );
        self.apply_report(&mut report, env);

        let action_kind = match kind {
            AttackKind::Melee => ActionKind::MeleeAttack,
            AttackKind::Ranged => ActionKind::RangedAttack,
        };
        if let Some(unit) = self.world.unit_mut(actor) {
            unit.queue.mark_performing();
        }
        env.presentation
            .on_action_state_changed(actor, action_kind, ActionState::Started);
        Ok(StepOutcome::Started(action_kind))
    }

    fn capture(&self, id: UnitId, env: &Env<'_>) -> Option<Combatant> {
        let unit = self.world.unit(id)?;
        Some(Combatant::capture(unit, &*env.equipment, &env.config.stances))
    }

    /// Living enemies of `actor` adjacent to both the attacker and the
    /// primary target.
    fn swept_targets(&self, actor: UnitId, primary: UnitId) -> Vec<UnitId> {
        let (Some(attacker), Some(target)) = (self.world.unit(actor), self.world.unit(primary))
        else {
            return Vec::new();
        };
        self.world
            .alive()
            .filter(|other| other.id != actor && other.id != primary)
            .filter(|other| attacker.is_hostile_to(other))
            .filter(|other| {
                attacker.position.is_adjacent(other.position)
                    && target.position.is_adjacent(other.position)
            })
            .map(|other| other.id)
            .collect()
    }

    /// Applies damage, knocks down stances that blocked, and clears the
    /// per-attack resolution map.
    fn apply_report(&mut self, report: &mut AttackReport, env: &mut Env<'_>) {
        let attacker = report.attacker;
        let config = env.config;

        for outcome in &report.targets {
            let Some(defender) = self.world.unit_mut(outcome.target) else {
                continue;
            };
            if outcome.damage > 0 {
                defender.health.current = apply_damage(defender.health.current, outcome.damage);
                self.emit(
                    env,
                    WorldEvent::TookDamage {
                        unit: outcome.target,
                        attacker,
                        kind: report.kind,
                        damage: outcome.damage,
                    },
                );
            }

            let Some(blocker) = outcome.blocker() else {
                continue;
            };
            let Some(defender) = self.world.unit_mut(outcome.target) else {
                continue;
            };
            if let Some(stance) = defender.stances.get(blocker.hand)
                && config.stances.get(stance).lowers_on_block
                && defender
                    .stances
                    .lower(&mut defender.ledger, blocker.hand)
                    .is_some()
            {
                self.emit(
                    env,
                    WorldEvent::StanceLowered {
                        unit: outcome.target,
                        hand: blocker.hand,
                        stance,
                        forced: true,
                    },
                );
            }
        }

        if let Some(at) = self.world.unit(attacker).map(|unit| unit.position) {
            self.emit(env, WorldEvent::Sound { source: attacker, at });
        }
        env.presentation.on_attack_resolved(report);

        let fallen: Vec<UnitId> = report
            .targets
            .iter()
            .map(|outcome| outcome.target)
            .filter(|id| {
                self.world
                    .unit(*id)
                    .is_some_and(|unit| unit.alive && unit.health.current == 0)
            })
            .collect();
        for id in fallen {
            self.kill(id, Some(attacker), env);
        }
        report.blocked.clear();
    }

    fn execute_instant(
        &mut self,
        actor: UnitId,
        kind: ActionKind,
        target: ActionTarget,
        env: &mut Env<'_>,
    ) -> Result<(), ActionError> {
        match (kind, target) {
            (ActionKind::Turn, target) => {
                let cell = match target {
                    ActionTarget::Unit(id) => {
                        self.world.unit(id).ok_or(ActionError::TargetNotFound(id))?.position
                    }
                    ActionTarget::Cell(cell) => cell,
                    _ => return Err(ActionError::WrongTarget { kind }),
                };
                let unit = self.world.get_mut(actor).map_err(|_| ActionError::UnknownUnit(actor))?;
                let direction = unit
                    .position
                    .direction_to(cell)
                    .ok_or(ActionError::WrongTarget { kind })?;
                unit.facing = direction;
            }
            (ActionKind::Reload, _) => {
                let loadout = Loadout::read(&*env.equipment, actor);
                let (hand, _) = loadout.ranged_weapon().ok_or(ActionError::NoRangedWeapon)?;
                self.change_equipment(actor, EquipmentChange::Reload { slot: hand.slot() }, env)?;
            }
            (ActionKind::Equip, ActionTarget::Equip { item, slot }) => {
                self.change_equipment(actor, EquipmentChange::Equip { item, slot }, env)?;
            }
            (ActionKind::Unequip, ActionTarget::Slot(slot)) => {
                if let Some(hand) = hand_for(slot) {
                    self.lower_stance(actor, hand, true, env);
                }
                self.change_equipment(actor, EquipmentChange::Unequip { slot }, env)?;
            }
            (ActionKind::Consume, ActionTarget::Item(item)) => {
                let effect = env
                    .equipment
                    .carried(actor, item)
                    .and_then(|stats| stats.consumable)
                    .ok_or(ActionError::NotConsumable(item))?;
                self.change_equipment(actor, EquipmentChange::Consume { item }, env)?;
                let unit = self.world.get_mut(actor).map_err(|_| ActionError::UnknownUnit(actor))?;
                unit.health.current = unit
                    .health
                    .current
                    .saturating_add(effect.heal)
                    .min(unit.health.maximum);
                unit.ledger.restore_energy(effect.energy);
            }
            (ActionKind::SwapWeaponSet, _) => {
                for hand in [Hand::Primary, Hand::Secondary] {
                    self.lower_stance(actor, hand, true, env);
                }
                self.change_equipment(actor, EquipmentChange::SwapWeaponSets, env)?;
            }
            (ActionKind::Stance(stance), _) => self.toggle_stance(actor, stance, env)?,
            (ActionKind::Interact, ActionTarget::Cell(cell)) => {
                self.emit(env, WorldEvent::Interacted { unit: actor, cell });
            }
            (kind, _) => return Err(ActionError::WrongTarget { kind }),
        }
        Ok(())
    }

    fn change_equipment(
        &mut self,
        actor: UnitId,
        change: EquipmentChange,
        env: &mut Env<'_>,
    ) -> Result<(), ActionError> {
        env.equipment.apply(actor, change)?;
        self.emit(env, WorldEvent::EquipmentChanged { unit: actor, change });
        Ok(())
    }

    fn toggle_stance(
        &mut self,
        actor: UnitId,
        stance: StanceKind,
        env: &mut Env<'_>,
    ) -> Result<(), ActionError> {
        let hand = match self.world.unit(actor).and_then(|unit| unit.stances.hand_of(stance)) {
            Some(hand) => hand,
            None => stance
                .hand_in(&Loadout::read(&*env.equipment, actor))
                .ok_or(ActionError::StanceUnavailable(stance))?,
        };
        let config = env.config;
        let unit = self.world.get_mut(actor).map_err(|_| ActionError::UnknownUnit(actor))?;
        let event = match unit
            .stances
            .switch(&mut unit.ledger, hand, stance, &config.stances)
        {
            StanceChange::Raised { hand, kind } => WorldEvent::StanceRaised {
                unit: actor,
                hand,
                stance: kind,
            },
            StanceChange::Lowered { hand, kind } => WorldEvent::StanceLowered {
                unit: actor,
                hand,
                stance: kind,
                forced: false,
            },
        };
        self.emit(env, event);
        Ok(())
    }

    fn lower_stance(&mut self, actor: UnitId, hand: Hand, forced: bool, env: &mut Env<'_>) {
        let Some(unit) = self.world.unit_mut(actor) else {
            return;
        };
        if let Some(StanceChange::Lowered { hand, kind }) =
            unit.stances.lower(&mut unit.ledger, hand)
        {
            self.emit(
                env,
                WorldEvent::StanceLowered {
                    unit: actor,
                    hand,
                    stance: kind,
                    forced,
                },
            );
        }
    }
}

fn hand_for(slot: EquipSlot) -> Option<Hand> {
    match slot {
        EquipSlot::MainHand => Some(Hand::Primary),
        EquipSlot::OffHand => Some(Hand::Secondary),
        EquipSlot::AlternateMainHand | EquipSlot::AlternateOffHand => None,
    }
}
