//! Preconditions of every action kind.
//!
//! Validation is run twice: when an action is enqueued (against the position
//! and ranged-weapon state the unit will have once earlier queued actions
//! have run) and again when it reaches the head of the queue (against the
//! unit's actual state). A failure
//! at enqueue refuses the action; a failure at the head cancels the queue.

use strum::IntoEnumIterator;

use crate::env::{Env, Loadout};
use crate::state::{Direction, Position, Unit, UnitId, World};

use super::{Action, ActionError, ActionKind, ActionTarget};

/// Checks `action` against the unit's current state, as if taken from
/// `origin`.
pub fn validate(
    world: &World,
    actor: UnitId,
    action: &Action,
    origin: Position,
    env: &Env<'_>,
) -> Result<(), ActionError> {
    check(world, actor, action, origin, None, env)
}

/// Checks `action` as it would run after everything already queued.
pub fn validate_queued(
    world: &World,
    actor: UnitId,
    action: &Action,
    env: &Env<'_>,
) -> Result<(), ActionError> {
    let unit = acting_unit(world, actor)?;
    let origin = unit.queue.projected_position(unit.position);
    let loaded = Loadout::read(&*env.equipment, actor)
        .ranged_weapon()
        .map(|(_, weapon)| unit.queue.projected_loaded(weapon.is_loaded));
    check(world, actor, action, origin, loaded, env)
}

fn check(
    world: &World,
    actor: UnitId,
    action: &Action,
    origin: Position,
    loaded: Option<bool>,
    env: &Env<'_>,
) -> Result<(), ActionError> {
    let unit = acting_unit(world, actor)?;
    let loadout = Loadout::read(&*env.equipment, actor);

    match (action.kind, action.target) {
        (ActionKind::Move, ActionTarget::Cell(destination)) => {
            validate_move(world, unit, origin, destination, env)
        }
        (ActionKind::Turn, target) => {
            let facing_cell = match target {
                ActionTarget::Cell(cell) => cell,
                ActionTarget::Unit(id) => {
                    world
                        .unit(id)
                        .ok_or(ActionError::TargetNotFound(id))?
                        .position
                }
                _ => return Err(ActionError::WrongTarget { kind: action.kind }),
            };
            origin
                .direction_to(facing_cell)
                .map(|_| ())
                .ok_or(ActionError::WrongTarget { kind: action.kind })
        }
        (ActionKind::MeleeAttack, ActionTarget::Unit(target)) => {
            let defender = hostile_target(world, unit, target)?;
            let reach = melee_reach(&loadout);
            check_range(origin.chebyshev(defender.position), 1, reach)
        }
        (ActionKind::RangedAttack, ActionTarget::Unit(target)) => {
            let (_, weapon) = loadout.ranged_weapon().ok_or(ActionError::NoRangedWeapon)?;
            if !loaded.unwrap_or(weapon.is_loaded) {
                return Err(ActionError::NotLoaded);
            }
            let defender = hostile_target(world, unit, target)?;
            check_range(
                origin.chebyshev(defender.position),
                weapon.min_range.max(1),
                weapon.max_range,
            )
        }
        (ActionKind::Reload, ActionTarget::None | ActionTarget::Slot(_)) => {
            let (_, weapon) = loadout.ranged_weapon().ok_or(ActionError::NoRangedWeapon)?;
            if loaded.unwrap_or(weapon.is_loaded) {
                return Err(ActionError::AlreadyLoaded);
            }
            Ok(())
        }
        (ActionKind::Equip, ActionTarget::Equip { item, slot }) => {
            env.equipment
                .carried(actor, item)
                .ok_or(ActionError::ItemNotCarried(item))?;
            if env.equipment.equipped(actor, slot).is_some() {
                return Err(ActionError::SlotOccupied(slot));
            }
            Ok(())
        }
        (ActionKind::Unequip, ActionTarget::Slot(slot)) => env
            .equipment
            .equipped(actor, slot)
            .map(|_| ())
            .ok_or(ActionError::EmptySlot(slot)),
        (ActionKind::Consume, ActionTarget::Item(item)) => {
            let stats = env
                .equipment
                .carried(actor, item)
                .ok_or(ActionError::ItemNotCarried(item))?;
            stats
                .consumable
                .map(|_| ())
                .ok_or(ActionError::NotConsumable(item))
        }
        (ActionKind::SwapWeaponSet, _) => {
            if loadout.has_alternate_set() {
                Ok(())
            } else {
                Err(ActionError::NoAlternateSet)
            }
        }
        (ActionKind::Stance(kind), _) => {
            if unit.stances.is_active(kind) {
                return Ok(());
            }
            kind.hand_in(&loadout)
                .ok_or(ActionError::StanceUnavailable(kind))?;
            let needed = env.config.stances.get(kind).energy_per_tick;
            let available = unit.ledger.energy();
            if needed > available {
                return Err(ActionError::InsufficientEnergy { needed, available });
            }
            Ok(())
        }
        (ActionKind::Interact, ActionTarget::Cell(cell)) => {
            if !env.pathfinding.is_interactable(cell) {
                return Err(ActionError::NothingToInteract(cell));
            }
            check_range(origin.chebyshev(cell), 0, 1)
        }
        (kind, _) => Err(ActionError::WrongTarget { kind }),
    }
}

/// The acting unit, if it exists, lives and may act.
pub fn acting_unit(world: &World, actor: UnitId) -> Result<&Unit, ActionError> {
    let unit = world.unit(actor).ok_or(ActionError::UnknownUnit(actor))?;
    if !unit.alive {
        return Err(ActionError::UnitDead(actor));
    }
    if !unit.can_perform_actions {
        return Err(ActionError::CannotAct(actor));
    }
    Ok(unit)
}

/// Longest melee reach among held weapons; fists reach one cell.
pub fn melee_reach(loadout: &Loadout) -> u32 {
    loadout
        .melee_weapons()
        .map(|(_, item)| item.max_range.max(1))
        .max()
        .unwrap_or(1)
}

fn hostile_target<'w>(
    world: &'w World,
    unit: &Unit,
    target: UnitId,
) -> Result<&'w Unit, ActionError> {
    let defender = world.unit(target).ok_or(ActionError::TargetNotFound(target))?;
    if !defender.alive {
        return Err(ActionError::TargetDead(target));
    }
    if defender.id == unit.id || !unit.is_hostile_to(defender) {
        return Err(ActionError::TargetNotHostile(target));
    }
    Ok(defender)
}

fn validate_move(
    world: &World,
    unit: &Unit,
    origin: Position,
    destination: Position,
    env: &Env<'_>,
) -> Result<(), ActionError> {
    if let Some(occupant) = world.unit_at(destination)
        && occupant.id != unit.id
    {
        return Err(ActionError::Occupied(destination));
    }
    match env.pathfinding.path(origin, destination) {
        Some(path) if !path.is_empty() => Ok(()),
        _ => Err(ActionError::NoPath(destination)),
    }
}

fn check_range(distance: u32, min: u32, max: u32) -> Result<(), ActionError> {
    if distance < min || distance > max {
        return Err(ActionError::OutOfRange { distance, min, max });
    }
    Ok(())
}

/// Whether any equipped or carried item lets the unit take `action` at all,
/// ignoring targets. Used to list available actions.
pub fn equipment_allows(unit: &Unit, kind: ActionKind, env: &Env<'_>) -> bool {
    let equipment = &*env.equipment;
    let loadout = Loadout::read(equipment, unit.id);
    match kind {
        ActionKind::Move | ActionKind::Turn | ActionKind::MeleeAttack => true,
        ActionKind::RangedAttack => loadout
            .ranged_weapon()
            .is_some_and(|(_, weapon)| weapon.is_loaded),
        ActionKind::Reload => loadout
            .ranged_weapon()
            .is_some_and(|(_, weapon)| !weapon.is_loaded),
        ActionKind::Equip => equipment.carried_items(unit.id).into_iter().any(|item| {
            equipment
                .carried(unit.id, item)
                .is_some_and(|stats| stats.is_weapon() || stats.is_shield())
        }),
        ActionKind::Unequip => loadout.primary.is_some() || loadout.secondary.is_some(),
        ActionKind::Consume => equipment.carried_items(unit.id).into_iter().any(|item| {
            equipment
                .carried(unit.id, item)
                .is_some_and(|stats| stats.consumable.is_some())
        }),
        ActionKind::SwapWeaponSet => loadout.has_alternate_set(),
        ActionKind::Stance(stance) => {
            unit.stances.is_active(stance)
                || (stance.hand_in(&loadout).is_some()
                    && env.config.stances.get(stance).energy_per_tick <= unit.ledger.energy())
        }
        ActionKind::Interact => Direction::iter()
            .any(|direction| env.pathfinding.is_interactable(unit.position.step(direction))),
    }
}
