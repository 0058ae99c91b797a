//! AP prices, computed at enqueue time from the current state.

use crate::config::{ActionCosts, GameConfig};
use crate::env::{Env, Loadout};
use crate::state::{MovementMode, Position, Unit, UnitId, World};

use super::{Action, ActionError, ActionKind, ActionTarget};

/// Result of pricing an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CostQuote {
    Cost(u32),
    /// Pricing replaced the action (a move that runs into a closed door
    /// becomes a walk up to the door and an interaction with it). The
    /// original action must not be queued.
    Rerouted(Vec<Action>),
}

pub fn quote(
    world: &World,
    actor: UnitId,
    action: &Action,
    origin: Position,
    env: &Env<'_>,
) -> Result<CostQuote, ActionError> {
    let unit = world.unit(actor).ok_or(ActionError::UnknownUnit(actor))?;
    let costs = &env.config.costs;
    let equipment = &*env.equipment;
    let loadout = Loadout::read(equipment, actor);

    let cost = match (action.kind, action.target) {
        (ActionKind::Move, ActionTarget::Cell(destination)) => {
            let path = env
                .pathfinding
                .path(origin, destination)
                .ok_or(ActionError::NoPath(destination))?;
            if let Some(blocked) = path.iter().position(|cell| !env.pathfinding.is_walkable(*cell)) {
                return Ok(CostQuote::Rerouted(reroute(origin, &path, blocked)));
            }
            move_cost(path.len() as u32, unit, env.config)
        }
        (ActionKind::Move, _) => return Err(ActionError::WrongTarget { kind: action.kind }),
        (ActionKind::Turn, _) => costs.turn,
        (ActionKind::MeleeAttack, _) => {
            let weight = loadout
                .melee_weapons()
                .next()
                .map_or(0.0, |(_, item)| item.weight);
            weighted(costs.melee_base, weight, costs)
        }
        (ActionKind::RangedAttack, _) => {
            let weight = loadout.ranged_weapon().map_or(0.0, |(_, item)| item.weight);
            weighted(costs.ranged_base, weight, costs)
        }
        (ActionKind::Reload, _) => costs.reload,
        (ActionKind::Equip, ActionTarget::Equip { item, .. }) => {
            let weight = equipment.carried(actor, item).map_or(0.0, |stats| stats.weight);
            weighted(costs.equip_base, weight, costs)
        }
        (ActionKind::Unequip, ActionTarget::Slot(slot)) => {
            let weight = equipment.equipped(actor, slot).map_or(0.0, |stats| stats.weight);
            weighted(costs.unequip_base, weight, costs)
        }
        (ActionKind::Equip | ActionKind::Unequip, _) => {
            return Err(ActionError::WrongTarget { kind: action.kind });
        }
        (ActionKind::Consume, _) => costs.consume,
        (ActionKind::SwapWeaponSet, _) => costs.swap_weapon_set,
        (ActionKind::Stance(kind), _) => {
            // Lowering a stance is free.
            if unit.stances.is_active(kind) {
                0
            } else {
                env.config.stances.get(kind).activation_ap
            }
        }
        (ActionKind::Interact, _) => costs.interact,
    };
    Ok(CostQuote::Cost(cost))
}

/// AP to walk `cells` cells in the unit's current mode and stance.
pub fn move_cost(cells: u32, unit: &Unit, config: &GameConfig) -> u32 {
    let costs = &config.costs;
    let mode = match unit.movement_mode {
        MovementMode::Walk => 1.0,
        MovementMode::Run => costs.run_multiplier,
        MovementMode::Sneak => costs.sneak_multiplier,
    };
    let stance = unit.stances.modifiers(&config.stances).move_cost;
    (cells as f32 * costs.move_per_cell as f32 * mode * stance)
        .round()
        .max(0.0) as u32
}

fn weighted(base: u32, weight: f32, costs: &ActionCosts) -> u32 {
    base + (weight * costs.per_weight).round().max(0.0) as u32
}

/// Walk to the cell before the blocking one (if that is not where we already
/// stand), then interact with the blocker.
fn reroute(origin: Position, path: &[Position], blocked: usize) -> Vec<Action> {
    let blocker = path[blocked];
    let approach = if blocked == 0 { origin } else { path[blocked - 1] };
    let mut actions = Vec::with_capacity(2);
    if approach != origin {
        actions.push(Action::move_to(approach));
    }
    actions.push(Action::new(ActionKind::Interact, ActionTarget::Cell(blocker)));
    actions
}
