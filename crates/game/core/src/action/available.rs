use strum::IntoEnumIterator;

use crate::env::{Env, ObstacleMask};
use crate::stance::StanceKind;
use crate::state::{UnitId, World};

use super::ActionKind;
use super::validation::{acting_unit, equipment_allows};

const FIXED_KINDS: [ActionKind; 10] = [
    ActionKind::Move,
    ActionKind::Turn,
    ActionKind::MeleeAttack,
    ActionKind::RangedAttack,
    ActionKind::Reload,
    ActionKind::Equip,
    ActionKind::Unequip,
    ActionKind::Consume,
    ActionKind::SwapWeaponSet,
    ActionKind::Interact,
];

/// Action kinds the unit could queue right now, ignoring targets.
///
/// Empty for dead units and units that cannot act; the turn driver skips
/// those.
pub fn available_actions(world: &World, actor: UnitId, env: &Env<'_>) -> Vec<ActionKind> {
    let Ok(unit) = acting_unit(world, actor) else {
        return Vec::new();
    };

    FIXED_KINDS
        .into_iter()
        .chain(StanceKind::iter().map(ActionKind::Stance))
        .filter(|kind| match kind {
            ActionKind::Move => !env
                .pathfinding
                .reachable_cells(unit.position, 1, 1, ObstacleMask::all())
                .is_empty(),
            _ => equipment_allows(unit, *kind, env),
        })
        .collect()
}
