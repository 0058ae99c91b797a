use std::fmt;

use crate::env::{EquipSlot, ItemId};
use crate::state::{Position, UnitId};

use super::ActionKind;

/// What an action is aimed at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionTarget {
    #[default]
    None,
    Unit(UnitId),
    Cell(Position),
    Item(ItemId),
    Slot(EquipSlot),
    /// Carried item moved into a slot.
    Equip { item: ItemId, slot: EquipSlot },
}

impl ActionTarget {
    pub fn unit(self) -> Option<UnitId> {
        match self {
            ActionTarget::Unit(id) => Some(id),
            _ => None,
        }
    }

    pub fn cell(self) -> Option<Position> {
        match self {
            ActionTarget::Cell(cell) => Some(cell),
            _ => None,
        }
    }
}

impl fmt::Display for ActionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionTarget::None => f.write_str("-"),
            ActionTarget::Unit(id) => write!(f, "unit {id}"),
            ActionTarget::Cell(cell) => write!(f, "cell {cell}"),
            ActionTarget::Item(item) => write!(f, "{item}"),
            ActionTarget::Slot(slot) => write!(f, "slot {slot}"),
            ActionTarget::Equip { item, slot } => write!(f, "{item} -> {slot}"),
        }
    }
}

/// An action kind bound to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    pub kind: ActionKind,
    pub target: ActionTarget,
}

impl Action {
    pub const fn new(kind: ActionKind, target: ActionTarget) -> Self {
        Self { kind, target }
    }

    pub const fn move_to(cell: Position) -> Self {
        Self::new(ActionKind::Move, ActionTarget::Cell(cell))
    }

    pub const fn melee(target: UnitId) -> Self {
        Self::new(ActionKind::MeleeAttack, ActionTarget::Unit(target))
    }

    pub const fn ranged(target: UnitId) -> Self {
        Self::new(ActionKind::RangedAttack, ActionTarget::Unit(target))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.target)
    }
}
