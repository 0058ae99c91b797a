//! Action errors.
//!
//! Raised when an action is refused at enqueue time or found stale when it
//! reaches the head of the queue. None of them is fatal: the engine logs,
//! refuses or cancels, and the turn carries on.

use crate::env::{EquipSlot, ItemId, OracleError};
use crate::error::{ErrorSeverity, GameError};
use crate::stance::StanceKind;
use crate::state::{Position, UnitId};

use super::ActionKind;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("unit {0} is not registered")]
    UnknownUnit(UnitId),

    #[error("unit {0} is dead")]
    UnitDead(UnitId),

    #[error("unit {0} cannot perform actions")]
    CannotAct(UnitId),

    #[error("{0} is already queued and cannot be queued twice")]
    AlreadyQueued(ActionKind),

    #[error("{kind} does not accept this target")]
    WrongTarget { kind: ActionKind },

    #[error("target {0} no longer exists")]
    TargetNotFound(UnitId),

    #[error("target {0} is dead")]
    TargetDead(UnitId),

    #[error("target {0} is not hostile")]
    TargetNotHostile(UnitId),

    #[error("target at distance {distance} is outside range {min}..={max}")]
    OutOfRange { distance: u32, min: u32, max: u32 },

    #[error("no path to {0}")]
    NoPath(Position),

    #[error("cell {0} is occupied")]
    Occupied(Position),

    #[error("nothing to interact with at {0}")]
    NothingToInteract(Position),

    #[error("no ranged weapon equipped")]
    NoRangedWeapon,

    #[error("ranged weapon is not loaded")]
    NotLoaded,

    #[error("ranged weapon is already loaded")]
    AlreadyLoaded,

    #[error("slot {0} is empty")]
    EmptySlot(EquipSlot),

    #[error("slot {0} is occupied")]
    SlotOccupied(EquipSlot),

    #[error("{0} is not carried")]
    ItemNotCarried(ItemId),

    #[error("{0} cannot be consumed")]
    NotConsumable(ItemId),

    #[error("no alternate weapon set")]
    NoAlternateSet,

    #[error("no equipped item can take stance {0}")]
    StanceUnavailable(StanceKind),

    #[error("not enough energy (needed {needed}, available {available})")]
    InsufficientEnergy { needed: u32, available: u32 },

    #[error("nothing in flight to complete")]
    NothingInFlight,

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl ActionError {
    /// Errors that mean the target changed between queuing and execution.
    pub fn is_stale_target(&self) -> bool {
        matches!(
            self,
            ActionError::TargetNotFound(_)
                | ActionError::TargetDead(_)
                | ActionError::OutOfRange { .. }
                | ActionError::NoPath(_)
                | ActionError::Occupied(_)
        )
    }
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        if self.is_stale_target() || matches!(self, ActionError::InsufficientEnergy { .. }) {
            return ErrorSeverity::Recoverable;
        }
        match self {
            ActionError::NothingInFlight => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ActionError::UnknownUnit(_) => "ACTION_UNKNOWN_UNIT",
            ActionError::UnitDead(_) => "ACTION_UNIT_DEAD",
            ActionError::CannotAct(_) => "ACTION_CANNOT_ACT",
            ActionError::AlreadyQueued(_) => "ACTION_ALREADY_QUEUED",
            ActionError::WrongTarget { .. } => "ACTION_WRONG_TARGET",
            ActionError::TargetNotFound(_) => "ACTION_TARGET_NOT_FOUND",
            ActionError::TargetDead(_) => "ACTION_TARGET_DEAD",
            ActionError::TargetNotHostile(_) => "ACTION_TARGET_NOT_HOSTILE",
            ActionError::OutOfRange { .. } => "ACTION_OUT_OF_RANGE",
            ActionError::NoPath(_) => "ACTION_NO_PATH",
            ActionError::Occupied(_) => "ACTION_OCCUPIED",
            ActionError::NothingToInteract(_) => "ACTION_NOTHING_TO_INTERACT",
            ActionError::NoRangedWeapon => "ACTION_NO_RANGED_WEAPON",
            ActionError::NotLoaded => "ACTION_NOT_LOADED",
            ActionError::AlreadyLoaded => "ACTION_ALREADY_LOADED",
            ActionError::EmptySlot(_) => "ACTION_EMPTY_SLOT",
            ActionError::SlotOccupied(_) => "ACTION_SLOT_OCCUPIED",
            ActionError::ItemNotCarried(_) => "ACTION_ITEM_NOT_CARRIED",
            ActionError::NotConsumable(_) => "ACTION_NOT_CONSUMABLE",
            ActionError::NoAlternateSet => "ACTION_NO_ALTERNATE_SET",
            ActionError::StanceUnavailable(_) => "ACTION_STANCE_UNAVAILABLE",
            ActionError::InsufficientEnergy { .. } => "ACTION_INSUFFICIENT_ENERGY",
            ActionError::NothingInFlight => "ACTION_NOTHING_IN_FLIGHT",
            ActionError::Oracle(inner) => inner.error_code(),
        }
    }
}
