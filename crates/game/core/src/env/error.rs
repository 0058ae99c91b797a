use crate::error::{ErrorSeverity, GameError};
use crate::state::UnitId;

use super::{EquipSlot, ItemId};

/// Errors surfaced by collaborator implementations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("unit {0} has no equipment record")]
    UnknownUnit(UnitId),

    #[error("unit {unit} does not carry {item}")]
    ItemNotCarried { unit: UnitId, item: ItemId },

    #[error("slot {slot} of unit {unit} is empty")]
    EmptySlot { unit: UnitId, slot: EquipSlot },

    #[error("slot {slot} of unit {unit} is occupied")]
    SlotOccupied { unit: UnitId, slot: EquipSlot },

    #[error("{item} cannot be consumed")]
    NotConsumable { item: ItemId },
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownUnit(_) => "ORACLE_UNKNOWN_UNIT",
            Self::ItemNotCarried { .. } => "ORACLE_ITEM_NOT_CARRIED",
            Self::EmptySlot { .. } => "ORACLE_EMPTY_SLOT",
            Self::SlotOccupied { .. } => "ORACLE_SLOT_OCCUPIED",
            Self::NotConsumable { .. } => "ORACLE_NOT_CONSUMABLE",
        }
    }
}
