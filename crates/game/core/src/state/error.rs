//! Registry errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Position, UnitId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorldError {
    #[error("unit {0} is not registered")]
    UnknownUnit(UnitId),

    /// Position is already occupied by another living unit.
    #[error("position {position} is already occupied by unit {occupant}")]
    PositionOccupied {
        position: Position,
        occupant: UnitId,
    },

    #[error("only one human-controlled unit may be registered (existing: {existing})")]
    SecondHuman { existing: UnitId },

    #[error("unit id overflow")]
    UnitIdOverflow,
}

impl GameError for WorldError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            WorldError::UnknownUnit(_)
            | WorldError::PositionOccupied { .. }
            | WorldError::SecondHuman { .. } => ErrorSeverity::Validation,
            WorldError::UnitIdOverflow => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            WorldError::UnknownUnit(_) => "WORLD_UNKNOWN_UNIT",
            WorldError::PositionOccupied { .. } => "WORLD_POSITION_OCCUPIED",
            WorldError::SecondHuman { .. } => "WORLD_SECOND_HUMAN",
            WorldError::UnitIdOverflow => "WORLD_UNIT_ID_OVERFLOW",
        }
    }
}
