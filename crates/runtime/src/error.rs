//! Errors surfaced by the simulation API.
//!
//! Engine errors pass through unchanged so callers can still classify them
//! with [`GameError`].

use skirmish_core::{ActionError, ErrorSeverity, GameError, OracleError, TurnError, WorldError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("roster unit {index} follows unit {leader}, which is not in the roster")]
    UnknownLeader { index: usize, leader: usize },

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Equipment(#[from] OracleError),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownLeader { .. } => ErrorSeverity::Validation,
            Self::World(error) => error.severity(),
            Self::Action(error) => error.severity(),
            Self::Turn(error) => error.severity(),
            Self::Equipment(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownLeader { .. } => "RUNTIME_UNKNOWN_LEADER",
            Self::World(error) => error.error_code(),
            Self::Action(error) => error.error_code(),
            Self::Turn(error) => error.error_code(),
            Self::Equipment(error) => error.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::UnitId;

    use super::*;

    #[test]
    fn engine_errors_keep_their_classification() {
        let error = RuntimeError::from(ActionError::UnknownUnit(UnitId(4)));
        assert_eq!(error.error_code(), "ACTION_UNKNOWN_UNIT");
        assert_eq!(error.severity(), ErrorSeverity::Validation);

        let error = RuntimeError::from(TurnError::NoEligibleUnits);
        assert!(error.severity().is_recoverable());
        assert_eq!(error.to_string(), "no unit is able to take a turn");
    }
}
