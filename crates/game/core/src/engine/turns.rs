use crate::env::Env;
use crate::error::{ErrorSeverity, GameError};
use crate::event::WorldEvent;
use crate::state::UnitId;

use super::GameEngine;

/// Errors that can occur during turn operations
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("no unit is able to take a turn")]
    NoEligibleUnits,

    #[error("turn of {0} is still in progress")]
    TurnInProgress(UnitId),

    #[error("it is not the turn of {unit} (current: {current:?})")]
    NotUnitsTurn {
        unit: UnitId,
        current: Option<UnitId>,
    },
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoEligibleUnits => ErrorSeverity::Recoverable,
            Self::TurnInProgress(_) | Self::NotUnitsTurn { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoEligibleUnits => "TURN_NO_ELIGIBLE_UNITS",
            Self::TurnInProgress(_) => "TURN_IN_PROGRESS",
            Self::NotUnitsTurn { .. } => "TURN_NOT_UNITS_TURN",
        }
    }
}

/// Round-robin turn scheduling methods for GameEngine.
impl<'a> GameEngine<'a> {
    pub fn current_unit(&self) -> Option<UnitId> {
        self.world.turn.current
    }

    pub fn turn_number(&self) -> u64 {
        self.world.turn.turn
    }

    /// Starts the turn of the next eligible unit in registration order,
    /// after the unit that went last.
    ///
    /// AP is topped up before the eligibility check: the human-controlled
    /// unit refills to its maximum, autonomous units draw from their banked
    /// pool (or refill outright when no living human is banking for them).
    /// Units that are dead, disabled, out of AP or without any available
    /// action are skipped.
    pub fn begin_next_turn(&mut self, env: &mut Env<'_>) -> Result<UnitId, TurnError> {
        if let Some(current) = self.world.turn.current {
            return Err(TurnError::TurnInProgress(current));
        }
        let count = self.world.len();
        if count == 0 {
            return Err(TurnError::NoEligibleUnits);
        }

        let start = self
            .world
            .turn
            .last
            .map_or(0, |last| (last.0 as usize + 1) % count);
        let banking = self.world.human().is_some_and(|human| human.alive);

        for offset in 0..count {
            let id = UnitId(((start + offset) % count) as u32);
            if !self.refill_for_turn(id, banking) {
                continue;
            }
            if self.available_actions(id, env).is_empty() {
                tracing::debug!(unit = %id, "skipping turn, no available actions");
                continue;
            }
            self.start_turn(id, env);
            return Ok(id);
        }

        tracing::debug!("no unit can take a turn");
        Err(TurnError::NoEligibleUnits)
    }

    /// Tops up AP for the coming turn and reports whether the unit can act.
    fn refill_for_turn(&mut self, id: UnitId, banking: bool) -> bool {
        let Some(unit) = self.world.unit_mut(id) else {
            return false;
        };
        if !unit.alive || !unit.can_perform_actions {
            return false;
        }
        if unit.is_human() || !banking {
            unit.ledger.refill();
        } else {
            let drawn = unit.ledger.draw_from_pool();
            tracing::trace!(unit = %id, drawn, "drew banked AP");
        }
        if unit.ledger.ap() == 0 {
            tracing::debug!(unit = %id, "skipping turn, no AP");
            return false;
        }
        true
    }

    fn start_turn(&mut self, id: UnitId, env: &mut Env<'_>) {
        let turn = &mut self.world.turn;
        turn.turn += 1;
        turn.current = Some(id);
        turn.last = Some(id);
        turn.decisions = 0;
        let number = turn.turn;

        self.refresh_vision(env);
        tracing::info!(unit = %id, turn = number, "turn started");
        self.emit(env, WorldEvent::TurnStarted { unit: id, turn: number });
    }

    /// Ends the turn of `unit`. Anything still queued waits for its next turn.
    pub fn end_turn(&mut self, unit: UnitId, env: &mut Env<'_>) -> Result<(), TurnError> {
        let current = self.world.turn.current;
        if current != Some(unit) {
            return Err(TurnError::NotUnitsTurn { unit, current });
        }
        self.world.turn.current = None;
        tracing::debug!(%unit, "turn ended");
        self.emit(env, WorldEvent::TurnEnded { unit });
        Ok(())
    }

    /// The active unit is done once it died, or has nothing queued and no AP
    /// left to queue more.
    pub fn should_end_turn(&self, unit: UnitId) -> bool {
        self.world.unit(unit).is_none_or(|unit| {
            !unit.alive || (unit.queue.is_empty() && unit.ledger.ap() == 0)
        })
    }

    /// Counts one planner decision for the active unit. Returns false, without
    /// counting, once the unit has used up its decisions for this turn.
    pub fn record_decision(&mut self, env: &Env<'_>) -> bool {
        let turn = &mut self.world.turn;
        if turn.decisions >= env.config.max_decisions_per_turn {
            return false;
        }
        turn.decisions += 1;
        true
    }
}
