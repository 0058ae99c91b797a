//! Action queue processing and turn scheduling.
//!
//! [`GameEngine`] is the only place that mutates the [`World`]. It wraps a
//! mutable borrow of the world for the duration of one call sequence and
//! receives collaborators through [`Env`]. Every method recovers locally
//! from stale targets and resource underflow; the worst outcome for a
//! caller is a cancelled queue or a skipped turn.
//!
//! Suspension points are explicit state: an in-flight action marks its queue
//! as performing and later calls to [`GameEngine::step`] poll it (movement
//! advances one waypoint per step) until it completes or
//! [`GameEngine::resolution_complete`] is signalled for attacks.

mod execute;
mod resources;
mod turns;

pub use turns::TurnError;

use crate::action::{
    Action, ActionError, ActionKind, CostQuote, acting_unit, available_actions, quote, validate,
    validate_queued,
};
use crate::env::{ActionState, Env};
use crate::event::WorldEvent;
use crate::state::{MovementMode, Position, UnitId, World};

/// Result of [`GameEngine::enqueue`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Enqueued {
    Queued { cost: u32 },
    /// Pricing replaced the action; nothing was queued. The replacement
    /// actions may be enqueued in order instead.
    Rerouted(Vec<Action>),
}

/// Result of one [`GameEngine::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing queued.
    Idle,
    /// The head is in flight and waits for its completion signal.
    Waiting(ActionKind),
    /// An in-flight move advanced one waypoint.
    Advanced { to: Position },
    /// The head was paid for and is now in flight.
    Started(ActionKind),
    /// The head finished and was popped.
    Completed(ActionKind),
    /// The head could only be paid partially. It stays queued with the
    /// remaining cost and the unit's turn is over.
    Deferred {
        kind: ActionKind,
        paid: u32,
        remaining: u32,
    },
    /// The head's target went stale; the queue was cleared.
    Cancelled(Action),
}

impl StepOutcome {
    pub fn ends_turn(&self) -> bool {
        matches!(self, StepOutcome::Deferred { .. })
    }
}

/// Result of [`GameEngine::cancel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    /// Idle queue; this many clearable entries were removed.
    Cleared(usize),
    /// The head is in flight; the queue is cleared once it completes.
    AfterCompletion,
}

pub struct GameEngine<'a> {
    world: &'a mut World,
}

impl<'a> GameEngine<'a> {
    pub fn new(world: &'a mut World) -> Self {
        Self { world }
    }

    pub fn world(&self) -> &World {
        self.world
    }

    /// Validates and prices `action`, then appends it to the unit's queue.
    ///
    /// Refused actions leave the queue untouched. A move that runs into a
    /// closed door is not queued; the reroute is returned instead.
    pub fn enqueue(
        &mut self,
        actor: UnitId,
        action: Action,
        env: &mut Env<'_>,
    ) -> Result<Enqueued, ActionError> {
        let result = self.try_enqueue(actor, action, env);
        if let Err(error) = &result {
            tracing::warn!(unit = %actor, %action, %error, "action refused");
        }
        result
    }

    fn try_enqueue(
        &mut self,
        actor: UnitId,
        action: Action,
        env: &mut Env<'_>,
    ) -> Result<Enqueued, ActionError> {
        validate_queued(self.world, actor, &action, env)?;
        let unit = acting_unit(self.world, actor)?;
        let origin = unit.queue.projected_position(unit.position);
        if !action.kind.can_queue_multiple() && unit.queue.contains_variant(action.kind) {
            return Err(ActionError::AlreadyQueued(action.kind));
        }

        let cost = match quote(self.world, actor, &action, origin, env)? {
            CostQuote::Cost(cost) => cost,
            CostQuote::Rerouted(replacement) => {
                tracing::debug!(unit = %actor, %action, "action rerouted");
                return Ok(Enqueued::Rerouted(replacement));
            }
        };

        let unit = self.world.get_mut(actor).map_err(|_| ActionError::UnknownUnit(actor))?;
        unit.queue.push(action, cost);
        if unit
            .queue
            .last_queued()
            .is_some_and(|last| last.kind.resets_selection())
        {
            unit.selected_action = ActionKind::Move;
        }
        tracing::debug!(unit = %actor, %action, cost, "action queued");
        env.presentation
            .on_action_state_changed(actor, action.kind, ActionState::Queued);
        Ok(Enqueued::Queued { cost })
    }

    /// Advances the unit's queue by one step.
    pub fn step(&mut self, actor: UnitId, env: &mut Env<'_>) -> Result<StepOutcome, ActionError> {
        let unit = acting_unit(self.world, actor)?;
        if unit.queue.is_performing() {
            return Ok(self.poll_in_flight(actor, env));
        }
        let Some(entry) = unit.queue.head().copied() else {
            return Ok(StepOutcome::Idle);
        };
        let position = unit.position;
        let available = unit.ledger.ap();

        if let Err(error) = validate(self.world, actor, &entry.action, position, env) {
            tracing::warn!(unit = %actor, action = %entry.action, %error, "stale action cancelled");
            self.clear_queue(actor, true, env);
            self.emit(
                env,
                WorldEvent::ActionCancelled {
                    unit: actor,
                    action: entry.action,
                },
            );
            return Ok(StepOutcome::Cancelled(entry.action));
        }

        let paid = entry.cost.min(available);
        self.use_ap(actor, paid, env);

        if paid < entry.cost {
            let remaining = self
                .world
                .unit_mut(actor)
                .and_then(|unit| unit.queue.reduce_head_cost(paid))
                .unwrap_or(0);
            tracing::debug!(unit = %actor, action = %entry.action, paid, remaining, "action deferred");
            env.presentation
                .on_action_state_changed(actor, entry.action.kind, ActionState::Deferred);
            return Ok(StepOutcome::Deferred {
                kind: entry.action.kind,
                paid,
                remaining,
            });
        }

        Ok(self.execute(actor, entry.action, env))
    }

    fn poll_in_flight(&mut self, actor: UnitId, env: &mut Env<'_>) -> StepOutcome {
        let Some(unit) = self.world.unit(actor) else {
            return StepOutcome::Idle;
        };
        let Some(entry) = unit.queue.head().copied() else {
            if let Some(unit) = self.world.unit_mut(actor) {
                unit.queue.clear();
            }
            return StepOutcome::Idle;
        };
        if entry.action.kind == ActionKind::Move {
            return self.advance_movement(actor, env);
        }
        tracing::trace!(unit = %actor, action = %entry.action, "waiting for resolution");
        StepOutcome::Waiting(entry.action.kind)
    }

    /// Signals that presentation finished playing the in-flight action.
    pub fn resolution_complete(
        &mut self,
        actor: UnitId,
        env: &mut Env<'_>,
    ) -> Result<ActionKind, ActionError> {
        let unit = self.world.get_mut(actor).map_err(|_| ActionError::UnknownUnit(actor))?;
        if !unit.queue.is_performing() {
            return Err(ActionError::NothingInFlight);
        }
        let kind = unit
            .queue
            .head()
            .map(|entry| entry.action.kind)
            .ok_or(ActionError::NothingInFlight)?;
        if kind == ActionKind::Move
            && let Some(at) = unit.movement.take().map(|_| unit.position)
        {
            self.emit(env, WorldEvent::UnitStoppedMoving { unit: actor, at });
        }
        self.finish_head(actor, env);
        Ok(kind)
    }

    /// Pops the in-flight head and honours a cancel that arrived meanwhile.
    fn finish_head(&mut self, actor: UnitId, env: &mut Env<'_>) -> Option<ActionKind> {
        let unit = self.world.unit_mut(actor)?;
        let entry = unit.queue.complete_head()?;
        let cancel = unit.queue.take_cancel_request();
        env.presentation
            .on_action_state_changed(actor, entry.action.kind, ActionState::Completed);
        if cancel {
            self.remove_clearable(actor, env);
        }
        Some(entry.action.kind)
    }

    /// Cancels the unit's queue.
    ///
    /// An idle queue loses its clearable entries at once. If the head is in
    /// flight the queue is cleared when it completes; an interruptable head
    /// (movement) is first cut short to its next waypoint.
    pub fn cancel(&mut self, actor: UnitId, env: &mut Env<'_>) -> Result<CancelOutcome, ActionError> {
        let unit = self.world.get_mut(actor).map_err(|_| ActionError::UnknownUnit(actor))?;
        if !unit.queue.is_performing() {
            return Ok(CancelOutcome::Cleared(self.remove_clearable(actor, env)));
        }

        let interruptable = unit
            .queue
            .head()
            .is_some_and(|entry| entry.action.kind.is_interruptable());
        if interruptable && let Some(movement) = unit.movement.as_mut() {
            movement.truncate_to_next_waypoint();
        }
        unit.queue.request_cancel();
        tracing::debug!(unit = %actor, interruptable, "cancel requested while in flight");
        Ok(CancelOutcome::AfterCompletion)
    }

    fn remove_clearable(&mut self, actor: UnitId, env: &mut Env<'_>) -> usize {
        let Some(unit) = self.world.unit_mut(actor) else {
            return 0;
        };
        let removed = unit.queue.remove_clearable();
        for entry in &removed {
            env.presentation
                .on_action_state_changed(actor, entry.action.kind, ActionState::Cancelled);
        }
        removed.len()
    }

    /// Empties the unit's queue atomically. With `stop_animation` an
    /// in-flight move stops where it is.
    pub fn clear_queue(&mut self, actor: UnitId, stop_animation: bool, env: &mut Env<'_>) -> usize {
        let Some(unit) = self.world.unit_mut(actor) else {
            return 0;
        };
        let removed = unit.queue.clear();
        let stopped_at = if stop_animation {
            unit.movement.take().map(|_| unit.position)
        } else {
            None
        };
        for entry in &removed {
            env.presentation
                .on_action_state_changed(actor, entry.action.kind, ActionState::Cancelled);
        }
        if let Some(at) = stopped_at {
            self.emit(env, WorldEvent::UnitStoppedMoving { unit: actor, at });
        }
        removed.len()
    }

    pub fn available_actions(&self, actor: UnitId, env: &Env<'_>) -> Vec<ActionKind> {
        available_actions(self.world, actor, env)
    }

    pub fn set_selected_action(&mut self, actor: UnitId, kind: ActionKind) -> Result<(), ActionError> {
        let unit = self.world.get_mut(actor).map_err(|_| ActionError::UnknownUnit(actor))?;
        unit.selected_action = kind;
        Ok(())
    }

    /// Movement style used to price moves queued from now on.
    pub fn set_movement_mode(&mut self, actor: UnitId, mode: MovementMode) -> Result<(), ActionError> {
        let unit = self.world.get_mut(actor).map_err(|_| ActionError::UnknownUnit(actor))?;
        if unit.movement_mode != mode {
            tracing::trace!(unit = %actor, %mode, "movement mode changed");
            unit.movement_mode = mode;
        }
        Ok(())
    }

    fn emit(&self, env: &mut Env<'_>, event: WorldEvent) {
        tracing::trace!(?event, "world event");
        env.presentation.on_world_event(&event);
    }
}
