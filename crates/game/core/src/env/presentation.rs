use crate::action::ActionKind;
use crate::combat::AttackReport;
use crate::event::WorldEvent;
use crate::state::UnitId;

/// Lifecycle of a queued action as reported to presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActionState {
    Queued,
    Started,
    /// Paid partially; resumes on the unit's next turn.
    Deferred,
    Completed,
    Cancelled,
}

/// Presentation collaborator.
///
/// Calls are fire-and-forget: the engine computes outcomes first and never
/// waits on these methods. Non-instant actions are completed later through
/// the engine's resolution-complete signal.
pub trait Presentation {
    fn on_attack_resolved(&mut self, report: &AttackReport);

    fn on_action_state_changed(&mut self, unit: UnitId, action: ActionKind, state: ActionState);

    /// Everything else the simulation emits (ticks, movement, deaths, sounds).
    fn on_world_event(&mut self, _event: &WorldEvent) {}
}

/// Presentation that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresentation;

impl Presentation for NullPresentation {
    fn on_attack_resolved(&mut self, _report: &AttackReport) {}

    fn on_action_state_changed(&mut self, _unit: UnitId, _action: ActionKind, _state: ActionState) {}
}
