use super::UnitId;

/// Turn bookkeeping for the round-robin driver.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Number of turns started so far.
    pub turn: u64,

    /// Number of AP ticks fired so far across all units.
    pub ticks: u64,

    /// Unit whose turn is in progress, if any.
    pub current: Option<UnitId>,

    /// Unit that started the most recent turn; the next search begins after it.
    pub last: Option<UnitId>,

    /// Planner decisions made by the current unit this turn.
    pub decisions: u32,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }
}
