//! Events the simulation emits while it runs.
//!
//! Events are delivered to the presentation collaborator as they happen.
//! Goal behaviors subscribe to the [`EventKind`]s they care about.

use crate::action::Action;
use crate::combat::AttackKind;
use crate::env::{EquipmentChange, Hand};
use crate::stance::StanceKind;
use crate::state::{Position, UnitId};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorldEvent {
    TurnStarted {
        unit: UnitId,
        turn: u64,
    },
    TurnEnded {
        unit: UnitId,
    },
    /// A unit's AP countdown crossed a full budget.
    Tick {
        unit: UnitId,
        tick: u64,
    },
    UnitMoved {
        unit: UnitId,
        from: Position,
        to: Position,
    },
    UnitStoppedMoving {
        unit: UnitId,
        at: Position,
    },
    TookDamage {
        unit: UnitId,
        attacker: UnitId,
        kind: AttackKind,
        damage: u32,
    },
    /// Noise of combat, heard within the hearing range.
    Sound {
        source: UnitId,
        at: Position,
    },
    EnemySpotted {
        unit: UnitId,
        enemy: UnitId,
    },
    StanceRaised {
        unit: UnitId,
        hand: Hand,
        stance: StanceKind,
    },
    StanceLowered {
        unit: UnitId,
        hand: Hand,
        stance: StanceKind,
        /// Knocked down by the rules rather than toggled off by the unit.
        forced: bool,
    },
    EquipmentChanged {
        unit: UnitId,
        change: EquipmentChange,
    },
    Interacted {
        unit: UnitId,
        cell: Position,
    },
    /// An action was dropped because its target went stale.
    ActionCancelled {
        unit: UnitId,
        action: Action,
    },
    UnitDied {
        unit: UnitId,
        killer: Option<UnitId>,
    },
}

/// Payload-free discriminant of [`WorldEvent`], used for subscriptions.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    TurnStarted,
    TurnEnded,
    Tick,
    UnitMoved,
    UnitStoppedMoving,
    TookDamage,
    Sound,
    EnemySpotted,
    StanceRaised,
    StanceLowered,
    EquipmentChanged,
    Interacted,
    ActionCancelled,
    UnitDied,
}

impl WorldEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            WorldEvent::TurnStarted { .. } => EventKind::TurnStarted,
            WorldEvent::TurnEnded { .. } => EventKind::TurnEnded,
            WorldEvent::Tick { .. } => EventKind::Tick,
            WorldEvent::UnitMoved { .. } => EventKind::UnitMoved,
            WorldEvent::UnitStoppedMoving { .. } => EventKind::UnitStoppedMoving,
            WorldEvent::TookDamage { .. } => EventKind::TookDamage,
            WorldEvent::Sound { .. } => EventKind::Sound,
            WorldEvent::EnemySpotted { .. } => EventKind::EnemySpotted,
            WorldEvent::StanceRaised { .. } => EventKind::StanceRaised,
            WorldEvent::StanceLowered { .. } => EventKind::StanceLowered,
            WorldEvent::EquipmentChanged { .. } => EventKind::EquipmentChanged,
            WorldEvent::Interacted { .. } => EventKind::Interacted,
            WorldEvent::ActionCancelled { .. } => EventKind::ActionCancelled,
            WorldEvent::UnitDied { .. } => EventKind::UnitDied,
        }
    }

    /// Unit the event is primarily about.
    pub fn subject(&self) -> UnitId {
        match self {
            WorldEvent::TurnStarted { unit, .. }
            | WorldEvent::TurnEnded { unit }
            | WorldEvent::Tick { unit, .. }
            | WorldEvent::UnitMoved { unit, .. }
            | WorldEvent::UnitStoppedMoving { unit, .. }
            | WorldEvent::TookDamage { unit, .. }
            | WorldEvent::EnemySpotted { unit, .. }
            | WorldEvent::StanceRaised { unit, .. }
            | WorldEvent::StanceLowered { unit, .. }
            | WorldEvent::EquipmentChanged { unit, .. }
            | WorldEvent::Interacted { unit, .. }
            | WorldEvent::ActionCancelled { unit, .. }
            | WorldEvent::UnitDied { unit, .. } => *unit,
            WorldEvent::Sound { source, .. } => *source,
        }
    }
}
