//! Deterministic rules of the turn-based tactical combat simulation.
//!
//! `skirmish-core` defines the canonical rules (resources, stances, combat
//! math, actions, turn order) and exposes pure APIs that the runtime drives.
//! All state mutation flows through [`engine::GameEngine`]; pathfinding,
//! equipment and presentation are collaborators reached through [`env::Env`].
pub mod action;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod event;
pub mod ledger;
pub mod stance;
pub mod state;

pub use action::{
    Action, ActionError, ActionFlags, ActionKind, ActionQueue, ActionTarget, CostQuote, QueueEntry,
};
pub use combat::{AttackKind, AttackReport, Blocker, Defense, TargetOutcome, TargetResolutionMap};
pub use config::{AiTuning, GameConfig, StanceProfile, StanceTable};
pub use engine::{CancelOutcome, Enqueued, GameEngine, StepOutcome, TurnError};
pub use env::{
    ActionState, ConsumableEffect, Env, EquipSlot, EquipmentChange, EquipmentOracle,
    EquipmentStore, Hand, ItemCategory, ItemId, ItemStats, Loadout, NullPresentation,
    ObstacleMask, OracleError, PathfindingOracle, Presentation, WeaponType,
};
pub use error::{ErrorSeverity, GameError};
pub use event::{EventKind, WorldEvent};
pub use ledger::{EnergyDrain, LedgerError, ResourceLedger, banking_share};
pub use stance::{StanceChange, StanceKind, StanceState, StatModifiers};
pub use state::{
    Attributes, Control, Direction, Faction, Meter, MovementMode, Position, Skills, TurnState,
    Unit, UnitId, UnitSpec, World, WorldError,
};
