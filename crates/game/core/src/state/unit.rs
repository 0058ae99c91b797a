use std::collections::VecDeque;
use std::fmt;

use super::{Direction, Position};
use crate::action::{ActionKind, ActionQueue};
use crate::config::GameConfig;
use crate::ledger::ResourceLedger;
use crate::stance::StanceState;

/// Unique identifier for a unit in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side a unit fights for. Units of different factions are hostile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Faction(pub u8);

impl Faction {
    pub const PLAYER: Self = Self(0);

    pub fn is_hostile_to(self, other: Faction) -> bool {
        self != other
    }
}

/// Who decides the unit's actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Control {
    /// Driven by UI input; its AP spending paces everyone else.
    Human,
    #[default]
    Autonomous,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Attributes {
    pub speed: f32,
    pub agility: f32,
    pub strength: f32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            speed: 20.0,
            agility: 50.0,
            strength: 50.0,
        }
    }
}

/// Skill levels on a 0-100 scale.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Skills {
    pub melee: f32,
    pub ranged: f32,
    pub shield: f32,
}

impl Default for Skills {
    fn default() -> Self {
        Self {
            melee: 50.0,
            ranged: 50.0,
            shield: 50.0,
        }
    }
}

/// Integer meter (health) with a fixed maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meter {
    pub current: u32,
    pub maximum: u32,
}

impl Meter {
    pub const fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn fraction(&self) -> f32 {
        if self.maximum == 0 {
            return 0.0;
        }
        self.current as f32 / self.maximum as f32
    }
}

/// Movement style requested by the active behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MovementMode {
    #[default]
    Walk,
    Run,
    Sneak,
}

/// Path still to be walked by an in-flight move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MovementState {
    pub remaining: VecDeque<Position>,
}

impl MovementState {
    pub fn new(path: impl IntoIterator<Item = Position>) -> Self {
        Self {
            remaining: path.into_iter().collect(),
        }
    }

    /// Drops everything past the next waypoint.
    pub fn truncate_to_next_waypoint(&mut self) {
        self.remaining.truncate(1);
    }
}

/// Spawn description of a unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitSpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub faction: Faction,
    #[cfg_attr(feature = "serde", serde(default))]
    pub control: Control,
    pub position: Position,
    #[cfg_attr(feature = "serde", serde(default))]
    pub elevation: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub facing: Direction,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Attributes,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Skills,
    pub health: u32,
}

impl UnitSpec {
    pub fn new(name: impl Into<String>, faction: Faction, position: Position) -> Self {
        Self {
            name: name.into(),
            faction,
            control: Control::Autonomous,
            position,
            elevation: 0,
            facing: Direction::default(),
            attributes: Attributes::default(),
            skills: Skills::default(),
            health: 30,
        }
    }

    pub fn human(mut self) -> Self {
        self.control = Control::Human;
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_skills(mut self, skills: Skills) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health;
        self
    }

    pub fn with_elevation(mut self, elevation: i32) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn facing(mut self, facing: Direction) -> Self {
        self.facing = facing;
        self
    }
}

/// A combatant tracked by the simulation.
#[derive(Clone, Debug)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub faction: Faction,
    pub control: Control,
    pub position: Position,
    pub elevation: i32,
    pub facing: Direction,
    pub attributes: Attributes,
    pub skills: Skills,
    pub health: Meter,
    pub alive: bool,
    /// Cleared by effects that stop the unit from acting (stunned, downed).
    pub can_perform_actions: bool,

    pub ledger: ResourceLedger,
    pub queue: ActionQueue,
    pub stances: StanceState,

    pub movement: Option<MovementState>,
    pub movement_mode: MovementMode,
    /// Action highlighted in the UI for this unit.
    pub selected_action: ActionKind,
    /// Hostile units currently seen, refreshed on ticks and turn starts.
    pub known_enemies: Vec<UnitId>,
}

impl Unit {
    pub fn spawn(id: UnitId, spec: UnitSpec, config: &GameConfig) -> Self {
        let max_ap = config.max_ap(spec.attributes.speed);
        Self {
            id,
            name: spec.name,
            faction: spec.faction,
            control: spec.control,
            position: spec.position,
            elevation: spec.elevation,
            facing: spec.facing,
            attributes: spec.attributes,
            skills: spec.skills,
            health: Meter::full(spec.health),
            alive: spec.health > 0,
            can_perform_actions: true,
            ledger: ResourceLedger::new(max_ap, config.ap.max_energy),
            queue: ActionQueue::new(),
            stances: StanceState::default(),
            movement: None,
            movement_mode: MovementMode::default(),
            selected_action: ActionKind::Move,
            known_enemies: Vec::new(),
        }
    }

    pub fn is_human(&self) -> bool {
        self.control == Control::Human
    }

    pub fn max_ap(&self, config: &GameConfig) -> u32 {
        config.max_ap(self.attributes.speed)
    }

    pub fn is_hostile_to(&self, other: &Unit) -> bool {
        self.faction.is_hostile_to(other.faction)
    }

    /// Marks the unit dead; it stays in the registry as a corpse.
    pub fn kill(&mut self) {
        self.health.current = 0;
        self.alive = false;
        self.movement = None;
    }
}
