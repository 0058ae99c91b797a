//! Authoritative simulation state.
//!
//! The [`World`] owns every registered unit in registration order together
//! with turn bookkeeping. Units are never removed: dead units stay in the
//! registry so their ids remain valid for events and logs. Runtime layers read
//! this state freely but mutate it through [`crate::engine::GameEngine`].
mod error;
mod geometry;
mod turn;
mod unit;

pub use error::WorldError;
pub use geometry::{Direction, Position};
pub use turn::TurnState;
pub use unit::{
    Attributes, Control, Faction, Meter, MovementMode, MovementState, Skills, Unit, UnitId,
    UnitSpec,
};

use crate::config::GameConfig;

/// Registry of units plus turn bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct World {
    /// Indexed by `UnitId`; ids are allocated sequentially from zero.
    units: Vec<Unit>,
    pub turn: TurnState,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a unit and returns its id. Units spawn with full AP.
    pub fn spawn(&mut self, spec: UnitSpec, config: &GameConfig) -> Result<UnitId, WorldError> {
        if let Some(occupant) = self.unit_at(spec.position) {
            return Err(WorldError::PositionOccupied {
                position: spec.position,
                occupant: occupant.id,
            });
        }
        if spec.control == Control::Human
            && let Some(existing) = self.human()
        {
            return Err(WorldError::SecondHuman {
                existing: existing.id,
            });
        }

        let raw = u32::try_from(self.units.len()).map_err(|_| WorldError::UnitIdOverflow)?;
        let id = UnitId(raw);
        tracing::debug!(unit = %id, name = %spec.name, position = %spec.position, "spawned unit");
        self.units.push(Unit::spawn(id, spec, config));
        Ok(id)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.0 as usize)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.0 as usize)
    }

    pub fn get(&self, id: UnitId) -> Result<&Unit, WorldError> {
        self.unit(id).ok_or(WorldError::UnknownUnit(id))
    }

    pub fn get_mut(&mut self, id: UnitId) -> Result<&mut Unit, WorldError> {
        self.unit_mut(id).ok_or(WorldError::UnknownUnit(id))
    }

    /// All units in registration order, corpses included.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn alive(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|unit| unit.alive)
    }

    pub fn ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.iter().map(|unit| unit.id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The human-controlled unit, alive or not.
    pub fn human(&self) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.is_human())
    }

    /// Living unit standing on `position`.
    pub fn unit_at(&self, position: Position) -> Option<&Unit> {
        self.alive().find(|unit| unit.position == position)
    }

    /// Living hostile units within `range` cells of `id`, nearest first.
    pub fn hostiles_near(&self, id: UnitId, range: u32) -> Vec<UnitId> {
        let Some(origin) = self.unit(id) else {
            return Vec::new();
        };
        let mut found: Vec<(u32, UnitId)> = self
            .alive()
            .filter(|other| other.id != id && origin.is_hostile_to(other))
            .map(|other| (origin.position.chebyshev(other.position), other.id))
            .filter(|(distance, _)| *distance <= range)
            .collect();
        found.sort();
        found.into_iter().map(|(_, id)| id).collect()
    }

    /// True while living units of more than one faction remain.
    pub fn is_contested(&self) -> bool {
        let mut factions = self.alive().map(|unit| unit.faction);
        match factions.next() {
            Some(first) => factions.any(|faction| faction != first),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, faction: u8, x: i32) -> UnitSpec {
        UnitSpec::new(name, Faction(faction), Position::new(x, 0))
    }

    #[test]
    fn spawn_allocates_sequential_ids_with_full_ap() {
        let config = GameConfig::default();
        let mut world = World::new();
        let a = world.spawn(spec("a", 0, 0), &config).unwrap();
        let b = world.spawn(spec("b", 1, 3), &config).unwrap();

        assert_eq!(a, UnitId(0));
        assert_eq!(b, UnitId(1));
        let unit = world.get(b).unwrap();
        assert_eq!(unit.ledger.ap(), config.max_ap(unit.attributes.speed));
    }

    #[test]
    fn spawn_rejects_occupied_cell_and_second_human() {
        let config = GameConfig::default();
        let mut world = World::new();
        world.spawn(spec("hero", 0, 0).human(), &config).unwrap();

        assert!(matches!(
            world.spawn(spec("clone", 1, 0), &config),
            Err(WorldError::PositionOccupied { .. })
        ));
        assert!(matches!(
            world.spawn(spec("rival", 0, 5).human(), &config),
            Err(WorldError::SecondHuman { .. })
        ));
    }

    #[test]
    fn hostiles_near_sorts_by_distance_and_skips_allies() {
        let config = GameConfig::default();
        let mut world = World::new();
        let me = world.spawn(spec("me", 0, 0), &config).unwrap();
        world.spawn(spec("friend", 0, 1), &config).unwrap();
        let far = world.spawn(spec("far", 1, 6), &config).unwrap();
        let near = world.spawn(spec("near", 1, 2), &config).unwrap();
        world.spawn(spec("out", 1, 40), &config).unwrap();

        assert_eq!(world.hostiles_near(me, 10), vec![near, far]);
        assert!(world.is_contested());
    }
}
