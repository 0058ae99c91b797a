//! Static terrain of an encounter map.

use std::collections::BTreeMap;

use skirmish_core::Position;

/// Terrain of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    #[default]
    Floor,
    Wall,
    /// Closed door; blocks movement until someone interacts with it.
    Door,
    OpenDoor,
}

impl Terrain {
    pub fn is_walkable(self) -> bool {
        matches!(self, Terrain::Floor | Terrain::OpenDoor)
    }

    /// Doors can be pathed through; walking in still needs them open.
    pub fn is_passable(self) -> bool {
        !matches!(self, Terrain::Wall)
    }
}

/// Rectangular grid with explicit overrides on a floor background.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapLayout {
    width: u32,
    height: u32,
    overrides: BTreeMap<Position, Terrain>,
}

impl MapLayout {
    /// An open floor of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_tiles(mut self, tiles: impl IntoIterator<Item = (Position, Terrain)>) -> Self {
        for (position, terrain) in tiles {
            self.set(position, terrain);
        }
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    /// Terrain at `position`, or `None` outside the map.
    pub fn terrain(&self, position: Position) -> Option<Terrain> {
        if !self.in_bounds(position) {
            return None;
        }
        Some(self.overrides.get(&position).copied().unwrap_or_default())
    }

    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, position: Position, terrain: Terrain) {
        if !self.in_bounds(position) {
            return;
        }
        if terrain == Terrain::Floor {
            self.overrides.remove(&position);
        } else {
            self.overrides.insert(position, terrain);
        }
    }

    pub fn is_walkable(&self, position: Position) -> bool {
        self.terrain(position).is_some_and(Terrain::is_walkable)
    }

    /// Opens a closed door. Returns false when there is no closed door at
    /// `position`.
    pub fn open_door(&mut self, position: Position) -> bool {
        if self.terrain(position) != Some(Terrain::Door) {
            return false;
        }
        self.set(position, Terrain::OpenDoor);
        true
    }

    pub fn doors(&self) -> impl Iterator<Item = Position> + '_ {
        self.overrides
            .iter()
            .filter(|(_, terrain)| **terrain == Terrain::Door)
            .map(|(position, _)| *position)
    }
}
