//! Breadth-first grid queries over a map layout.
use std::collections::{BTreeSet, HashMap, VecDeque};

use skirmish_content::{MapLayout, Terrain};
use skirmish_core::{Direction, ObstacleMask, PathfindingOracle, Position};
use strum::IntoEnumIterator;

/// [`PathfindingOracle`] over a mutable map layout.
///
/// Paths go through closed doors (the engine reroutes them into an
/// interaction) but never through walls. Occupied cells only matter for
/// [`ObstacleMask::UNITS`] queries and are refreshed by the owner.
#[derive(Clone, Debug, Default)]
pub struct GridPathfinding {
    layout: MapLayout,
    occupied: BTreeSet<Position>,
}

impl GridPathfinding {
    pub fn new(layout: MapLayout) -> Self {
        Self {
            layout,
            occupied: BTreeSet::new(),
        }
    }

    pub fn layout(&self) -> &MapLayout {
        &self.layout
    }

    pub fn set_occupied(&mut self, cells: impl IntoIterator<Item = Position>) {
        self.occupied = cells.into_iter().collect();
    }

    pub fn open_door(&mut self, cell: Position) -> bool {
        self.layout.open_door(cell)
    }

    /// Neighbours in a fixed direction order. Diagonal steps may not cut the
    /// corner of a wall.
    fn neighbours(&self, cell: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::iter().filter_map(move |direction| {
            let next = cell.step(direction);
            if !self.is_passable(next) {
                return None;
            }
            let (dx, dy) = direction.offset();
            if dx != 0 && dy != 0 {
                let side_a = Position::new(cell.x + dx, cell.y);
                let side_b = Position::new(cell.x, cell.y + dy);
                if self.layout.terrain(side_a) == Some(Terrain::Wall)
                    || self.layout.terrain(side_b) == Some(Terrain::Wall)
                {
                    return None;
                }
            }
            Some(next)
        })
    }

    fn is_passable(&self, cell: Position) -> bool {
        self.layout.terrain(cell).is_some_and(Terrain::is_passable)
    }

    fn blocked(&self, cell: Position, origin: Position, mask: ObstacleMask) -> bool {
        if !self.layout.in_bounds(cell) {
            return true;
        }
        if mask.contains(ObstacleMask::TERRAIN) && !self.layout.is_walkable(cell) {
            return true;
        }
        mask.contains(ObstacleMask::UNITS) && cell != origin && self.occupied.contains(&cell)
    }
}

impl PathfindingOracle for GridPathfinding {
    fn reachable_cells(
        &self,
        origin: Position,
        min_range: u32,
        max_range: u32,
        mask: ObstacleMask,
    ) -> Vec<Position> {
        let mut found = Vec::new();
        let mut seen = BTreeSet::from([origin]);
        let mut frontier = VecDeque::from([(origin, 0u32)]);

        while let Some((cell, distance)) = frontier.pop_front() {
            if distance >= min_range && cell != origin {
                found.push(cell);
            }
            if distance == max_range {
                continue;
            }
            for direction in Direction::iter() {
                let next = cell.step(direction);
                if self.blocked(next, origin, mask) || !seen.insert(next) {
                    continue;
                }
                frontier.push_back((next, distance + 1));
            }
        }
        found
    }

    fn path(&self, origin: Position, destination: Position) -> Option<Vec<Position>> {
        if origin == destination {
            return Some(Vec::new());
        }
        if !self.is_passable(destination) {
            return None;
        }

        let mut parent: HashMap<Position, Position> = HashMap::new();
        let mut frontier = VecDeque::from([origin]);
        while let Some(cell) = frontier.pop_front() {
            if cell == destination {
                break;
            }
            for next in self.neighbours(cell) {
                if next == origin || parent.contains_key(&next) {
                    continue;
                }
                parent.insert(next, cell);
                frontier.push_back(next);
            }
        }

        let mut path = Vec::new();
        let mut cursor = destination;
        while cursor != origin {
            path.push(cursor);
            cursor = *parent.get(&cursor)?;
        }
        path.reverse();
        Some(path)
    }

    fn is_walkable(&self, cell: Position) -> bool {
        self.layout.is_walkable(cell)
    }

    fn is_interactable(&self, cell: Position) -> bool {
        self.layout.terrain(cell) == Some(Terrain::Door)
    }
}
