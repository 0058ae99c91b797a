use std::fmt;

/// Discrete grid position expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Grid distance where diagonal steps cost the same as orthogonal ones.
    pub fn chebyshev(self, other: Position) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    /// Returns true if `other` is one of the eight neighbouring cells.
    pub fn is_adjacent(self, other: Position) -> bool {
        self != other && self.chebyshev(other) == 1
    }

    /// Moves one cell in the given direction.
    pub fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.offset();
        Position::new(self.x + dx, self.y + dy)
    }

    /// Eight-way direction that best approximates the vector towards `other`.
    ///
    /// Returns `None` when both positions are the same cell.
    pub fn direction_to(self, other: Position) -> Option<Direction> {
        let dx = (other.x - self.x) as f32;
        let dy = (other.y - self.y) as f32;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        let angle = dy.atan2(dx);
        let octant = (angle / std::f32::consts::FRAC_PI_4).round() as i32;
        Some(Direction::from_octant(octant))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Eight-way facing. Octant 0 points along +x and increases counter-clockwise
/// (towards +y).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    pub const fn octant(self) -> i32 {
        match self {
            Direction::East => 0,
            Direction::NorthEast => 1,
            Direction::North => 2,
            Direction::NorthWest => 3,
            Direction::West => 4,
            Direction::SouthWest => 5,
            Direction::South => 6,
            Direction::SouthEast => 7,
        }
    }

    pub fn from_octant(octant: i32) -> Self {
        match octant.rem_euclid(8) {
            0 => Direction::East,
            1 => Direction::NorthEast,
            2 => Direction::North,
            3 => Direction::NorthWest,
            4 => Direction::West,
            5 => Direction::SouthWest,
            6 => Direction::South,
            _ => Direction::SouthEast,
        }
    }

    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::North => (0, 1),
            Direction::NorthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::South => (0, -1),
            Direction::SouthEast => (1, -1),
        }
    }

    /// Number of 45° steps between two facings, in `0..=4`.
    pub fn octant_distance(self, other: Direction) -> u32 {
        let diff = (self.octant() - other.octant()).rem_euclid(8);
        diff.min(8 - diff) as u32
    }
}
