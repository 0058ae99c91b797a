use bitflags::bitflags;

use crate::state::Position;

bitflags! {
    /// What counts as an obstacle when querying reachable cells.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ObstacleMask: u8 {
        /// Static walls and closed doors.
        const TERRAIN = 1 << 0;
        /// Cells occupied by any living unit.
        const UNITS   = 1 << 1;
    }
}

/// Grid graph collaborator.
///
/// The engine never searches the grid itself; it only asks which cells are
/// reachable, for a path between two cells, and whether a cell can be stood
/// on or interacted with.
pub trait PathfindingOracle {
    /// Cells whose path distance from `origin` lies in `[min_range, max_range]`.
    fn reachable_cells(
        &self,
        origin: Position,
        min_range: u32,
        max_range: u32,
        mask: ObstacleMask,
    ) -> Vec<Position>;

    /// Ordered cells from `origin` (exclusive) to `destination` (inclusive).
    ///
    /// Returns `None` when no path exists. The path may contain cells that are
    /// not walkable (closed doors); callers check [`Self::is_walkable`].
    fn path(&self, origin: Position, destination: Position) -> Option<Vec<Position>>;

    fn is_walkable(&self, cell: Position) -> bool;

    /// Whether an Interact can target `cell` (a closed door).
    fn is_interactable(&self, cell: Position) -> bool;
}
