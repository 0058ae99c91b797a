//! Map data loader.
//!
//! Loads terrain only; unit placement comes from encounter rosters.

use std::path::Path;

use serde::{Deserialize, Serialize};
use skirmish_core::Position;

use crate::layout::{MapLayout, Terrain};
use crate::loaders::{LoadResult, read_file};

/// Map data structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapDataRon {
    dimensions: (u32, u32),
    tiles: Vec<(i32, i32, Terrain)>, // (x, y, terrain)
}

/// Loader for map data from RON files.
pub struct MapLoader;

impl MapLoader {
    pub fn load(path: &Path) -> LoadResult<MapLayout> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Cells not listed in `tiles` are floor. Tiles outside the dimensions
    /// are rejected.
    pub fn parse(content: &str) -> LoadResult<MapLayout> {
        let data: MapDataRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;

        let (width, height) = data.dimensions;
        let mut layout = MapLayout::new(width, height);
        for (x, y, terrain) in data.tiles {
            let position = Position::new(x, y);
            if !layout.in_bounds(position) {
                anyhow::bail!("Tile {} lies outside the {}x{} map", position, width, height);
            }
            layout.set(position, terrain);
        }

        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tiles_over_floor() {
        let layout = MapLoader::parse(
            "(dimensions: (5, 3), tiles: [(2, 0, Wall), (2, 1, Door), (2, 2, Wall)])",
        )
        .unwrap();

        assert_eq!(layout.width(), 5);
        assert_eq!(layout.terrain(Position::new(2, 1)), Some(Terrain::Door));
        assert_eq!(layout.terrain(Position::new(4, 2)), Some(Terrain::Floor));
    }

    #[test]
    fn rejects_tiles_outside_the_map() {
        let error = MapLoader::parse("(dimensions: (2, 2), tiles: [(3, 0, Wall)])").unwrap_err();
        assert!(error.to_string().contains("outside"));
    }
}
