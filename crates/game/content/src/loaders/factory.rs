//! Content factory for assembling encounters from a data directory.

use std::path::{Path, PathBuf};

use skirmish_core::GameConfig;

use crate::catalog::ItemCatalog;
use crate::encounter::Encounter;
use crate::layout::MapLayout;
use crate::loaders::{ConfigLoader, ItemLoader, LoadResult, MapLoader, RosterLoader};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── items.ron
/// ├── maps/
/// │   └── courtyard.ron
/// └── encounters/
///     └── courtyard.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<ItemCatalog> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load a map from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<MapLayout> {
        let path = self.data_dir.join("maps").join(format!("{}.ron", map_name));
        MapLoader::load(&path)
    }

    /// Load the roster `encounters/{name}.ron` together with the map it is
    /// played on.
    ///
    /// Every unit must start on a walkable cell of that map.
    pub fn load_encounter(&self, name: &str) -> LoadResult<(Encounter, MapLayout)> {
        let items = self.load_items()?;
        let path = self.data_dir.join("encounters").join(format!("{}.ron", name));
        let encounter = RosterLoader::load(&path, &items)?;
        let map = self.load_map(&encounter.map)?;

        for unit in &encounter.units {
            if !map.is_walkable(unit.spec.position) {
                anyhow::bail!(
                    "Unit '{}' starts on {}, which is not walkable on map '{}'",
                    unit.spec.name,
                    unit.spec.position,
                    encounter.map
                );
            }
        }

        Ok((encounter, map))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use skirmish_core::Position;

    use super::*;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn seeded_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "config.toml", "max_decisions_per_turn = 3\n");
        write(
            dir.path(),
            "items.ron",
            r#"(items: {"club": (category: Weapon, weapon_type: Mace, damage: 4)})"#,
        );
        write(
            dir.path(),
            "maps/pit.ron",
            "(dimensions: (6, 4), tiles: [(3, 0, Wall), (3, 1, Door)])",
        );
        write(
            dir.path(),
            "encounters/brawl.ron",
            r#"(map: "pit", units: [
                (unit: (name: "hero", control: Human, position: (x: 0, y: 0), health: 30),
                 equipment: {MainHand: "club"}),
                (unit: (name: "brute", faction: (1), position: (x: 5, y: 3), health: 30)),
            ])"#,
        );
        dir
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_a_complete_encounter() {
        let dir = seeded_dir();
        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_config().unwrap().max_decisions_per_turn, 3);
        let (encounter, map) = factory.load_encounter("brawl").unwrap();
        assert_eq!(encounter.units.len(), 2);
        assert_eq!(map.doors().collect::<Vec<_>>(), vec![Position::new(3, 1)]);
    }

    #[test]
    fn rejects_units_spawned_in_walls() {
        let dir = seeded_dir();
        write(
            dir.path(),
            "encounters/stuck.ron",
            r#"(map: "pit", units: [
                (unit: (name: "ghost", position: (x: 3, y: 0), health: 5)),
            ])"#,
        );
        let error = ContentFactory::new(dir.path())
            .load_encounter("stuck")
            .unwrap_err();
        assert!(error.to_string().contains("not walkable"));
    }

    #[test]
    fn missing_files_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let error = ContentFactory::new(dir.path()).load_map("nowhere").unwrap_err();
        assert!(error.to_string().contains("nowhere.ron"));
    }
}
