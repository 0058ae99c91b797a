//! Content loaders for reading game data from files.
//!
//! Each loader turns one RON/TOML file into the types of [`crate`] or
//! `skirmish-core`. [`ContentFactory`] knows the data directory layout.

pub mod config;
pub mod factory;
pub mod item;
pub mod map;
pub mod roster;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use item::ItemLoader;
pub use map::MapLoader;
pub use roster::RosterLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
