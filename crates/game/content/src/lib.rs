//! Data-driven content definitions and loaders.
//!
//! This crate houses the static data an encounter is built from and
//! provides loaders for RON/TOML data files:
//! - Balance configuration (TOML, deserialized straight into `GameConfig`)
//! - Map layouts (RON)
//! - Item catalogs (RON)
//! - Encounter rosters (RON)
//!
//! Content is consumed by the runtime when it assembles a simulation and
//! never appears in the rules state itself.

pub mod catalog;
pub mod encounter;
pub mod layout;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::ItemCatalog;
pub use encounter::{Encounter, EncounterSpec, RosterEntry, RosterUnit};
pub use layout::{MapLayout, Terrain};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, ItemLoader, LoadResult, MapLoader, RosterLoader,
};
