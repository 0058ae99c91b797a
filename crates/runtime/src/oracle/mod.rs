//! In-memory collaborators for the engine.
//!
//! [`GridPathfinding`] answers grid queries over a [`skirmish_content::MapLayout`]
//! and [`InMemoryEquipment`] keeps every unit's items. The simulation owns
//! both and lends them to the engine through [`skirmish_core::Env`].
mod items;
mod map;

pub use items::InMemoryEquipment;
pub use map::GridPathfinding;
