//! Traits describing the engine's external collaborators.
//!
//! Pathfinding, equipment and presentation are owned by the host. The
//! [`Env`] aggregate bundles them together with the rules configuration and
//! the random source so the engine can reach everything it needs without
//! depending on concrete implementations or global state.
mod equipment;
mod error;
mod pathfinding;
mod presentation;

pub use equipment::{
    ConsumableEffect, EquipSlot, EquipmentChange, EquipmentOracle, EquipmentStore, Hand,
    ItemCategory, ItemId, ItemStats, Loadout, WeaponType,
};
pub use error::OracleError;
pub use pathfinding::{ObstacleMask, PathfindingOracle};
pub use presentation::{ActionState, NullPresentation, Presentation};

use rand::RngCore;

use crate::config::GameConfig;

/// Collaborators and shared services passed into the engine for one call.
pub struct Env<'a> {
    pub config: &'a GameConfig,
    pub pathfinding: &'a dyn PathfindingOracle,
    pub equipment: &'a mut dyn EquipmentStore,
    pub presentation: &'a mut dyn Presentation,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> Env<'a> {
    pub fn new(
        config: &'a GameConfig,
        pathfinding: &'a dyn PathfindingOracle,
        equipment: &'a mut dyn EquipmentStore,
        presentation: &'a mut dyn Presentation,
        rng: &'a mut dyn RngCore,
    ) -> Self {
        Self {
            config,
            pathfinding,
            equipment,
            presentation,
            rng,
        }
    }
}
