//! Encounter rosters.
//!
//! An [`EncounterSpec`] is what a roster file holds: unit specs with items
//! referred to by catalog name. Resolving it against an [`crate::ItemCatalog`]
//! yields an [`Encounter`] ready to be spawned.

use std::collections::BTreeMap;

use skirmish_core::{EquipSlot, ItemStats, Position, UnitSpec};

/// One unit as written in a roster file.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterEntry {
    pub unit: UnitSpec,
    /// Item names per slot.
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: BTreeMap<EquipSlot, String>,
    /// Item names carried in the pack.
    #[cfg_attr(feature = "serde", serde(default))]
    pub carried: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub patrol: Vec<Position>,
    /// Name of the unit this one escorts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub follow: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSpec {
    /// Map file name, without extension.
    pub map: String,
    pub units: Vec<RosterEntry>,
}

/// A roster entry with its items resolved to stat blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct RosterUnit {
    pub spec: UnitSpec,
    pub equipped: Vec<(EquipSlot, ItemStats)>,
    pub carried: Vec<ItemStats>,
    pub patrol: Vec<Position>,
    /// Index into [`Encounter::units`] of the unit to follow.
    pub follow: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Encounter {
    pub map: String,
    pub units: Vec<RosterUnit>,
}
