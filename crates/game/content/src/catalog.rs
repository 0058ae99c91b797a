//! Named item stat blocks.

use std::collections::BTreeMap;

use skirmish_core::ItemStats;

/// Item templates keyed by name. Rosters refer to items by these names.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemCatalog {
    pub items: BTreeMap<String, ItemStats>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, stats: ItemStats) {
        self.items.insert(name.into(), stats);
    }

    pub fn get(&self, name: &str) -> Option<ItemStats> {
        self.items.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
