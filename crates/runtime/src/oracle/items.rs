//! Per-unit item bookkeeping served through the equipment traits.
use std::collections::BTreeMap;

use skirmish_core::{
    EquipSlot, EquipmentChange, EquipmentOracle, EquipmentStore, ItemId, ItemStats, OracleError,
    UnitId,
};

#[derive(Clone, Debug, Default)]
struct Inventory {
    slots: BTreeMap<EquipSlot, ItemId>,
    pack: Vec<ItemId>,
}

impl Inventory {
    fn slot_of(&self, item: ItemId) -> Option<EquipSlot> {
        self.slots
            .iter()
            .find(|(_, held)| **held == item)
            .map(|(slot, _)| *slot)
    }

    fn holds(&self, item: ItemId) -> bool {
        self.pack.contains(&item) || self.slot_of(item).is_some()
    }
}

/// Equipment store keeping item instances and inventories in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryEquipment {
    items: BTreeMap<ItemId, ItemStats>,
    inventories: BTreeMap<UnitId, Inventory>,
    next_id: u32,
}

impl InMemoryEquipment {
    pub fn new() -> Self {
        Self::default()
    }

    fn create(&mut self, stats: ItemStats) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.insert(id, stats);
        id
    }

    /// Creates an item and puts it in `slot`, replacing (and destroying)
    /// whatever was there.
    pub fn equip_new(&mut self, unit: UnitId, slot: EquipSlot, stats: ItemStats) -> ItemId {
        let id = self.create(stats);
        let replaced = self.inventories.entry(unit).or_default().slots.insert(slot, id);
        if let Some(old) = replaced {
            self.items.remove(&old);
        }
        id
    }

    /// Creates an item in the unit's pack.
    pub fn give(&mut self, unit: UnitId, stats: ItemStats) -> ItemId {
        let id = self.create(stats);
        self.inventories.entry(unit).or_default().pack.push(id);
        id
    }

    fn inventory_mut(&mut self, unit: UnitId) -> Result<&mut Inventory, OracleError> {
        self.inventories
            .get_mut(&unit)
            .ok_or(OracleError::UnknownUnit(unit))
    }

    fn slot_item(&self, unit: UnitId, slot: EquipSlot) -> Result<ItemId, OracleError> {
        self.equipped_item(unit, slot)
            .ok_or(OracleError::EmptySlot { unit, slot })
    }

    fn set_loaded(&mut self, unit: UnitId, slot: EquipSlot, loaded: bool) -> Result<(), OracleError> {
        let item = self.slot_item(unit, slot)?;
        if let Some(stats) = self.items.get_mut(&item) {
            stats.is_loaded = loaded;
        }
        Ok(())
    }
}

impl EquipmentOracle for InMemoryEquipment {
    fn equipped(&self, unit: UnitId, slot: EquipSlot) -> Option<ItemStats> {
        self.equipped_item(unit, slot)
            .and_then(|item| self.items.get(&item).copied())
    }

    fn carried(&self, unit: UnitId, item: ItemId) -> Option<ItemStats> {
        let inventory = self.inventories.get(&unit)?;
        if !inventory.holds(item) {
            return None;
        }
        self.items.get(&item).copied()
    }

    fn carried_weight(&self, unit: UnitId) -> f32 {
        let Some(inventory) = self.inventories.get(&unit) else {
            return 0.0;
        };
        inventory
            .slots
            .values()
            .chain(&inventory.pack)
            .filter_map(|item| self.items.get(item))
            .map(|stats| stats.weight)
            .sum()
    }

    fn equipped_item(&self, unit: UnitId, slot: EquipSlot) -> Option<ItemId> {
        self.inventories.get(&unit)?.slots.get(&slot).copied()
    }

    fn carried_items(&self, unit: UnitId) -> Vec<ItemId> {
        self.inventories
            .get(&unit)
            .map(|inventory| inventory.pack.clone())
            .unwrap_or_default()
    }
}

impl EquipmentStore for InMemoryEquipment {
    fn apply(&mut self, unit: UnitId, change: EquipmentChange) -> Result<(), OracleError> {
        match change {
            EquipmentChange::Equip { item, slot } => {
                let inventory = self.inventory_mut(unit)?;
                if inventory.slots.contains_key(&slot) {
                    return Err(OracleError::SlotOccupied { unit, slot });
                }
                if let Some(index) = inventory.pack.iter().position(|held| *held == item) {
                    inventory.pack.remove(index);
                } else if let Some(previous) = inventory.slot_of(item) {
                    inventory.slots.remove(&previous);
                } else {
                    return Err(OracleError::ItemNotCarried { unit, item });
                }
                inventory.slots.insert(slot, item);
            }
            EquipmentChange::Unequip { slot } => {
                let inventory = self.inventory_mut(unit)?;
                let item = inventory
                    .slots
                    .remove(&slot)
                    .ok_or(OracleError::EmptySlot { unit, slot })?;
                inventory.pack.push(item);
            }
            EquipmentChange::Reload { slot } => self.set_loaded(unit, slot, true)?,
            EquipmentChange::Discharge { slot } => self.set_loaded(unit, slot, false)?,
            EquipmentChange::Consume { item } => {
                let consumable = self
                    .items
                    .get(&item)
                    .is_some_and(|stats| stats.consumable.is_some());
                let inventory = self.inventory_mut(unit)?;
                let index = inventory
                    .pack
                    .iter()
                    .position(|held| *held == item)
                    .ok_or(OracleError::ItemNotCarried { unit, item })?;
                if !consumable {
                    return Err(OracleError::NotConsumable { item });
                }
                inventory.pack.remove(index);
                self.items.remove(&item);
            }
            EquipmentChange::SwapWeaponSets => {
                let inventory = self.inventory_mut(unit)?;
                for (active, alternate) in [
                    (EquipSlot::MainHand, EquipSlot::AlternateMainHand),
                    (EquipSlot::OffHand, EquipSlot::AlternateOffHand),
                ] {
                    let held = inventory.slots.remove(&active);
                    let spare = inventory.slots.remove(&alternate);
                    if let Some(item) = spare {
                        inventory.slots.insert(active, item);
                    }
                    if let Some(item) = held {
                        inventory.slots.insert(alternate, item);
                    }
                }
            }
        }
        tracing::trace!(%unit, ?change, "equipment changed");
        Ok(())
    }
}
