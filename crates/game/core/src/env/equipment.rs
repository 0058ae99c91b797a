//! Equipment collaborator.
//!
//! Inventory modelling lives outside the engine. The engine only reads the
//! stat block of whatever is equipped and asks the store to commit the few
//! changes actions make (equip, unequip, reload, consume, swap sets).

use std::fmt;

use crate::state::UnitId;

use super::OracleError;

/// Identifier of a concrete item instance owned by the equipment collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Equipment slots the engine reasons about.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EquipSlot {
    MainHand,
    OffHand,
    AlternateMainHand,
    AlternateOffHand,
}

/// The two hands of the active weapon set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Hand {
    Primary,
    Secondary,
}

impl Hand {
    pub const fn slot(self) -> EquipSlot {
        match self {
            Hand::Primary => EquipSlot::MainHand,
            Hand::Secondary => EquipSlot::OffHand,
        }
    }

    pub const fn other(self) -> Hand {
        match self {
            Hand::Primary => Hand::Secondary,
            Hand::Secondary => Hand::Primary,
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WeaponType {
    #[default]
    Unarmed,
    Dagger,
    Mace,
    Axe,
    Sword,
    Spear,
    Polearm,
    TwoHandedAxe,
    TwoHandedSword,
    Bow,
    Crossbow,
}

impl WeaponType {
    pub const fn is_ranged(self) -> bool {
        matches!(self, WeaponType::Bow | WeaponType::Crossbow)
    }

    pub const fn is_melee(self) -> bool {
        !self.is_ranged()
    }

    /// Reach weapons strike two cells away.
    pub const fn has_reach(self) -> bool {
        matches!(self, WeaponType::Spear | WeaponType::Polearm)
    }

    /// Sweeping weapons hit every enemy adjacent to both attacker and target.
    pub const fn sweeps(self) -> bool {
        matches!(self, WeaponType::TwoHandedAxe)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemCategory {
    Weapon,
    Shield,
    Consumable,
    #[default]
    Other,
}

/// Effect applied when a consumable is used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsumableEffect {
    pub heal: u32,
    pub energy: u32,
}

/// Stat block of an item as seen by the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemStats {
    pub category: ItemCategory,
    pub weight: f32,
    pub weapon_type: WeaponType,
    pub damage: u32,
    pub block_power: u32,
    /// Inclusive attack range in cells.
    pub min_range: u32,
    pub max_range: u32,
    pub accuracy_modifier: f32,
    pub block_bonus: f32,
    pub is_two_handed: bool,
    pub is_loaded: bool,
    pub consumable: Option<ConsumableEffect>,
}

impl ItemStats {
    pub fn weapon(weapon_type: WeaponType, damage: u32, weight: f32) -> Self {
        let max_range = if weapon_type.has_reach() { 2 } else { 1 };
        Self {
            category: ItemCategory::Weapon,
            weight,
            weapon_type,
            damage,
            block_power: damage / 2,
            max_range,
            is_two_handed: matches!(
                weapon_type,
                WeaponType::TwoHandedAxe
                    | WeaponType::TwoHandedSword
                    | WeaponType::Polearm
                    | WeaponType::Bow
            ),
            ..Self::default()
        }
    }

    pub fn ranged(weapon_type: WeaponType, damage: u32, max_range: u32) -> Self {
        Self {
            min_range: 2,
            max_range,
            is_loaded: true,
            ..Self::weapon(weapon_type, damage, 2.0)
        }
    }

    pub fn shield(block_bonus: f32, block_power: u32, weight: f32) -> Self {
        Self {
            category: ItemCategory::Shield,
            weight,
            block_bonus,
            block_power,
            ..Self::default()
        }
    }

    pub fn consumable(effect: ConsumableEffect) -> Self {
        Self {
            category: ItemCategory::Consumable,
            weight: 0.5,
            consumable: Some(effect),
            ..Self::default()
        }
    }

    pub fn with_block_power(mut self, block_power: u32) -> Self {
        self.block_power = block_power;
        self
    }

    pub fn with_accuracy(mut self, accuracy_modifier: f32) -> Self {
        self.accuracy_modifier = accuracy_modifier;
        self
    }

    pub fn is_weapon(&self) -> bool {
        self.category == ItemCategory::Weapon
    }

    pub fn is_shield(&self) -> bool {
        self.category == ItemCategory::Shield
    }

    pub fn is_melee_weapon(&self) -> bool {
        self.is_weapon() && self.weapon_type.is_melee()
    }

    pub fn is_ranged_weapon(&self) -> bool {
        self.is_weapon() && self.weapon_type.is_ranged()
    }

    /// Returns true if `distance` lies inside the inclusive attack range.
    pub fn in_range(&self, distance: u32) -> bool {
        distance >= self.min_range.max(1) && distance <= self.max_range.max(1)
    }
}

impl Default for ItemStats {
    fn default() -> Self {
        Self {
            category: ItemCategory::Other,
            weight: 0.0,
            weapon_type: WeaponType::Unarmed,
            damage: 0,
            block_power: 0,
            min_range: 1,
            max_range: 1,
            accuracy_modifier: 1.0,
            block_bonus: 1.0,
            is_two_handed: false,
            is_loaded: false,
            consumable: None,
        }
    }
}

/// Mutation requested by an executed action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipmentChange {
    Equip { item: ItemId, slot: EquipSlot },
    Unequip { slot: EquipSlot },
    Reload { slot: EquipSlot },
    Discharge { slot: EquipSlot },
    Consume { item: ItemId },
    SwapWeaponSets,
}

/// Read access to equipment stat blocks.
pub trait EquipmentOracle {
    /// Stat block of the item equipped in `slot`, if any.
    fn equipped(&self, unit: UnitId, slot: EquipSlot) -> Option<ItemStats>;

    /// Stat block of a carried (not necessarily equipped) item.
    fn carried(&self, unit: UnitId, item: ItemId) -> Option<ItemStats>;

    /// Total carried weight, used for encumbrance.
    fn carried_weight(&self, unit: UnitId) -> f32;

    /// Identifier of the item equipped in `slot`, if any.
    fn equipped_item(&self, unit: UnitId, slot: EquipSlot) -> Option<ItemId>;

    /// Items carried but not equipped.
    fn carried_items(&self, unit: UnitId) -> Vec<ItemId>;
}

/// Equipment collaborator that also accepts mutations.
pub trait EquipmentStore: EquipmentOracle {
    fn apply(&mut self, unit: UnitId, change: EquipmentChange) -> Result<(), OracleError>;
}

/// Convenience view over the active weapon set of one unit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Loadout {
    pub primary: Option<ItemStats>,
    pub secondary: Option<ItemStats>,
    pub alternate_primary: Option<ItemStats>,
    pub alternate_secondary: Option<ItemStats>,
}

impl Loadout {
    pub fn read(equipment: &(impl EquipmentOracle + ?Sized), unit: UnitId) -> Self {
        Self {
            primary: equipment.equipped(unit, EquipSlot::MainHand),
            secondary: equipment.equipped(unit, EquipSlot::OffHand),
            alternate_primary: equipment.equipped(unit, EquipSlot::AlternateMainHand),
            alternate_secondary: equipment.equipped(unit, EquipSlot::AlternateOffHand),
        }
    }

    pub fn hand(&self, hand: Hand) -> Option<ItemStats> {
        match hand {
            Hand::Primary => self.primary,
            Hand::Secondary => self.secondary,
        }
    }

    pub fn shield(&self) -> Option<(Hand, ItemStats)> {
        [Hand::Secondary, Hand::Primary]
            .into_iter()
            .find_map(|hand| self.hand(hand).filter(|item| item.is_shield()).map(|item| (hand, item)))
    }

    /// Melee weapons held in the active set, primary hand first.
    pub fn melee_weapons(&self) -> impl Iterator<Item = (Hand, ItemStats)> + '_ {
        [Hand::Primary, Hand::Secondary]
            .into_iter()
            .filter_map(|hand| self.hand(hand).filter(|item| item.is_melee_weapon()).map(|item| (hand, item)))
    }

    pub fn ranged_weapon(&self) -> Option<(Hand, ItemStats)> {
        [Hand::Primary, Hand::Secondary]
            .into_iter()
            .find_map(|hand| self.hand(hand).filter(|item| item.is_ranged_weapon()).map(|item| (hand, item)))
    }

    pub fn is_dual_wielding(&self) -> bool {
        self.melee_weapons().count() == 2
    }

    pub fn has_melee_option(&self) -> bool {
        self.melee_weapons().next().is_some()
    }

    pub fn alternate_has_melee(&self) -> bool {
        [self.alternate_primary, self.alternate_secondary]
            .into_iter()
            .flatten()
            .any(|item| item.is_melee_weapon())
    }

    pub fn has_alternate_set(&self) -> bool {
        self.alternate_primary.is_some() || self.alternate_secondary.is_some()
    }
}
