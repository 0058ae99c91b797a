//! Stance controller.
//!
//! A stance is raised on the item held in one hand. While raised it applies
//! the modifier bundle configured for its kind and registers an energy drain
//! in the unit's ledger; lowering it removes both. Each hand holds at most one
//! stance, so raising a stance replaces whatever that hand had before.
mod modifiers;

pub use modifiers::StatModifiers;

use crate::config::StanceTable;
use crate::env::{Hand, Loadout};
use crate::ledger::{EnergyDrain, ResourceLedger};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StanceKind {
    /// Shield held high: much better shield blocks, slower feet.
    RaisedGuard,
    /// Reach weapon set against a charge.
    BracedPolearm,
    /// Both hands on one weapon.
    TwoHandedGrip,
}

impl StanceKind {
    /// Hand holding an item that can take this stance, if any.
    pub fn hand_in(self, loadout: &Loadout) -> Option<Hand> {
        match self {
            StanceKind::RaisedGuard => loadout.shield().map(|(hand, _)| hand),
            StanceKind::BracedPolearm => loadout
                .melee_weapons()
                .find(|(_, item)| item.weapon_type.has_reach())
                .map(|(hand, _)| hand),
            StanceKind::TwoHandedGrip => loadout
                .melee_weapons()
                .find(|(hand, item)| item.is_two_handed || loadout.hand(hand.other()).is_none())
                .map(|(hand, _)| hand),
        }
    }
}

/// Result of a stance toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StanceChange {
    Raised { hand: Hand, kind: StanceKind },
    Lowered { hand: Hand, kind: StanceKind },
}

/// Stances currently raised, per hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StanceState {
    primary: Option<StanceKind>,
    secondary: Option<StanceKind>,
}

impl StanceState {
    pub fn get(&self, hand: Hand) -> Option<StanceKind> {
        match hand {
            Hand::Primary => self.primary,
            Hand::Secondary => self.secondary,
        }
    }

    fn slot_mut(&mut self, hand: Hand) -> &mut Option<StanceKind> {
        match hand {
            Hand::Primary => &mut self.primary,
            Hand::Secondary => &mut self.secondary,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Hand, StanceKind)> {
        [(Hand::Primary, self.primary), (Hand::Secondary, self.secondary)]
            .into_iter()
            .filter_map(|(hand, kind)| kind.map(|kind| (hand, kind)))
    }

    pub fn hand_of(&self, kind: StanceKind) -> Option<Hand> {
        self.iter().find(|(_, active)| *active == kind).map(|(hand, _)| hand)
    }

    pub fn is_active(&self, kind: StanceKind) -> bool {
        self.hand_of(kind).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.secondary.is_none()
    }

    /// Product of the modifier bundles of every raised stance.
    pub fn modifiers(&self, table: &StanceTable) -> StatModifiers {
        self.iter().fold(StatModifiers::NEUTRAL, |acc, (_, kind)| {
            acc.combine(table.get(kind).modifiers)
        })
    }

    /// Raises `kind` on `hand` and registers its drain.
    pub fn raise(
        &mut self,
        ledger: &mut ResourceLedger,
        hand: Hand,
        kind: StanceKind,
        table: &StanceTable,
    ) -> StanceChange {
        *self.slot_mut(hand) = Some(kind);
        ledger.register_drain(EnergyDrain {
            hand,
            stance: kind,
            cost: table.get(kind).energy_per_tick,
        });
        tracing::debug!(%hand, %kind, "stance raised");
        StanceChange::Raised { hand, kind }
    }

    /// Lowers whatever stance `hand` holds and unregisters its drain.
    pub fn lower(&mut self, ledger: &mut ResourceLedger, hand: Hand) -> Option<StanceChange> {
        let kind = self.slot_mut(hand).take()?;
        ledger.unregister_drain(hand);
        tracing::debug!(%hand, %kind, "stance lowered");
        Some(StanceChange::Lowered { hand, kind })
    }

    pub fn lower_all(&mut self, ledger: &mut ResourceLedger) -> Vec<StanceChange> {
        [Hand::Primary, Hand::Secondary]
            .into_iter()
            .filter_map(|hand| self.lower(ledger, hand))
            .collect()
    }

    /// Toggles `kind` on `hand`: lowers it if already raised there, raises it
    /// otherwise.
    pub fn switch(
        &mut self,
        ledger: &mut ResourceLedger,
        hand: Hand,
        kind: StanceKind,
        table: &StanceTable,
    ) -> StanceChange {
        if self.get(hand) == Some(kind)
            && let Some(change) = self.lower(ledger, hand)
        {
            return change;
        }
        self.raise(ledger, hand, kind, table)
    }

    /// Drops a stance whose drain the ledger cancelled, without touching the
    /// ledger again.
    pub fn forget(&mut self, hand: Hand) -> Option<StanceKind> {
        self.slot_mut(hand).take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ItemStats, WeaponType};

    #[test]
    fn switch_toggles_and_tracks_drain() {
        let table = StanceTable::default();
        let mut ledger = ResourceLedger::new(60, 100);
        let mut stances = StanceState::default();

        let raised = stances.switch(&mut ledger, Hand::Secondary, StanceKind::RaisedGuard, &table);
        assert_eq!(
            raised,
            StanceChange::Raised {
                hand: Hand::Secondary,
                kind: StanceKind::RaisedGuard
            }
        );
        assert!(stances.is_active(StanceKind::RaisedGuard));
        assert_eq!(ledger.drains().len(), 1);
        assert_eq!(stances.modifiers(&table).shield_block, 2.0);

        stances.switch(&mut ledger, Hand::Secondary, StanceKind::RaisedGuard, &table);
        assert!(stances.is_empty());
        assert!(ledger.drains().is_empty());
        assert_eq!(stances.modifiers(&table), StatModifiers::NEUTRAL);
    }

    #[test]
    fn raising_in_occupied_hand_replaces_stance() {
        let table = StanceTable::default();
        let mut ledger = ResourceLedger::new(60, 100);
        let mut stances = StanceState::default();

        stances.raise(&mut ledger, Hand::Primary, StanceKind::BracedPolearm, &table);
        stances.raise(&mut ledger, Hand::Primary, StanceKind::TwoHandedGrip, &table);

        assert!(!stances.is_active(StanceKind::BracedPolearm));
        assert_eq!(stances.get(Hand::Primary), Some(StanceKind::TwoHandedGrip));
        assert_eq!(ledger.drains().len(), 1);
        assert_eq!(
            ledger.drains()[0].cost,
            table.two_handed_grip.energy_per_tick
        );
    }

    #[test]
    fn stance_requires_matching_item() {
        let guard = Loadout {
            primary: Some(ItemStats::weapon(WeaponType::Sword, 6, 3.0)),
            secondary: Some(ItemStats::shield(1.0, 4, 5.0)),
            ..Loadout::default()
        };
        assert_eq!(StanceKind::RaisedGuard.hand_in(&guard), Some(Hand::Secondary));
        assert_eq!(StanceKind::BracedPolearm.hand_in(&guard), None);
        assert_eq!(StanceKind::TwoHandedGrip.hand_in(&guard), None);

        let spear = Loadout {
            primary: Some(ItemStats::weapon(WeaponType::Spear, 7, 3.0)),
            ..Loadout::default()
        };
        assert_eq!(StanceKind::BracedPolearm.hand_in(&spear), Some(Hand::Primary));
        assert_eq!(StanceKind::TwoHandedGrip.hand_in(&spear), Some(Hand::Primary));
    }
}
