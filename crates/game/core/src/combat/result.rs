//! Attack resolution: hit determination, block determination, damage.

use std::collections::BTreeMap;

use rand::Rng;

use crate::config::{CombatTables, StanceTable};
use crate::env::{EquipmentOracle, Hand, ItemStats, Loadout};
use crate::stance::StatModifiers;
use crate::state::{Direction, Position, Skills, Unit, UnitId};

use super::block::{
    ShieldBlockInputs, WeaponBlockInputs, block_power, shield_block_chance, weapon_block_chance,
};
use super::damage::{blocked_damage, raw_damage};
use super::geometry::{Approach, approach, height_modifier};
use super::hit::{DodgeInputs, accuracy_chance, dodge_chance, encumbrance_penalty, skill_modifier};

/// Everything combat math needs to know about one unit, captured once per
/// attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Combatant {
    pub unit: UnitId,
    pub position: Position,
    pub facing: Direction,
    pub elevation: i32,
    pub agility: f32,
    pub strength: f32,
    pub skills: Skills,
    pub carried_weight: f32,
    pub loadout: Loadout,
    /// Combined bundle of every raised stance.
    pub modifiers: StatModifiers,
}

impl Combatant {
    pub fn capture(
        unit: &Unit,
        equipment: &(impl EquipmentOracle + ?Sized),
        stances: &StanceTable,
    ) -> Self {
        Self {
            unit: unit.id,
            position: unit.position,
            facing: unit.facing,
            elevation: unit.elevation,
            agility: unit.attributes.agility,
            strength: unit.attributes.strength,
            skills: unit.skills,
            carried_weight: equipment.carried_weight(unit.id),
            loadout: Loadout::read(equipment, unit.id),
            modifiers: unit.stances.modifiers(stances),
        }
    }

    /// Dual-wield efficiency of `hand`, 1.0 unless both hands hold melee
    /// weapons.
    pub fn efficiency(&self, hand: Hand, tables: &CombatTables) -> f32 {
        if !self.loadout.is_dual_wielding() {
            return 1.0;
        }
        match hand {
            Hand::Primary => tables.dual_wield.primary,
            Hand::Secondary => tables.dual_wield.secondary,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackKind {
    Melee,
    Ranged,
}

/// Attacker-side state shared by every target of one attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackContext {
    pub attacker: Combatant,
    pub kind: AttackKind,
    pub hand: Hand,
    pub weapon: Option<ItemStats>,
    pub efficiency: f32,
    pub raw_damage: u32,
    /// Skill modifier the attacker imposes on the defenders' chances.
    pub pressure: f32,
    /// Outcome of the single accuracy roll of a ranged attack. Always true
    /// for melee.
    pub on_target: bool,
}

impl AttackContext {
    /// Melee swing with the first hand holding a melee weapon, or bare fists.
    pub fn melee(attacker: Combatant, tables: &CombatTables) -> Self {
        let (hand, weapon) = attacker
            .loadout
            .melee_weapons()
            .next()
            .map_or((Hand::Primary, None), |(hand, item)| (hand, Some(item)));
        let efficiency = attacker.efficiency(hand, tables);
        let base = weapon.map_or(tables.unarmed_damage, |item| item.damage);
        Self {
            attacker,
            kind: AttackKind::Melee,
            hand,
            weapon,
            efficiency,
            raw_damage: raw_damage(base, efficiency, attacker.modifiers.damage),
            pressure: skill_modifier(attacker.skills.melee, efficiency, tables),
            on_target: true,
        }
    }

    /// Ranged shot at `primary`. The accuracy roll is made once here and
    /// shared by every target.
    pub fn ranged(
        attacker: Combatant,
        primary: &Combatant,
        accuracy_roll: f32,
        tables: &CombatTables,
    ) -> Self {
        let (hand, weapon) = attacker
            .loadout
            .ranged_weapon()
            .map_or((Hand::Primary, None), |(hand, item)| (hand, Some(item)));
        let item_accuracy = weapon.map_or(1.0, |item| item.accuracy_modifier);
        let height = height_modifier(attacker.elevation, primary.elevation, tables.height_step);
        let chance = accuracy_chance(
            attacker.skills.ranged,
            item_accuracy,
            height,
            attacker.modifiers.accuracy,
            tables,
        );
        let base = weapon.map_or(0, |item| item.damage);
        Self {
            attacker,
            kind: AttackKind::Ranged,
            hand,
            weapon,
            efficiency: 1.0,
            raw_damage: raw_damage(base, 1.0, attacker.modifiers.damage),
            pressure: skill_modifier(attacker.skills.ranged, 1.0, tables),
            on_target: accuracy_roll < chance,
        }
    }
}

/// Uniform rolls in `[0, 1)` used by one defender.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenseRolls {
    pub dodge: f32,
    pub shield: f32,
    pub primary: f32,
    pub secondary: f32,
}

impl DefenseRolls {
    /// Rolls that never succeed; useful to force a clean hit.
    pub const NONE: Self = Self {
        dodge: 1.0,
        shield: 1.0,
        primary: 1.0,
        secondary: 1.0,
    };

    pub fn draw(rng: &mut (impl Rng + ?Sized)) -> Self {
        Self {
            dodge: rng.gen_range(0.0..1.0),
            shield: rng.gen_range(0.0..1.0),
            primary: rng.gen_range(0.0..1.0),
            secondary: rng.gen_range(0.0..1.0),
        }
    }

    fn weapon(&self, hand: Hand) -> f32 {
        match hand {
            Hand::Primary => self.primary,
            Hand::Secondary => self.secondary,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockSource {
    Shield,
    Weapon,
}

/// Item that stopped (part of) a blow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Blocker {
    pub hand: Hand,
    pub source: BlockSource,
    pub power: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Defense {
    /// The ranged accuracy roll failed.
    Missed,
    Dodged,
    Blocked(Blocker),
    Unblocked,
}

/// Result of one attack against one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetOutcome {
    pub target: UnitId,
    pub approach: Approach,
    pub defense: Defense,
    pub damage: u32,
}

impl TargetOutcome {
    pub fn blocker(&self) -> Option<Blocker> {
        match self.defense {
            Defense::Blocked(blocker) => Some(blocker),
            _ => None,
        }
    }
}

/// Transient mapping of defender to the item used to block, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetResolutionMap(BTreeMap<UnitId, Option<Blocker>>);

impl TargetResolutionMap {
    pub fn record(&mut self, outcome: &TargetOutcome) {
        self.0.insert(outcome.target, outcome.blocker());
    }

    pub fn blocker(&self, target: UnitId) -> Option<Blocker> {
        self.0.get(&target).copied().flatten()
    }

    pub fn contains(&self, target: UnitId) -> bool {
        self.0.contains_key(&target)
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitId, Option<Blocker>)> + '_ {
        self.0.iter().map(|(id, blocker)| (*id, *blocker))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Everything presentation learns about a resolved attack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackReport {
    pub attacker: UnitId,
    pub kind: AttackKind,
    pub hand: Hand,
    pub targets: Vec<TargetOutcome>,
    pub blocked: TargetResolutionMap,
}

impl AttackReport {
    pub fn new(context: &AttackContext) -> Self {
        Self {
            attacker: context.attacker.unit,
            kind: context.kind,
            hand: context.hand,
            targets: Vec::new(),
            blocked: TargetResolutionMap::default(),
        }
    }

    pub fn push(&mut self, outcome: TargetOutcome) {
        self.blocked.record(&outcome);
        self.targets.push(outcome);
    }

    pub fn total_damage(&self) -> u32 {
        self.targets.iter().map(|outcome| outcome.damage).sum()
    }
}

/// Resolves one target of an attack.
///
/// Ranged attacks first need the shared accuracy roll to be on target. Every
/// attack then goes dodge, shield, each weapon hand. Rear attacks are never
/// blocked.
pub fn resolve_target(
    context: &AttackContext,
    defender: &Combatant,
    rolls: DefenseRolls,
    tables: &CombatTables,
) -> TargetOutcome {
    let attacker = &context.attacker;
    let approach = approach(defender.position, defender.facing, attacker.position);
    let height = height_modifier(defender.elevation, attacker.elevation, tables.height_step);
    let outcome = |defense, damage| TargetOutcome {
        target: defender.unit,
        approach,
        defense,
        damage,
    };

    if !context.on_target {
        return outcome(Defense::Missed, 0);
    }

    let dodge = dodge_chance(
        &DodgeInputs {
            agility: defender.agility,
            encumbrance: encumbrance_penalty(
                defender.carried_weight,
                defender.strength,
                &tables.encumbrance,
            ),
            attacker_skill_modifier: context.pressure,
            height,
            stance: defender.modifiers.dodge,
            approach,
        },
        tables,
    );
    if rolls.dodge < dodge {
        return outcome(Defense::Dodged, 0);
    }

    if let Some((hand, shield)) = defender.loadout.shield() {
        let chance = shield_block_chance(
            &ShieldBlockInputs {
                shield_skill: defender.skills.shield,
                block_bonus: shield.block_bonus,
                enemy_skill_modifier: context.pressure,
                height,
                stance: defender.modifiers.shield_block,
                approach,
            },
            tables,
        );
        if rolls.shield < chance {
            let blocker = Blocker {
                hand,
                source: BlockSource::Shield,
                power: block_power(shield.block_power, 1.0),
            };
            return outcome(
                Defense::Blocked(blocker),
                blocked_damage(context.raw_damage, blocker.power),
            );
        }
    }

    for (hand, weapon) in defender.loadout.melee_weapons() {
        let efficiency = defender.efficiency(hand, tables);
        let chance = weapon_block_chance(
            &WeaponBlockInputs {
                melee_skill: defender.skills.melee,
                weapon_type: weapon.weapon_type,
                enemy_skill_modifier: context.pressure,
                height,
                stance: defender.modifiers.weapon_block,
                efficiency,
                shield_in_other_hand: defender
                    .loadout
                    .hand(hand.other())
                    .is_some_and(|item| item.is_shield()),
                approach,
            },
            tables,
        );
        if rolls.weapon(hand) < chance {
            let blocker = Blocker {
                hand,
                source: BlockSource::Weapon,
                power: block_power(weapon.block_power, efficiency),
            };
            return outcome(
                Defense::Blocked(blocker),
                blocked_damage(context.raw_damage, blocker.power),
            );
        }
    }

    outcome(Defense::Unblocked, context.raw_damage)
}
