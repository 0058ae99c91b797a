//! Balance tables and tunable parameters.
//!
//! Every constant the rules depend on lives here so encounters can be
//! rebalanced from data files without touching the engine. Defaults are the
//! reference tuning; `skirmish-content` loads overrides from TOML.

use crate::env::WeaponType;
use crate::stance::{StanceKind, StatModifiers};

/// Complete rules configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub ap: ApRules,
    pub costs: ActionCosts,
    pub combat: CombatTables,
    pub stances: StanceTable,
    pub ai: AiTuning,
    pub perception: PerceptionRules,
    /// Planner decisions an autonomous unit may make in one turn before the
    /// driver ends its turn.
    pub max_decisions_per_turn: u32,
}

impl GameConfig {
    pub const DEFAULT_MAX_DECISIONS_PER_TURN: u32 = 8;

    pub fn new() -> Self {
        Self {
            ap: ApRules::default(),
            costs: ActionCosts::default(),
            combat: CombatTables::default(),
            stances: StanceTable::default(),
            ai: AiTuning::default(),
            perception: PerceptionRules::default(),
            max_decisions_per_turn: Self::DEFAULT_MAX_DECISIONS_PER_TURN,
        }
    }

    /// Maximum AP for a unit with the given speed: `round(speed * ap_per_speed)`.
    pub fn max_ap(&self, speed: f32) -> u32 {
        (speed * self.ap.ap_per_speed).round().max(0.0) as u32
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Resource rules
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ApRules {
    pub ap_per_speed: f32,
    pub max_energy: u32,
    pub energy_regen_per_tick: u32,
}

impl Default for ApRules {
    fn default() -> Self {
        Self {
            ap_per_speed: 3.0,
            max_energy: 100,
            energy_regen_per_tick: 10,
        }
    }
}

/// Base AP prices per action kind.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActionCosts {
    pub move_per_cell: u32,
    pub turn: u32,
    pub melee_base: u32,
    pub ranged_base: u32,
    pub reload: u32,
    pub equip_base: u32,
    pub unequip_base: u32,
    /// Extra AP per unit of item weight for attacks and (un)equipping.
    pub per_weight: f32,
    pub consume: u32,
    pub swap_weapon_set: u32,
    pub interact: u32,
    pub sneak_multiplier: f32,
    pub run_multiplier: f32,
}

impl Default for ActionCosts {
    fn default() -> Self {
        Self {
            move_per_cell: 5,
            turn: 2,
            melee_base: 15,
            ranged_base: 20,
            reload: 15,
            equip_base: 10,
            unequip_base: 5,
            per_weight: 1.0,
            consume: 10,
            swap_weapon_set: 8,
            interact: 10,
            sneak_multiplier: 1.5,
            run_multiplier: 0.8,
        }
    }
}

// ============================================================================
// Combat tables
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatTables {
    /// Scale applied to `skill / 100` in every chance formula.
    pub skill_scale: f32,
    pub dodge_cap: f32,
    pub block_cap: f32,
    pub accuracy_cap: f32,
    /// Chance multiplier change per unit of elevation difference.
    pub height_step: f32,
    pub flank_dodge_multiplier: f32,
    pub flank_block_multiplier: f32,
    /// Weapon block multiplier when a shield occupies the other hand.
    pub shield_in_other_hand: f32,
    /// How strongly the opponent's weapon skill suppresses a chance.
    /// Skill 100 with influence 0.5 halves it.
    pub skill_influence: f32,
    pub dual_wield: DualWieldEfficiency,
    pub weapon_block: WeaponBlockTable,
    pub encumbrance: EncumbranceRules,
    pub unarmed_damage: u32,
}

impl Default for CombatTables {
    fn default() -> Self {
        Self {
            skill_scale: 0.75,
            dodge_cap: 0.85,
            block_cap: 0.85,
            accuracy_cap: 0.90,
            height_step: 0.1,
            flank_dodge_multiplier: 0.5,
            flank_block_multiplier: 0.5,
            shield_in_other_hand: 0.5,
            skill_influence: 0.5,
            dual_wield: DualWieldEfficiency::default(),
            weapon_block: WeaponBlockTable::default(),
            encumbrance: EncumbranceRules::default(),
            unarmed_damage: 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DualWieldEfficiency {
    pub primary: f32,
    pub secondary: f32,
}

impl Default for DualWieldEfficiency {
    fn default() -> Self {
        Self {
            primary: 0.8,
            secondary: 0.5,
        }
    }
}

/// Weapon-type block modifiers, dagger weakest and two-handed sword strongest.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeaponBlockTable {
    pub dagger: f32,
    pub mace: f32,
    pub axe: f32,
    pub spear: f32,
    pub polearm: f32,
    pub sword: f32,
    pub two_handed_axe: f32,
    pub two_handed_sword: f32,
}

impl WeaponBlockTable {
    pub fn get(&self, weapon: WeaponType) -> f32 {
        match weapon {
            WeaponType::Unarmed | WeaponType::Bow | WeaponType::Crossbow => 0.0,
            WeaponType::Dagger => self.dagger,
            WeaponType::Mace => self.mace,
            WeaponType::Axe => self.axe,
            WeaponType::Spear => self.spear,
            WeaponType::Polearm => self.polearm,
            WeaponType::Sword => self.sword,
            WeaponType::TwoHandedAxe => self.two_handed_axe,
            WeaponType::TwoHandedSword => self.two_handed_sword,
        }
    }
}

impl Default for WeaponBlockTable {
    fn default() -> Self {
        Self {
            dagger: 0.25,
            mace: 0.45,
            axe: 0.5,
            spear: 0.6,
            polearm: 0.65,
            sword: 0.7,
            two_handed_axe: 0.8,
            two_handed_sword: 1.0,
        }
    }
}

/// Carried weight against strength: `penalty = 1 - slope * weight / (strength * capacity)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncumbranceRules {
    pub capacity_per_strength: f32,
    pub slope: f32,
    pub floor: f32,
}

impl Default for EncumbranceRules {
    fn default() -> Self {
        Self {
            capacity_per_strength: 1.5,
            slope: 0.5,
            floor: 0.25,
        }
    }
}

// ============================================================================
// Stances
// ============================================================================

/// Per-stance prices, upkeep and modifier bundle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StanceProfile {
    pub activation_ap: u32,
    pub energy_per_tick: u32,
    /// Probability an autonomous unit considers switching into this stance
    /// on a planner step.
    pub npc_switch_chance: f32,
    /// Whether a successful block with the stanced item lowers the stance.
    pub lowers_on_block: bool,
    pub modifiers: StatModifiers,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StanceTable {
    pub raised_guard: StanceProfile,
    pub braced_polearm: StanceProfile,
    pub two_handed_grip: StanceProfile,
}

impl StanceTable {
    pub fn get(&self, kind: StanceKind) -> &StanceProfile {
        match kind {
            StanceKind::RaisedGuard => &self.raised_guard,
            StanceKind::BracedPolearm => &self.braced_polearm,
            StanceKind::TwoHandedGrip => &self.two_handed_grip,
        }
    }
}

impl Default for StanceTable {
    fn default() -> Self {
        Self {
            raised_guard: StanceProfile {
                activation_ap: 10,
                energy_per_tick: 5,
                npc_switch_chance: 0.3,
                lowers_on_block: true,
                modifiers: StatModifiers {
                    shield_block: 2.0,
                    dodge: 0.8,
                    move_cost: 1.5,
                    ..StatModifiers::NEUTRAL
                },
            },
            braced_polearm: StanceProfile {
                activation_ap: 15,
                energy_per_tick: 4,
                npc_switch_chance: 0.2,
                lowers_on_block: false,
                modifiers: StatModifiers {
                    damage: 1.5,
                    dodge: 0.5,
                    move_cost: 2.0,
                    ..StatModifiers::NEUTRAL
                },
            },
            two_handed_grip: StanceProfile {
                activation_ap: 5,
                energy_per_tick: 2,
                npc_switch_chance: 0.25,
                lowers_on_block: false,
                modifiers: StatModifiers {
                    damage: 1.25,
                    weapon_block: 1.5,
                    ..StatModifiers::NEUTRAL
                },
            },
        }
    }
}

// ============================================================================
// Planner tuning
// ============================================================================

/// Behavior costs and attack valuation used by the goal planner.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiTuning {
    /// Cost at or above which a behavior is considered not applicable.
    pub not_applicable: f32,
    pub fight_cost: f32,
    pub switch_stance_cost: f32,
    pub inspect_sound_cost: f32,
    pub follow_cost: f32,
    pub patrol_cost: f32,
    pub wander_cost: f32,
    pub idle_cost: f32,
    pub enemy_value: f32,
    pub locked_target_bonus: f32,
    /// Fraction of `enemy_value` removed at full target health.
    pub health_weight: f32,
    pub invalid_value: f32,
    pub flee_distance: u32,
    pub flee_band: u32,
    pub flee_retarget_closing: u32,
    pub follow_distance: u32,
    pub wander_radius: u32,
    pub wander_limit: u32,
    pub search_turns: u32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            not_applicable: 100.0,
            fight_cost: 1.0,
            switch_stance_cost: 0.5,
            inspect_sound_cost: 30.0,
            follow_cost: 40.0,
            patrol_cost: 50.0,
            wander_cost: 60.0,
            idle_cost: 90.0,
            enemy_value: 70.0,
            locked_target_bonus: 15.0,
            health_weight: 0.5,
            invalid_value: -1.0,
            flee_distance: 10,
            flee_band: 15,
            flee_retarget_closing: 2,
            follow_distance: 2,
            wander_radius: 4,
            wander_limit: 3,
            search_turns: 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PerceptionRules {
    pub vision_range: u32,
    pub hearing_range: u32,
}

impl Default for PerceptionRules {
    fn default() -> Self {
        Self {
            vision_range: 12,
            hearing_range: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_ap_rounds_speed_times_three() {
        let config = GameConfig::default();
        assert_eq!(config.max_ap(20.0), 60);
        assert_eq!(config.max_ap(10.5), 32);
        assert_eq!(config.max_ap(0.0), 0);
    }

    #[test]
    fn weapon_block_table_orders_dagger_below_two_handed_sword() {
        let table = WeaponBlockTable::default();
        assert!(table.get(WeaponType::Dagger) < table.get(WeaponType::Sword));
        assert!(table.get(WeaponType::Sword) < table.get(WeaponType::TwoHandedSword));
        assert_eq!(table.get(WeaponType::Bow), 0.0);
    }
}
