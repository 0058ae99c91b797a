//! Shield and weapon block chances and block power.

use crate::config::CombatTables;
use crate::env::WeaponType;

use super::Approach;

/// Inputs of a shield block roll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShieldBlockInputs {
    pub shield_skill: f32,
    pub block_bonus: f32,
    pub enemy_skill_modifier: f32,
    pub height: f32,
    /// Stance multiplier, e.g. a raised guard.
    pub stance: f32,
    pub approach: Approach,
}

/// `skill/100 * scale * block bonus * enemy skill modifier * height`, times
/// the stance bonus, halved from the side and impossible from behind.
pub fn shield_block_chance(inputs: &ShieldBlockInputs, tables: &CombatTables) -> f32 {
    let mut chance = inputs.shield_skill / 100.0
        * tables.skill_scale
        * inputs.block_bonus
        * inputs.enemy_skill_modifier
        * inputs.height
        * inputs.stance;
    match inputs.approach {
        Approach::Front => {}
        Approach::Flank => chance *= tables.flank_block_multiplier,
        Approach::Rear => return 0.0,
    }
    chance.clamp(0.0, tables.block_cap)
}

/// Inputs of a weapon block roll for one hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponBlockInputs {
    pub melee_skill: f32,
    pub weapon_type: WeaponType,
    pub enemy_skill_modifier: f32,
    pub height: f32,
    pub stance: f32,
    /// Dual-wield efficiency of the blocking hand (1.0 otherwise).
    pub efficiency: f32,
    pub shield_in_other_hand: bool,
    pub approach: Approach,
}

/// Same shape as the shield formula keyed off melee skill and the weapon
/// block table, halved when a shield already guards the other hand.
pub fn weapon_block_chance(inputs: &WeaponBlockInputs, tables: &CombatTables) -> f32 {
    let mut chance = inputs.melee_skill / 100.0
        * tables.skill_scale
        * tables.weapon_block.get(inputs.weapon_type)
        * inputs.enemy_skill_modifier
        * inputs.height
        * inputs.stance
        * inputs.efficiency;
    if inputs.shield_in_other_hand {
        chance *= tables.shield_in_other_hand;
    }
    match inputs.approach {
        Approach::Front => {}
        Approach::Flank => chance *= tables.flank_block_multiplier,
        Approach::Rear => return 0.0,
    }
    chance.clamp(0.0, tables.block_cap)
}

/// Damage absorbed by a successful block, scaled by the blocking hand's
/// efficiency.
pub fn block_power(item_block_power: u32, efficiency: f32) -> u32 {
    (item_block_power as f32 * efficiency).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shield(skill: f32) -> ShieldBlockInputs {
        ShieldBlockInputs {
            shield_skill: skill,
            block_bonus: 1.0,
            enemy_skill_modifier: 1.0,
            height: 1.0,
            stance: 1.0,
            approach: Approach::Front,
        }
    }

    #[test]
    fn frontal_shield_block_at_skill_fifty() {
        let tables = CombatTables::default();
        let chance = shield_block_chance(&shield(50.0), &tables);
        assert!((chance - 0.375).abs() < 1e-6);
    }

    #[test]
    fn raised_guard_doubles_and_flank_halves_shield_block() {
        let tables = CombatTables::default();
        let raised = shield_block_chance(
            &ShieldBlockInputs {
                stance: 2.0,
                ..shield(50.0)
            },
            &tables,
        );
        assert!((raised - 0.75).abs() < 1e-6);

        let beside = shield_block_chance(
            &ShieldBlockInputs {
                stance: 2.0,
                approach: Approach::Flank,
                ..shield(50.0)
            },
            &tables,
        );
        assert!((beside - 0.375).abs() < 1e-6);

        let behind = shield_block_chance(
            &ShieldBlockInputs {
                approach: Approach::Rear,
                ..shield(100.0)
            },
            &tables,
        );
        assert_eq!(behind, 0.0);
    }

    #[test]
    fn block_chances_respect_cap() {
        let tables = CombatTables::default();
        let chance = shield_block_chance(
            &ShieldBlockInputs {
                block_bonus: 10.0,
                stance: 2.0,
                ..shield(100.0)
            },
            &tables,
        );
        assert_eq!(chance, tables.block_cap);

        let weapon = weapon_block_chance(
            &WeaponBlockInputs {
                melee_skill: 1_000.0,
                weapon_type: WeaponType::TwoHandedSword,
                enemy_skill_modifier: 1.0,
                height: 5.0,
                stance: 1.5,
                efficiency: 1.0,
                shield_in_other_hand: false,
                approach: Approach::Front,
            },
            &tables,
        );
        assert_eq!(weapon, tables.block_cap);
    }

    #[test]
    fn weapon_block_follows_table_and_shield_penalty() {
        let tables = CombatTables::default();
        let base = WeaponBlockInputs {
            melee_skill: 80.0,
            weapon_type: WeaponType::Dagger,
            enemy_skill_modifier: 1.0,
            height: 1.0,
            stance: 1.0,
            efficiency: 1.0,
            shield_in_other_hand: false,
            approach: Approach::Front,
        };
        let dagger = weapon_block_chance(&base, &tables);
        let sword = weapon_block_chance(
            &WeaponBlockInputs {
                weapon_type: WeaponType::Sword,
                ..base
            },
            &tables,
        );
        let sword_with_shield = weapon_block_chance(
            &WeaponBlockInputs {
                weapon_type: WeaponType::Sword,
                shield_in_other_hand: true,
                ..base
            },
            &tables,
        );
        assert!(dagger < sword);
        assert!((sword_with_shield - sword * 0.5).abs() < 1e-6);
        assert!((dagger - 0.8 * 0.75 * 0.25).abs() < 1e-6);
    }

    #[test]
    fn block_power_uses_hand_efficiency() {
        assert_eq!(block_power(10, 0.8), 8);
        assert_eq!(block_power(10, 0.5), 5);
        assert_eq!(block_power(10, 1.0), 10);
    }
}
