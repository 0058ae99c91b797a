//! Dodge and accuracy chances.
//!
//! All chances are probabilities in `[0, 1]`, clamped to their configured
//! caps. An event succeeds when a uniform roll in `[0, 1)` is below its
//! chance.

use crate::config::{CombatTables, EncumbranceRules};

use super::Approach;

/// How much an opponent's weapon skill suppresses one of our chances:
/// `1 - skill / 100 * efficiency * influence`.
///
/// `efficiency` is the opponent's dual-wield efficiency for the hand in use
/// (1.0 when not dual-wielding), so the multiplier is the same whether the
/// opponent is attacking or defending.
pub fn skill_modifier(opponent_skill: f32, efficiency: f32, tables: &CombatTables) -> f32 {
    (1.0 - opponent_skill / 100.0 * efficiency * tables.skill_influence).clamp(0.0, 1.0)
}

/// Penalty for carried weight relative to strength, in `[floor, 1]`.
pub fn encumbrance_penalty(carried_weight: f32, strength: f32, rules: &EncumbranceRules) -> f32 {
    let capacity = strength * rules.capacity_per_strength;
    if capacity <= 0.0 {
        return rules.floor;
    }
    (1.0 - rules.slope * carried_weight / capacity).clamp(rules.floor, 1.0)
}

/// Inputs of a dodge roll, all already expressed as multipliers except
/// agility.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DodgeInputs {
    pub agility: f32,
    pub encumbrance: f32,
    pub attacker_skill_modifier: f32,
    pub height: f32,
    pub stance: f32,
    pub approach: Approach,
}

/// `agility/100 * scale * encumbrance * attacker skill modifier * height`,
/// reduced when attacked from the side or behind, clamped to the dodge cap.
pub fn dodge_chance(inputs: &DodgeInputs, tables: &CombatTables) -> f32 {
    let mut chance = inputs.agility / 100.0
        * tables.skill_scale
        * inputs.encumbrance
        * inputs.attacker_skill_modifier
        * inputs.height
        * inputs.stance;
    if !inputs.approach.is_front() {
        chance *= tables.flank_dodge_multiplier;
    }
    chance.clamp(0.0, tables.dodge_cap)
}

/// `skill/100 * scale * item accuracy * height * action accuracy`, clamped
/// to the accuracy cap.
pub fn accuracy_chance(
    ranged_skill: f32,
    item_accuracy: f32,
    height: f32,
    action_accuracy: f32,
    tables: &CombatTables,
) -> f32 {
    let chance =
        ranged_skill / 100.0 * tables.skill_scale * item_accuracy * height * action_accuracy;
    chance.clamp(0.0, tables.accuracy_cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral(agility: f32) -> DodgeInputs {
        DodgeInputs {
            agility,
            encumbrance: 1.0,
            attacker_skill_modifier: 1.0,
            height: 1.0,
            stance: 1.0,
            approach: Approach::Front,
        }
    }

    #[test]
    fn dodge_scales_with_agility_and_halves_on_flank() {
        let tables = CombatTables::default();
        let front = dodge_chance(&neutral(60.0), &tables);
        assert!((front - 0.45).abs() < 1e-6);

        let flank = dodge_chance(
            &DodgeInputs {
                approach: Approach::Flank,
                ..neutral(60.0)
            },
            &tables,
        );
        assert!((flank - 0.225).abs() < 1e-6);
    }

    #[test]
    fn chances_stay_within_caps_for_extreme_inputs() {
        let tables = CombatTables::default();
        for agility in [-500.0, 0.0, 100.0, 10_000.0] {
            for height in [0.0, 1.0, 50.0] {
                let chance = dodge_chance(
                    &DodgeInputs {
                        height,
                        ..neutral(agility)
                    },
                    &tables,
                );
                assert!((0.0..=0.85).contains(&chance));

                let accuracy = accuracy_chance(agility, 3.0, height, 2.0, &tables);
                assert!((0.0..=0.90).contains(&accuracy));
            }
        }
    }

    #[test]
    fn skill_modifier_halves_at_master_skill() {
        let tables = CombatTables::default();
        assert_eq!(skill_modifier(0.0, 1.0, &tables), 1.0);
        assert!((skill_modifier(100.0, 1.0, &tables) - 0.5).abs() < 1e-6);
        assert!((skill_modifier(100.0, 0.5, &tables) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn encumbrance_penalty_is_bounded() {
        let rules = EncumbranceRules::default();
        assert_eq!(encumbrance_penalty(0.0, 50.0, &rules), 1.0);
        assert!((encumbrance_penalty(75.0, 50.0, &rules) - 0.5).abs() < 1e-6);
        assert_eq!(encumbrance_penalty(1_000.0, 50.0, &rules), rules.floor);
        assert_eq!(encumbrance_penalty(1.0, 0.0, &rules), rules.floor);
    }
}
