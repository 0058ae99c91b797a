//! Relative position of attacker and defender.

use crate::state::{Direction, Position};

/// Side of the defender the attack comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Approach {
    /// Within one octant of the defender's facing.
    Front,
    /// Beside the defender.
    Flank,
    /// Behind the defender; cannot be blocked.
    Rear,
}

impl Approach {
    pub fn is_front(self) -> bool {
        self == Approach::Front
    }
}

/// Classifies where `attacker` stands relative to a defender at `defender`
/// looking towards `facing`. Overlapping cells count as frontal.
pub fn approach(defender: Position, facing: Direction, attacker: Position) -> Approach {
    let Some(towards_attacker) = defender.direction_to(attacker) else {
        return Approach::Front;
    };
    match facing.octant_distance(towards_attacker) {
        0 | 1 => Approach::Front,
        2 => Approach::Flank,
        _ => Approach::Rear,
    }
}

/// Elevation advantage: `1 + step * (own - other)`, never negative.
pub fn height_modifier(own: i32, other: i32, step: f32) -> f32 {
    (1.0 + step * (own - other) as f32).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approach_follows_defender_facing() {
        let defender = Position::new(0, 0);
        let facing = Direction::East;

        assert_eq!(approach(defender, facing, Position::new(1, 0)), Approach::Front);
        assert_eq!(approach(defender, facing, Position::new(1, 1)), Approach::Front);
        assert_eq!(approach(defender, facing, Position::new(0, 1)), Approach::Flank);
        assert_eq!(approach(defender, facing, Position::new(0, -1)), Approach::Flank);
        assert_eq!(approach(defender, facing, Position::new(-1, 1)), Approach::Rear);
        assert_eq!(approach(defender, facing, Position::new(-1, 0)), Approach::Rear);
    }

    #[test]
    fn height_modifier_rewards_high_ground() {
        assert_eq!(height_modifier(0, 0, 0.1), 1.0);
        assert!((height_modifier(2, 0, 0.1) - 1.2).abs() < 1e-6);
        assert!((height_modifier(0, 3, 0.1) - 0.7).abs() < 1e-6);
        assert_eq!(height_modifier(0, 20, 0.1), 0.0);
    }
}
