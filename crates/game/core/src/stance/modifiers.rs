/// Multiplicative stat bundle applied while a stance is raised.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatModifiers {
    pub damage: f32,
    pub dodge: f32,
    pub accuracy: f32,
    pub shield_block: f32,
    pub weapon_block: f32,
    pub move_cost: f32,
}

impl StatModifiers {
    pub const NEUTRAL: Self = Self {
        damage: 1.0,
        dodge: 1.0,
        accuracy: 1.0,
        shield_block: 1.0,
        weapon_block: 1.0,
        move_cost: 1.0,
    };

    /// Stacks two bundles.
    #[must_use]
    pub fn combine(self, other: StatModifiers) -> StatModifiers {
        StatModifiers {
            damage: self.damage * other.damage,
            dodge: self.dodge * other.dodge,
            accuracy: self.accuracy * other.accuracy,
            shield_block: self.shield_block * other.shield_block,
            weapon_block: self.weapon_block * other.weapon_block,
            move_cost: self.move_cost * other.move_cost,
        }
    }
}

impl Default for StatModifiers {
    fn default() -> Self {
        Self::NEUTRAL
    }
}
