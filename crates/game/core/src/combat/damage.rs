//! Damage calculation and application.

/// Raw damage of a strike before blocking.
///
/// ```text
/// raw = round(base * efficiency * stance)
/// ```
pub fn raw_damage(base: u32, efficiency: f32, stance: f32) -> u32 {
    (base as f32 * efficiency * stance).round().max(0.0) as u32
}

/// Damage left after a block: `max(0, raw - power)`.
pub fn blocked_damage(raw: u32, power: u32) -> u32 {
    raw.saturating_sub(power)
}

/// Applies damage to current health, clamped to 0.
pub fn apply_damage(current: u32, damage: u32) -> u32 {
    current.saturating_sub(damage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_never_heals() {
        assert_eq!(blocked_damage(10, 4), 6);
        assert_eq!(blocked_damage(3, 8), 0);
    }

    #[test]
    fn raw_damage_applies_efficiency_and_stance() {
        assert_eq!(raw_damage(10, 1.0, 1.0), 10);
        assert_eq!(raw_damage(10, 0.8, 1.5), 12);
        assert_eq!(raw_damage(7, 0.5, 1.0), 4);
    }

    #[test]
    fn apply_damage_clamps_at_zero() {
        assert_eq!(apply_damage(5, 9), 0);
        assert_eq!(apply_damage(9, 5), 4);
    }
}
