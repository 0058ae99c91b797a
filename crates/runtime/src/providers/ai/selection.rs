//! Weighted random choice.

/// Index picked by a cumulative-weight draw.
///
/// Only positive values take part; `draw` is expected in
/// `[0, sum of positive values)`. With values `[10, 20, 30]` the ranges are
/// `[0, 10)`, `[10, 30)` and `[30, 60)`. Returns `None` when no value is
/// positive; a draw past the end picks the last positive candidate.
pub fn weighted_pick(values: &[f32], draw: f32) -> Option<usize> {
    let mut cumulative = 0.0;
    let mut last = None;
    for (index, value) in values.iter().enumerate() {
        if *value <= 0.0 {
            continue;
        }
        cumulative += value;
        last = Some(index);
        if draw < cumulative {
            return last;
        }
    }
    last
}

/// Sum of the positive values, the upper bound for a draw.
pub fn positive_total(values: &[f32]) -> f32 {
    values.iter().filter(|value| **value > 0.0).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_lands_in_cumulative_ranges() {
        let values = [10.0, 20.0, 30.0];
        assert_eq!(weighted_pick(&values, 0.0), Some(0));
        assert_eq!(weighted_pick(&values, 9.9), Some(0));
        assert_eq!(weighted_pick(&values, 10.0), Some(1));
        assert_eq!(weighted_pick(&values, 45.0), Some(2));
        assert_eq!(positive_total(&values), 60.0);
    }

    #[test]
    fn non_positive_candidates_never_win() {
        let values = [-1.0, 0.0, 5.0, -1.0];
        assert_eq!(weighted_pick(&values, 0.0), Some(2));
        assert_eq!(weighted_pick(&values, 100.0), Some(2));
        assert_eq!(weighted_pick(&[-1.0, 0.0], 0.0), None);
        assert_eq!(weighted_pick(&[], 0.0), None);
    }
}
