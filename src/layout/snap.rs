//! Grid snapping.

/// Round `value` to the nearest multiple of `grid_unit`.
///
/// Ties go to the even multiple (`15 -> 20`, `25 -> 20`, `-15 -> -20`).
/// Every coordinate and size goes through this one function, so neighbours
/// that were `gap` apart before snapping stay ordered after it.
///
/// A non-positive `grid_unit` disables snapping.
pub fn snap(value: i64, grid_unit: i64) -> i64 {
    if grid_unit <= 0 {
        return value;
    }

    let quotient = value.div_euclid(grid_unit);
    let twice_remainder = value.rem_euclid(grid_unit) * 2;

    let round_up = twice_remainder > grid_unit
        || (twice_remainder == grid_unit && quotient % 2 != 0);
    let rounded = if round_up { quotient + 1 } else { quotient };

    rounded * grid_unit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_multiples_unchanged() {
        assert_eq!(snap(0, 10), 0);
        assert_eq!(snap(40, 10), 40);
        assert_eq!(snap(1280, 10), 1280);
        assert_eq!(snap(-30, 10), -30);
    }

    #[test]
    fn test_rounds_to_nearest() {
        assert_eq!(snap(386, 10), 390);
        assert_eq!(snap(384, 10), 380);
        assert_eq!(snap(-3, 10), 0);
        assert_eq!(snap(-7, 10), -10);
    }

    #[test]
    fn test_ties_round_half_to_even() {
        assert_eq!(snap(5, 10), 0);
        assert_eq!(snap(15, 10), 20);
        assert_eq!(snap(25, 10), 20);
        assert_eq!(snap(35, 10), 40);
        assert_eq!(snap(-5, 10), 0);
        assert_eq!(snap(-15, 10), -20);
    }

    #[test]
    fn test_other_grid_units() {
        assert_eq!(snap(7, 4), 8);
        assert_eq!(snap(6, 4), 8);
        assert_eq!(snap(2, 4), 0);
        assert_eq!(snap(123, 1), 123);
    }

    #[test]
    fn test_non_positive_unit_is_identity() {
        assert_eq!(snap(123, 0), 123);
        assert_eq!(snap(123, -10), 123);
    }
}
