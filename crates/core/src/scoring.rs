//! Scoring module - row-clear points, level progression, and gravity speed
//!
//! Row clears compound within a single sweep: the k-th row removed in one sweep is
//! worth `k * 100`, so one sweep of 3 rows scores 100 + 200 + 300 = 600.

use crate::types::{
    BASE_DROP_MS, DROP_INTERVAL_FLOOR_MS, DROP_STEP_MS, HARD_DROP_POINTS_PER_ROW,
    LINES_PER_LEVEL, LINE_CLEAR_UNIT,
};

/// Points for removing `rows` rows in one sweep
pub fn sweep_score(rows: u32) -> u32 {
    (1..=rows).map(|k| k * LINE_CLEAR_UNIT).sum()
}

/// Hard drop bonus for a drop of `distance` steps
pub fn hard_drop_score(distance: u32) -> u32 {
    distance * HARD_DROP_POINTS_PER_ROW
}

/// Level increases every 10 lines cleared
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL
}

/// Gravity interval for a level in milliseconds
///
/// `1000 - level * 100`, floored at [`DROP_INTERVAL_FLOOR_MS`] so the interval
/// never reaches zero.
pub fn get_drop_interval_ms(level: u32) -> u32 {
    BASE_DROP_MS
        .saturating_sub(level.saturating_mul(DROP_STEP_MS))
        .max(DROP_INTERVAL_FLOOR_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_scores_compound() {
        assert_eq!(sweep_score(0), 0);
        assert_eq!(sweep_score(1), 100);
        assert_eq!(sweep_score(2), 300);
        assert_eq!(sweep_score(3), 600);
        assert_eq!(sweep_score(4), 1000);
    }

    #[test]
    fn test_hard_drop_score() {
        assert_eq!(hard_drop_score(0), 0);
        assert_eq!(hard_drop_score(19), 38);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(calculate_level(0), 0);
        assert_eq!(calculate_level(9), 0);
        assert_eq!(calculate_level(10), 1);
        assert_eq!(calculate_level(29), 2);
        assert_eq!(calculate_level(100), 10);
    }

    #[test]
    fn test_drop_intervals() {
        assert_eq!(get_drop_interval_ms(0), 1000);
        assert_eq!(get_drop_interval_ms(1), 900);
        assert_eq!(get_drop_interval_ms(8), 200);
        assert_eq!(get_drop_interval_ms(9), 100);
        assert_eq!(get_drop_interval_ms(10), 100); // would be 0 unclamped
        assert_eq!(get_drop_interval_ms(50), 100);
        assert_eq!(get_drop_interval_ms(u32::MAX), 100);
    }
}
