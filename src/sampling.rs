//! Bounded random draws used by the "random sample" action.
//!
//! Values are drawn within one standard deviation of the mean, clamped to
//! the observed min/max, so generated samples look realistic.

use crate::api::FeatureRange;

/// Inclusive bounds for a random draw: `[max(min, mean-std), min(max, mean+std)]`.
pub fn draw_bounds(range: &FeatureRange) -> (f64, f64) {
    let low = range.min.max(range.mean - range.std);
    let high = range.max.min(range.mean + range.std);
    (low, high)
}

/// Map a unit draw in `[0,1)` onto the bounded band for `range`.
pub fn draw_within(range: &FeatureRange, unit: f64) -> f64 {
    let (low, high) = draw_bounds(range);
    low + unit * (high - low)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: f64, mean: f64, max: f64, std: f64) -> FeatureRange {
        FeatureRange {
            min,
            mean,
            max,
            std,
        }
    }

    #[test]
    fn bounds_clamp_to_observed_extremes() {
        // mean - std falls below min, mean + std above max.
        let r = range(10.0, 10.5, 11.0, 2.0);
        assert_eq!(draw_bounds(&r), (10.0, 11.0));
    }

    #[test]
    fn bounds_prefer_one_std_band_when_narrower() {
        let r = range(0.0, 5.0, 10.0, 1.5);
        assert_eq!(draw_bounds(&r), (3.5, 6.5));
    }

    #[test]
    fn draws_stay_within_bounds_for_any_unit() {
        let r = range(1.0, 2.0, 4.0, 0.75);
        let (low, high) = draw_bounds(&r);
        for step in 0..1000 {
            let unit = step as f64 / 1000.0;
            let value = draw_within(&r, unit);
            assert!(value >= low && value <= high, "unit {unit} escaped bounds");
        }
    }
}
