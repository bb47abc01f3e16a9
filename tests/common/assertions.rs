//! Assertion utilities for testing.
//!
//! Floating-point comparisons and checks on contour level sequences.

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Assert that two floating-point values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert that levels are strictly increasing with a constant step.
///
/// # Panics
///
/// Panics if there are fewer than two levels or the spacing varies.
pub fn assert_evenly_spaced(levels: &[f64]) {
    assert!(levels.len() >= 2, "Need at least two levels, got {:?}", levels);

    let step = levels[1] - levels[0];
    assert!(step > 0.0, "Levels not increasing: {:?}", levels);

    for (i, w) in levels.windows(2).enumerate() {
        let diff = w[1] - w[0];
        assert!(
            (diff - step).abs() <= step * 1e-6,
            "Uneven spacing at index {}: {} vs {} in {:?}",
            i,
            diff,
            step,
            levels
        );
    }
}

/// Assert that levels are symmetric about zero.
pub fn assert_symmetric(levels: &[f64]) {
    let (first, last) = match (levels.first(), levels.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => panic!("No levels"),
    };
    assert_approx_eq(first, -last, Some(1e-6));
}

/// Assert that every value lies within `[min, max]`.
pub fn assert_all_in_range(values: &[f64], min: f64, max: f64) {
    for v in values {
        assert!(
            *v >= min && *v <= max,
            "Value not in range: actual = {}, min = {}, max = {}",
            v,
            min,
            max
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_evenly_spaced() {
        assert_evenly_spaced(&[-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_evenly_spaced(&[0.1, 0.2, 0.3]);
    }

    #[test]
    #[should_panic]
    fn test_uneven_levels_panic() {
        assert_evenly_spaced(&[0.0, 1.0, 3.0]);
    }

    #[test]
    fn test_assert_symmetric() {
        assert_symmetric(&[-2.0, 0.0, 2.0]);
    }
}
