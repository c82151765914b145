//! Property-based tests for bn-math primitives.

use bn_math::{approx_eq, boolean_assignments, normalize_pair, round_to};
use proptest::prelude::*;
use std::collections::HashSet;

const TOL: f64 = 1e-12;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Unrounded shares always sum to one.
    #[test]
    fn normalized_shares_sum_to_one(a in 0.0..1e6f64, b in 0.0..1e6f64) {
        prop_assume!(a + b > 0.0);
        let shares = normalize_pair([a, b], None).unwrap();
        prop_assert!(approx_eq(shares[0] + shares[1], 1.0, TOL), "{:?}", shares);
        prop_assert!(shares.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    /// Scaling both weights leaves the distribution unchanged.
    #[test]
    fn normalization_is_scale_invariant(a in 0.001..1e3f64, b in 0.001..1e3f64, k in 0.001..1e3f64) {
        let base = normalize_pair([a, b], None).unwrap();
        let scaled = normalize_pair([a * k, b * k], None).unwrap();
        prop_assert!(approx_eq(base[0], scaled[0], 1e-9));
        prop_assert!(approx_eq(base[1], scaled[1], 1e-9));
    }

    /// Rounded shares stay within half a unit of the last place.
    #[test]
    fn rounding_error_is_bounded(x in 0.0..1.0f64, places in 0u32..8) {
        let rounded = round_to(x, places);
        let half_ulp = 0.5 * 10f64.powi(-(places as i32));
        prop_assert!((rounded - x).abs() <= half_ulp + 1e-12);
    }

    /// Rounding twice is the same as rounding once.
    #[test]
    fn rounding_is_idempotent(x in -10.0..10.0f64, places in 0u32..8) {
        let once = round_to(x, places);
        prop_assert_eq!(round_to(once, places), once);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Every one of the 2^n vectors appears exactly once.
    #[test]
    fn assignments_are_exhaustive(n in 0usize..12) {
        let rows: Vec<Vec<bool>> = boolean_assignments(n).collect();
        prop_assert_eq!(rows.len(), 1usize << n);
        let unique: HashSet<&Vec<bool>> = rows.iter().collect();
        prop_assert_eq!(unique.len(), rows.len());
    }
}
