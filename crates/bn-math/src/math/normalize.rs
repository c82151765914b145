//! Turning raw tallies into a two-outcome distribution.

/// Decimal places reported by default.
pub const DEFAULT_PRECISION: u32 = 3;

/// Largest precision that still changes an `f64` after rounding.
pub const MAX_PRECISION: u32 = 15;

/// Round `value` to `places` decimal places (half away from zero).
///
/// Non-finite inputs are returned unchanged.
pub fn round_to(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(places.min(MAX_PRECISION) as i32);
    (value * scale).round() / scale
}

/// Normalize a `[true, false]` pair of non-negative weights.
///
/// Returns `None` when the total is exactly zero, i.e. neither outcome was
/// ever observed or weighted. With `places = Some(p)` each share is rounded
/// to `p` decimals; `None` leaves the shares unrounded.
pub fn normalize_pair(weights: [f64; 2], places: Option<u32>) -> Option<[f64; 2]> {
    let total = weights[0] + weights[1];
    if total == 0.0 || !total.is_finite() {
        return None;
    }
    let shares = [weights[0] / total, weights[1] / total];
    Some(match places {
        Some(p) => [round_to(shares[0], p), round_to(shares[1], p)],
        None => shares,
    })
}
