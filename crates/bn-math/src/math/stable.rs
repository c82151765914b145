//! Floating point comparison helpers.

/// Absolute-or-relative closeness check.
///
/// NaN only equals NaN; infinities compare by sign.
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

/// Total variation distance between two `[true, false]` distributions.
pub fn total_variation(p: [f64; 2], q: [f64; 2]) -> f64 {
    ((p[0] - q[0]).abs() + (p[1] - q[1]).abs()) / 2.0
}
