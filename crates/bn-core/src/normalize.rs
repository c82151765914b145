//! Terminal normalization step shared by every inference method.

use bn_common::Posterior;
use bn_math::{normalize_pair, DEFAULT_PRECISION};

/// Normalize `[true, false]` weights, rounding each share to 3 decimals.
pub fn normalize(weights: [f64; 2]) -> Posterior {
    normalize_with_precision(weights, Some(DEFAULT_PRECISION))
}

/// Normalize with an explicit rounding precision (`None` = unrounded).
pub fn normalize_with_precision(weights: [f64; 2], precision: Option<u32>) -> Posterior {
    match normalize_pair(weights, precision) {
        Some(pair) => Posterior::from_pair(pair),
        None => Posterior::InsufficientSamples,
    }
}
