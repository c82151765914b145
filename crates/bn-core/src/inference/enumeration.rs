//! Inference by enumeration.
//!
//! Sums the full joint over every unobserved variable. Exponential in the
//! number of hidden variables, but simple enough to serve as the reference
//! the other methods are checked against.

use crate::network::{BayesianNetwork, Evidence, Variable};
use crate::normalize::normalize;
use bn_common::{Posterior, Result};
use tracing::trace;

/// Exact posterior of `query` given `evidence`, rounded to 3 places.
pub fn enumerate_ask(
    query: &str,
    evidence: &Evidence,
    network: &BayesianNetwork,
) -> Result<Posterior> {
    Ok(normalize(enumeration_weights(query, evidence, network)?))
}

/// Unnormalized `[P(query, e), P(!query, e)]`.
pub fn enumeration_weights(
    query: &str,
    evidence: &Evidence,
    network: &BayesianNetwork,
) -> Result<[f64; 2]> {
    let mut extended = network.conditioning_evidence(query, evidence)?;
    let mut weights = [0.0; 2];
    for (slot, value) in [true, false].into_iter().enumerate() {
        extended.insert(query.to_string(), value);
        weights[slot] = enumerate_all(network.variables(), &mut extended)?;
    }
    trace!(query, p_true = weights[0], p_false = weights[1], "enumeration weights");
    Ok(weights)
}

/// Sum of the joint over `variables`, with the values in `evidence` fixed.
///
/// `variables` must be in topological order. Branch values are inserted into
/// `evidence` while a branch is explored and removed afterwards, so the map is
/// unchanged when this returns.
pub fn enumerate_all(variables: &[Variable], evidence: &mut Evidence) -> Result<f64> {
    let Some((first, rest)) = variables.split_first() else {
        return Ok(1.0);
    };

    if let Some(&value) = evidence.get(first.name()) {
        let p = first.probability_given(value, evidence)?;
        return Ok(p * enumerate_all(rest, evidence)?);
    }

    let mut total = 0.0;
    for value in [true, false] {
        let p = first.probability_given(value, evidence)?;
        evidence.insert(first.name().to_string(), value);
        let branch = enumerate_all(rest, evidence);
        evidence.remove(first.name());
        total += p * branch?;
    }
    Ok(total)
}
