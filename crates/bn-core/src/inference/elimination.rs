//! Variable elimination.
//!
//! One factor is built per variable against the caller's evidence. Factors
//! are then folded in reverse model order: each step multiplies the next
//! factor into the running product and, when that factor's variable is hidden
//! (neither observed nor the query), sums it out straight away.
//!
//! The order is a fixed heuristic, not a minimum-width ordering.

use crate::factor::{make_factor, point_wise_product, sum_out};
use crate::network::{BayesianNetwork, Evidence};
use crate::normalize::normalize;
use bn_common::{Error, Posterior, Result};
use tracing::trace;

/// Exact posterior of `query` given `evidence`, rounded to 3 places.
pub fn elimination_ask(
    query: &str,
    evidence: &Evidence,
    network: &BayesianNetwork,
) -> Result<Posterior> {
    Ok(normalize(elimination_weights(query, evidence, network)?))
}

/// Unnormalized `[P(query, e), P(!query, e)]`.
pub fn elimination_weights(
    query: &str,
    evidence: &Evidence,
    network: &BayesianNetwork,
) -> Result<[f64; 2]> {
    let evidence = network.conditioning_evidence(query, evidence)?;
    let is_hidden = |name: &str| name != query && !evidence.contains_key(name);

    let mut pending = network.variables().iter().rev();
    let last = pending
        .next()
        .ok_or_else(|| Error::unknown_variable(query))?;
    let factor = make_factor(last, &evidence)?;
    let mut product = if is_hidden(last.name()) {
        sum_out(last.name(), &factor)
    } else {
        factor
    };

    for variable in pending {
        let factor = make_factor(variable, &evidence)?;
        product = point_wise_product(&factor, &product);
        if is_hidden(variable.name()) {
            product = sum_out(variable.name(), &product);
        }
        trace!(
            variable = variable.name(),
            rows = product.len(),
            hidden = product.hidden().len(),
            "folded factor"
        );
    }

    let read = |value| {
        product
            .probability_of(query, value)
            .ok_or_else(|| Error::unknown_variable(query))
    };
    Ok([read(true)?, read(false)?])
}
