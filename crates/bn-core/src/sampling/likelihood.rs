//! Likelihood weighting.
//!
//! Evidence variables are clamped to their observed value and multiply the
//! sample weight by their conditional probability; every other variable is
//! drawn as in prior sampling.

use super::{draw, slot};
use crate::network::{BayesianNetwork, Evidence};
use crate::normalize::normalize;
use bn_common::{Error, Posterior, Result};
use rand::Rng;
use tracing::debug;

/// One sample consistent with `evidence`, with its likelihood weight.
pub fn weighted_sample<R: Rng + ?Sized>(
    network: &BayesianNetwork,
    evidence: &Evidence,
    rng: &mut R,
) -> Result<(Evidence, f64)> {
    let mut sample = Evidence::with_capacity(network.len());
    let mut weight = 1.0;
    for variable in network.variables() {
        let value = match evidence.get(variable.name()) {
            Some(&observed) => {
                weight *= variable.probability_given(observed, &sample)?;
                observed
            }
            None => {
                let p_true = variable.probability_given(true, &sample)?;
                let p_false = variable.probability_given(false, &sample)?;
                draw(rng, p_true, p_false)
            }
        };
        sample.insert(variable.name().to_string(), value);
    }
    Ok((sample, weight))
}

/// Total sample weight per query value after `samples` weighted draws.
pub fn likelihood_weights<R: Rng + ?Sized>(
    query: &str,
    evidence: &Evidence,
    network: &BayesianNetwork,
    samples: usize,
    rng: &mut R,
) -> Result<[f64; 2]> {
    let evidence = network.conditioning_evidence(query, evidence)?;
    let mut weights = [0.0; 2];
    for _ in 0..samples {
        let (sample, weight) = weighted_sample(network, &evidence, rng)?;
        let value = sample
            .get(query)
            .copied()
            .ok_or_else(|| Error::unknown_variable(query))?;
        weights[slot(value)] += weight;
    }
    debug!(
        query,
        samples,
        total_weight = weights[0] + weights[1],
        "likelihood weighting finished"
    );
    Ok(weights)
}

/// Posterior of `query` estimated from `samples` weighted draws.
pub fn likelihood_weighting<R: Rng + ?Sized>(
    query: &str,
    evidence: &Evidence,
    network: &BayesianNetwork,
    samples: usize,
    rng: &mut R,
) -> Result<Posterior> {
    Ok(normalize(likelihood_weights(query, evidence, network, samples, rng)?))
}
