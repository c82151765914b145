//! Prior sampling and rejection sampling.

use super::{draw, slot};
use crate::network::{BayesianNetwork, Evidence};
use crate::normalize::normalize;
use bn_common::{Error, Posterior, Result};
use rand::Rng;
use tracing::debug;

/// One complete assignment drawn from the network's joint distribution.
///
/// Variables are sampled in model order, each conditioned on the values
/// already drawn for its parents.
pub fn prior_sample<R: Rng + ?Sized>(network: &BayesianNetwork, rng: &mut R) -> Result<Evidence> {
    let mut sample = Evidence::with_capacity(network.len());
    for variable in network.variables() {
        let p_true = variable.probability_given(true, &sample)?;
        let p_false = variable.probability_given(false, &sample)?;
        let value = draw(rng, p_true, p_false);
        sample.insert(variable.name().to_string(), value);
    }
    Ok(sample)
}

/// Whether `sample` agrees with every observed value in `evidence`.
pub fn consistent_with_evidence(sample: &Evidence, evidence: &Evidence) -> bool {
    evidence
        .iter()
        .all(|(name, value)| sample.get(name) == Some(value))
}

/// Tally of the query over `samples` prior draws that survive the evidence.
pub fn rejection_counts<R: Rng + ?Sized>(
    query: &str,
    evidence: &Evidence,
    network: &BayesianNetwork,
    samples: usize,
    rng: &mut R,
) -> Result<[f64; 2]> {
    let evidence = network.conditioning_evidence(query, evidence)?;
    let mut counts = [0.0; 2];
    let mut accepted = 0usize;
    for _ in 0..samples {
        let sample = prior_sample(network, rng)?;
        if !consistent_with_evidence(&sample, &evidence) {
            continue;
        }
        let value = sample
            .get(query)
            .copied()
            .ok_or_else(|| Error::unknown_variable(query))?;
        counts[slot(value)] += 1.0;
        accepted += 1;
    }
    debug!(query, samples, accepted, "rejection sampling finished");
    Ok(counts)
}

/// Posterior of `query` estimated from `samples` prior draws.
///
/// Returns [`Posterior::InsufficientSamples`] when no draw matched the evidence.
pub fn rejection_sampling<R: Rng + ?Sized>(
    query: &str,
    evidence: &Evidence,
    network: &BayesianNetwork,
    samples: usize,
    rng: &mut R,
) -> Result<Posterior> {
    Ok(normalize(rejection_counts(query, evidence, network, samples, rng)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Variable;
    use rand::{rngs::StdRng, SeedableRng};

    fn chain() -> BayesianNetwork {
        let mut net = BayesianNetwork::new("chain");
        net.add_variable(Variable::new("A").with_cpt([(0.6, 0.4)]))
            .unwrap();
        net.add_variable(
            Variable::new("B")
                .with_parents(["A"])
                .with_cpt([(0.8, 0.2), (0.3, 0.7)]),
        )
        .unwrap();
        net
    }

    #[test]
    fn test_prior_sample_is_complete() {
        let net = chain();
        let mut rng = StdRng::seed_from_u64(11);
        let sample = prior_sample(&net, &mut rng).unwrap();
        assert_eq!(sample.len(), 2);
        assert!(sample.contains_key("A") && sample.contains_key("B"));
    }

    #[test]
    fn test_deterministic_cpt_is_respected() {
        let mut net = BayesianNetwork::new("fixed");
        net.add_variable(Variable::new("A").with_cpt([(1.0, 0.0)]))
            .unwrap();
        net.add_variable(
            Variable::new("B")
                .with_parents(["A"])
                .with_cpt([(0.0, 1.0), (1.0, 0.0)]),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let s = prior_sample(&net, &mut rng).unwrap();
            assert!(s["A"]);
            assert!(!s["B"]);
        }
    }

    #[test]
    fn test_consistency_check() {
        let sample: Evidence = [("A".to_string(), true), ("B".to_string(), false)]
            .into_iter()
            .collect();
        let agree: Evidence = [("A".to_string(), true)].into_iter().collect();
        let clash: Evidence = [("B".to_string(), true)].into_iter().collect();
        assert!(consistent_with_evidence(&sample, &Evidence::new()));
        assert!(consistent_with_evidence(&sample, &agree));
        assert!(!consistent_with_evidence(&sample, &clash));
    }

    #[test]
    fn test_impossible_evidence_is_insufficient() {
        let mut net = BayesianNetwork::new("never");
        net.add_variable(Variable::new("A").with_cpt([(1.0, 0.0)]))
            .unwrap();
        net.add_variable(
            Variable::new("B")
                .with_parents(["A"])
                .with_cpt([(0.5, 0.5), (0.5, 0.5)]),
        )
        .unwrap();
        let evidence: Evidence = [("A".to_string(), false)].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(9);
        let p = rejection_sampling("B", &evidence, &net, 200, &mut rng).unwrap();
        assert!(p.is_insufficient());
    }

    #[test]
    fn test_zero_samples_is_insufficient() {
        let mut rng = StdRng::seed_from_u64(0);
        let p = rejection_sampling("B", &Evidence::new(), &chain(), 0, &mut rng).unwrap();
        assert_eq!(p, Posterior::InsufficientSamples);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let net = chain();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            rejection_counts("B", &Evidence::new(), &net, 500, &mut rng).unwrap()
        };
        assert_eq!(run(42), run(42));
    }
}
