//! Gibbs sampling.
//!
//! Evidence stays fixed and every other variable starts from a fair coin.
//! Each sweep visits the hidden variables in model order and redraws each one
//! from its distribution given its Markov blanket:
//!
//! ```text
//! P(x | blanket) ∝ P(x | parents(x)) · Π P(c | parents(c))   for c in children(x)
//! ```
//!
//! The query's current value is tallied after every single-variable update,
//! so `sweeps` sweeps produce `sweeps × |hidden|` tallies.

use super::{draw, slot};
use crate::network::{BayesianNetwork, Evidence, Variable};
use crate::normalize::normalize;
use bn_common::{Error, Posterior, Result};
use rand::Rng;
use tracing::debug;

/// A hidden variable together with the children its blanket weight needs.
struct Blanket<'a> {
    variable: &'a Variable,
    children: Vec<&'a Variable>,
}

impl Blanket<'_> {
    /// Unnormalized weight of `value` with the rest of `state` held fixed.
    ///
    /// Leaves `value` assigned in `state`.
    fn weight(&self, value: bool, state: &mut Evidence) -> Result<f64> {
        state.insert(self.variable.name().to_string(), value);
        let mut weight = self.variable.probability_given(value, state)?;
        for child in &self.children {
            let child_value = state
                .get(child.name())
                .copied()
                .ok_or_else(|| Error::unknown_variable(child.name()))?;
            weight *= child.probability_given(child_value, state)?;
        }
        Ok(weight)
    }
}

/// Query tallies after `sweeps` Gibbs sweeps.
pub fn gibbs_counts<R: Rng + ?Sized>(
    query: &str,
    evidence: &Evidence,
    network: &BayesianNetwork,
    sweeps: usize,
    rng: &mut R,
) -> Result<[f64; 2]> {
    let evidence = network.conditioning_evidence(query, evidence)?;

    let mut state = evidence.clone();
    let mut blankets = Vec::new();
    for variable in network.variables() {
        if evidence.contains_key(variable.name()) {
            continue;
        }
        state.insert(variable.name().to_string(), rng.random_bool(0.5));
        blankets.push(Blanket {
            variable,
            children: network.children_of(variable.name())?,
        });
    }

    let mut counts = [0.0; 2];
    for _ in 0..sweeps {
        for blanket in &blankets {
            let weight_true = blanket.weight(true, &mut state)?;
            let weight_false = blanket.weight(false, &mut state)?;
            let value = draw(rng, weight_true, weight_false);
            state.insert(blanket.variable.name().to_string(), value);

            let current = state
                .get(query)
                .copied()
                .ok_or_else(|| Error::unknown_variable(query))?;
            counts[slot(current)] += 1.0;
        }
    }
    debug!(
        query,
        sweeps,
        hidden = blankets.len(),
        tallies = counts[0] + counts[1],
        "gibbs sampling finished"
    );
    Ok(counts)
}

/// Posterior of `query` estimated from `sweeps` Gibbs sweeps.
pub fn gibbs_ask<R: Rng + ?Sized>(
    query: &str,
    evidence: &Evidence,
    network: &BayesianNetwork,
    sweeps: usize,
    rng: &mut R,
) -> Result<Posterior> {
    Ok(normalize(gibbs_counts(query, evidence, network, sweeps, rng)?))
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_tallies_every_update() {
        let mut rng = StdRng::seed_from_u64(1);
        let counts = gibbs_counts("B", &Evidence::new(), &chain(), 25, &mut rng).unwrap();
        assert_eq!(counts[0] + counts[1], 50.0);

        let evidence: Evidence = [("A".to_string(), true)].into_iter().collect();
        let counts = gibbs_counts("B", &evidence, &chain(), 25, &mut rng).unwrap();
        assert_eq!(counts[0] + counts[1], 25.0);
    }

    #[test]
    fn test_blanket_weight_includes_children() {
        let net = chain();
        let blanket = Blanket {
            variable: net.variable("A").unwrap(),
            children: net.children_of("A").unwrap(),
        };
        let mut state: Evidence = [("A".to_string(), false), ("B".to_string(), true)]
            .into_iter()
            .collect();
        let w = blanket.weight(true, &mut state).unwrap();
        assert!((w - 0.6 * 0.8).abs() < 1e-12);
        let w = blanket.weight(false, &mut state).unwrap();
        assert!((w - 0.4 * 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_parent_given_child_estimate() {
        let net = chain();
        let evidence: Evidence = [("B".to_string(), true)].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(21);
        let p = gibbs_ask("A", &evidence, &net, 10_000, &mut rng).unwrap();
        assert!((p.p_true().unwrap() - 0.8).abs() < 0.05, "{p}");
    }

    #[test]
    fn test_zero_sweeps_is_insufficient() {
        let mut rng = StdRng::seed_from_u64(0);
        let p = gibbs_ask("A", &Evidence::new(), &chain(), 0, &mut rng).unwrap();
        assert!(p.is_insufficient());
    }
}
