//! Approximate inference by stochastic simulation.
//!
//! Every sampler takes its random source as an argument, so a seeded
//! [`rand::rngs::StdRng`] gives reproducible posteriors:
//!
//! ```rust
//! use bn_core::network::{BayesianNetwork, Evidence, Variable};
//! use bn_core::sampling::likelihood_weighting;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut net = BayesianNetwork::new("coin");
//! net.add_variable(Variable::new("Heads").with_cpt([(0.5, 0.5)])).unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let p = likelihood_weighting("Heads", &Evidence::new(), &net, 1000, &mut rng).unwrap();
//! assert!((p.p_true().unwrap() - 0.5).abs() < 0.1);
//! ```

pub mod gibbs;
pub mod likelihood;
pub mod prior;

pub use gibbs::{gibbs_ask, gibbs_counts};
pub use likelihood::{likelihood_weighting, likelihood_weights, weighted_sample};
pub use prior::{consistent_with_evidence, prior_sample, rejection_counts, rejection_sampling};

use rand::Rng;

/// Draw `true` with probability `weight_true / (weight_true + weight_false)`.
///
/// When both weights are zero the draw is a fair coin.
pub(crate) fn draw<R: Rng + ?Sized>(rng: &mut R, weight_true: f64, weight_false: f64) -> bool {
    let total = weight_true + weight_false;
    if total.is_nan() || total <= 0.0 {
        return rng.random_bool(0.5);
    }
    rng.random::<f64>() * total < weight_true
}

/// Bucket index of a query value in a `[true, false]` tally.
pub(crate) fn slot(value: bool) -> usize {
    if value {
        0
    } else {
        1
    }
}
