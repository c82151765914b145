//! Seeded convergence checks: every sampler should approach the exact
//! posterior as the sample count grows.

use bn_core::inference::enumerate_ask;
use bn_core::loader::load_str;
use bn_core::sampling::{gibbs_ask, likelihood_weighting, rejection_sampling};
use bn_core::{BayesianNetwork, Evidence, Posterior, Result};
use bn_math::total_variation;
use rand::rngs::StdRng;
use rand::SeedableRng;

const SEED: u64 = 0x5eed_2024;

/// Sample counts paired with the largest allowed deviation from the exact
/// answer.
const SCHEDULE: [(usize, f64); 3] = [(100, 0.25), (1_000, 0.1), (10_000, 0.05)];

type Sampler = fn(&str, &Evidence, &BayesianNetwork, usize, &mut StdRng) -> Result<Posterior>;

fn samplers() -> [(&'static str, Sampler); 3] {
    [
        ("rejection", rejection_sampling::<StdRng>),
        ("likelihood", likelihood_weighting::<StdRng>),
        ("gibbs", gibbs_ask::<StdRng>),
    ]
}

fn sprinkler() -> BayesianNetwork {
    load_str(include_str!("fixtures/sprinkler.xml")).unwrap()
}

fn chain() -> BayesianNetwork {
    load_str(include_str!("fixtures/chain.xml")).unwrap()
}

fn evidence(pairs: &[(&str, bool)]) -> Evidence {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn assert_converges(network: &BayesianNetwork, query: &str, evidence: &Evidence, exact: f64) {
    for (name, sampler) in samplers() {
        for (samples, tolerance) in SCHEDULE {
            let mut rng = StdRng::seed_from_u64(SEED);
            let posterior = sampler(query, evidence, network, samples, &mut rng).unwrap();
            let estimate = posterior
                .as_pair()
                .unwrap_or_else(|| panic!("{name} with {samples} samples had no support"));
            let distance = total_variation(estimate, [exact, 1.0 - exact]);
            assert!(
                distance <= tolerance,
                "{name} with {samples} samples: {estimate:?} is {distance} from {exact}"
            );
        }
    }
}

#[test]
fn sprinkler_rain_given_wet_grass() {
    let network = sprinkler();
    let evidence = evidence(&[("WetGrass", true)]);
    let exact = enumerate_ask("Rain", &evidence, &network)
        .unwrap()
        .p_true()
        .unwrap();
    assert!((exact - 0.708).abs() < 1e-9, "exact answer moved: {exact}");
    assert_converges(&network, "Rain", &evidence, exact);
}

#[test]
fn sprinkler_cloudy_given_sprinkler_and_wet_grass() {
    let network = sprinkler();
    let evidence = evidence(&[("Sprinkler", true), ("WetGrass", true)]);
    let exact = enumerate_ask("Cloudy", &evidence, &network)
        .unwrap()
        .p_true()
        .unwrap();
    assert_converges(&network, "Cloudy", &evidence, exact);
}

#[test]
fn chain_child_given_parent() {
    let network = chain();
    assert_converges(&network, "B", &evidence(&[("A", true)]), 0.8);
}

#[test]
fn chain_marginal_without_evidence() {
    let network = chain();
    assert_converges(&network, "B", &Evidence::new(), 0.6);
}

#[test]
fn same_seed_same_answer() {
    let network = sprinkler();
    let evidence = evidence(&[("WetGrass", true)]);
    for (name, sampler) in samplers() {
        let first = sampler("Rain", &evidence, &network, 500, &mut StdRng::seed_from_u64(7)).unwrap();
        let second = sampler("Rain", &evidence, &network, 500, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second, "{name} is not reproducible");
    }
}

#[test]
fn impossible_evidence_starves_rejection_only() {
    let mut network = chain();
    // A is certain, so A=false can never be drawn.
    network.variable_mut("A").unwrap().set_cpt(vec![(1.0, 0.0).into()]);
    let evidence = evidence(&[("A", false)]);

    let mut rng = StdRng::seed_from_u64(SEED);
    let rejected = rejection_sampling("B", &evidence, &network, 1_000, &mut rng).unwrap();
    assert_eq!(rejected, Posterior::InsufficientSamples);

    // Likelihood weighting fixes A=false and gives every sample weight 0.
    let weighted = likelihood_weighting("B", &evidence, &network, 1_000, &mut rng).unwrap();
    assert!(weighted.is_insufficient());
}
