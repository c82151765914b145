//! Single entry point over all inference methods.
//!
//! [`Engine::infer`] checks the network, the query and the evidence before
//! any method runs, so structural problems surface as errors and never as a
//! half-computed posterior.

use crate::config::InferenceConfig;
use crate::inference::{elimination_weights, enumeration_weights};
use crate::network::{BayesianNetwork, Evidence};
use crate::normalize::normalize_with_precision;
use crate::sampling::{gibbs_counts, likelihood_weights, rejection_counts};
use bn_common::{Posterior, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

/// Inference method.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Exact: sum the joint over every hidden variable.
    #[default]
    Enumeration,
    /// Exact: variable elimination in reverse model order.
    Elimination,
    /// Approximate: discard prior samples that contradict the evidence.
    Rejection,
    /// Approximate: clamp evidence and weight each sample by its likelihood.
    #[serde(alias = "likelihood")]
    #[value(alias = "likelihood")]
    LikelihoodWeighting,
    /// Approximate: Markov chain over the hidden variables.
    Gibbs,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Enumeration,
        Method::Elimination,
        Method::Rejection,
        Method::LikelihoodWeighting,
        Method::Gibbs,
    ];

    /// Whether the method draws random samples.
    pub fn is_sampling(self) -> bool {
        matches!(
            self,
            Method::Rejection | Method::LikelihoodWeighting | Method::Gibbs
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Enumeration => "enumeration",
            Method::Elimination => "elimination",
            Method::Rejection => "rejection",
            Method::LikelihoodWeighting => "likelihood_weighting",
            Method::Gibbs => "gibbs",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "enumeration" | "enumerate" => Ok(Method::Enumeration),
            "elimination" | "eliminate" => Ok(Method::Elimination),
            "rejection" => Ok(Method::Rejection),
            "likelihood_weighting" | "likelihood" => Ok(Method::LikelihoodWeighting),
            "gibbs" => Ok(Method::Gibbs),
            _ => Err(format!("unknown inference method: {}", s)),
        }
    }
}

/// Runs inference queries under one configuration.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: InferenceConfig,
}

impl Engine {
    pub fn new(config: InferenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Posterior of `query` given `evidence` using the configured method.
    ///
    /// `sample_count` overrides the configured sample count for the sampling
    /// methods and is ignored by the exact ones. The random source is seeded
    /// from the configured seed, or from OS entropy when there is none.
    pub fn infer(
        &self,
        query: &str,
        evidence: &Evidence,
        network: &BayesianNetwork,
        sample_count: Option<usize>,
    ) -> Result<Posterior> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.infer_with_rng(query, evidence, network, sample_count, &mut rng)
    }

    /// [`Engine::infer`] with a caller-supplied random source.
    pub fn infer_with_rng<R: Rng + ?Sized>(
        &self,
        query: &str,
        evidence: &Evidence,
        network: &BayesianNetwork,
        sample_count: Option<usize>,
        rng: &mut R,
    ) -> Result<Posterior> {
        let weights = self.weights(query, evidence, network, sample_count, rng)?;
        Ok(normalize_with_precision(weights, Some(self.config.precision)))
    }

    /// Unnormalized `[true, false]` weights from the configured method.
    pub fn weights<R: Rng + ?Sized>(
        &self,
        query: &str,
        evidence: &Evidence,
        network: &BayesianNetwork,
        sample_count: Option<usize>,
        rng: &mut R,
    ) -> Result<[f64; 2]> {
        network.validate()?;
        let evidence = network.conditioning_evidence(query, evidence)?;

        let method = self.config.method;
        let samples = sample_count.unwrap_or(self.config.samples);
        let span = info_span!("infer", %method, query);
        let _guard = span.enter();
        debug!(evidence = evidence.len(), samples, "running inference");

        match method {
            Method::Enumeration => enumeration_weights(query, &evidence, network),
            Method::Elimination => elimination_weights(query, &evidence, network),
            Method::Rejection => rejection_counts(query, &evidence, network, samples, rng),
            Method::LikelihoodWeighting => {
                likelihood_weights(query, &evidence, network, samples, rng)
            }
            Method::Gibbs => gibbs_counts(query, &evidence, network, samples, rng),
        }
    }
}

/// Posterior of `query` given `evidence` with `method` and default settings.
pub fn infer(
    method: Method,
    query: &str,
    evidence: &Evidence,
    network: &BayesianNetwork,
    sample_count: Option<usize>,
) -> Result<Posterior> {
    let config = InferenceConfig {
        method,
        ..InferenceConfig::default()
    };
    Engine::new(config).infer(query, evidence, network, sample_count)
}
