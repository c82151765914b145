//! Bayesian network inference core.
//!
//! This library provides:
//! - The boolean network model and its CPT indexing rule
//! - Factor algebra for variable elimination
//! - Exact inference (enumeration, variable elimination)
//! - Sampling (rejection, likelihood weighting, Gibbs)
//! - An XMLBIF loader, configuration and logging for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod cli;
pub mod config;
pub mod engine;
pub mod exit_codes;
pub mod factor;
pub mod inference;
pub mod loader;
pub mod logging;
pub mod network;
pub mod normalize;
pub mod sampling;

pub use bn_common::{Error, Posterior, Result};
pub use config::InferenceConfig;
pub use engine::{infer, Engine, Method};
pub use network::{BayesianNetwork, Evidence, Variable};
