//! Shared types for the bayesnet crates.
//!
//! - The unified error taxonomy with stable codes
//! - The two-outcome posterior returned by every inference method
//! - Output format selection for the CLI

pub mod error;
pub mod output;
pub mod posterior;

pub use error::{Error, ErrorCategory, Result};
pub use output::OutputFormat;
pub use posterior::Posterior;
