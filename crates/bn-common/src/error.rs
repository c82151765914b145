//! Error types for bayesnet.
//!
//! Every error carries:
//! - A stable numeric code for machine parsing
//! - A category for grouping
//! - A remediation hint for humans
//!
//! Running out of samples is *not* an error; see [`crate::Posterior`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for bayesnet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The network violates a structural invariant.
    Network,
    /// A network file could not be turned into a network.
    Load,
    /// Configuration file or value errors.
    Config,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Network => write!(f, "network"),
            ErrorCategory::Load => write!(f, "load"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for bayesnet.
#[derive(Error, Debug)]
pub enum Error {
    // Network errors (10-19)
    #[error("unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("duplicate variable: {name}")]
    DuplicateVariable { name: String },

    #[error("malformed CPT for {variable}: {reason}")]
    MalformedCpt { variable: String, reason: String },

    #[error("cycle detected in network at variable {variable}")]
    CyclicNetwork { variable: String },

    #[error("variable {variable} appears before its parent {parent}")]
    UnorderedNetwork { variable: String, parent: String },

    // Load errors (20-29)
    #[error("invalid network definition: {0}")]
    Load(String),

    // Configuration errors (30-39)
    #[error("configuration error: {0}")]
    Config(String),

    // I/O errors (40-49)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn unknown_variable(name: impl Into<String>) -> Self {
        Error::UnknownVariable { name: name.into() }
    }

    pub fn malformed_cpt(variable: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedCpt {
            variable: variable.into(),
            reason: reason.into(),
        }
    }

    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Network errors
    /// - 20-29: Load errors
    /// - 30-39: Configuration errors
    /// - 40-49: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::UnknownVariable { .. } => 10,
            Error::DuplicateVariable { .. } => 11,
            Error::MalformedCpt { .. } => 12,
            Error::CyclicNetwork { .. } => 13,
            Error::UnorderedNetwork { .. } => 14,
            Error::Load(_) => 20,
            Error::Config(_) => 30,
            Error::Io(_) => 40,
            Error::Json(_) => 41,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::UnknownVariable { .. }
            | Error::DuplicateVariable { .. }
            | Error::MalformedCpt { .. }
            | Error::CyclicNetwork { .. }
            | Error::UnorderedNetwork { .. } => ErrorCategory::Network,

            Error::Load(_) => ErrorCategory::Load,

            Error::Config(_) => ErrorCategory::Config,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::UnknownVariable { .. } => {
                "Check the spelling of the query and evidence names against 'bn-infer check'."
            }
            Error::DuplicateVariable { .. } => "Give every VARIABLE in the network a unique NAME.",
            Error::MalformedCpt { .. } => {
                "Each TABLE needs 2^(number of GIVEN) pairs of probabilities in [0, 1] that sum to 1."
            }
            Error::CyclicNetwork { .. } => {
                "Bayesian networks must be acyclic. Remove the GIVEN entry that closes the cycle."
            }
            Error::UnorderedNetwork { .. } => {
                "Declare parents before children, or load the network through the XMLBIF loader which sorts it."
            }
            Error::Load(_) => "Check that the file is a well-formed XMLBIF 0.3 document.",
            Error::Config(_) => "Run 'bn-infer config' to inspect the resolved configuration.",
            Error::Io(_) => "Check that the file exists and is readable.",
            Error::Json(_) => "Internal serialization failure. Please report it.",
        }
    }
}
