//! Stable event names and pipeline stages for structured logs.

use serde::{Deserialize, Serialize};

/// Stages of one `bn-infer` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Configuration resolution.
    Init,
    /// Reading and validating a network file.
    Load,
    /// Running an inference method.
    Infer,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Infer => "infer",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    pub const NETWORK_LOADED: &str = "network.loaded";
    pub const NETWORK_INVALID: &str = "network.invalid";

    pub const INFER_STARTED: &str = "infer.started";
    pub const INFER_FINISHED: &str = "infer.finished";
    pub const INFER_INSUFFICIENT: &str = "infer.insufficient_samples";
}

/// Correlation context carried through one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    pub run_id: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
        }
    }
}
