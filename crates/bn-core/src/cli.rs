//! Argument parsing and result rendering shared by the `bn-infer` binary.

use crate::engine::Method;
use crate::network::Evidence;
use bn_common::Posterior;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Parse a boolean CLI value.
///
/// Accepts `true/false`, `t/f`, `yes/no`, `y/n` and `1/0`, ignoring case.
pub fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Ok(true),
        "false" | "f" | "no" | "n" | "0" => Ok(false),
        other => Err(format!(
            "'{}' is not a boolean (use true/false, t/f, yes/no or 1/0)",
            other
        )),
    }
}

/// Parse one `NAME=BOOL` evidence item.
pub fn parse_evidence(item: &str) -> Result<(String, bool), String> {
    let (name, value) = item
        .split_once('=')
        .ok_or_else(|| format!("evidence '{}' must look like NAME=BOOL", item))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("evidence '{}' has an empty variable name", item));
    }
    Ok((name.to_string(), parse_bool(value)?))
}

/// Collect evidence items, rejecting contradictory repeats.
pub fn evidence_from_pairs(pairs: &[(String, bool)]) -> Result<Evidence, String> {
    let mut evidence = Evidence::with_capacity(pairs.len());
    for (name, value) in pairs {
        if let Some(previous) = evidence.insert(name.clone(), *value) {
            if previous != *value {
                return Err(format!("evidence for {} given as both true and false", name));
            }
        }
    }
    Ok(evidence)
}

/// What one inference run reports on stdout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub network: String,
    pub method: Method,
    pub query: String,
    /// Sorted for stable output.
    pub evidence: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub posterior: Posterior,
}

impl InferenceReport {
    /// The single line printed in text mode.
    pub fn render_text(&self) -> String {
        self.posterior.to_string()
    }
}
