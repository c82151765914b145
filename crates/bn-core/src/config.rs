//! Inference configuration.
//!
//! A small TOML file sets the default method and sampling parameters:
//!
//! ```toml
//! method = "gibbs"
//! samples = 20000
//! seed = 42
//! precision = 4
//! ```
//!
//! Resolution order: CLI argument → `BN_CONFIG` → XDG config dir → defaults.
//! Command-line flags override whatever the file sets.

use crate::engine::Method;
use bn_common::{Error, Result};
use bn_math::{DEFAULT_PRECISION, MAX_PRECISION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a config file.
pub const ENV_CONFIG: &str = "BN_CONFIG";

/// Application name for XDG directories.
const APP_NAME: &str = "bayesnet";

const CONFIG_FILENAME: &str = "config.toml";

/// Default number of samples (or Gibbs sweeps) for the sampling methods.
pub const DEFAULT_SAMPLES: usize = 10_000;

/// Settings for one inference run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InferenceConfig {
    pub method: Method,
    pub samples: usize,
    /// Seed for the random source; OS entropy when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Decimal places kept in the posterior.
    pub precision: u32,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            samples: DEFAULT_SAMPLES,
            seed: None,
            precision: DEFAULT_PRECISION,
        }
    }
}

impl InferenceConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: InferenceConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), strip_prefix(&e))))
    }

    /// Semantic checks serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            return Err(Error::Config(format!(
                "precision {} exceeds the maximum of {}",
                self.precision, MAX_PRECISION
            )));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}

fn strip_prefix(err: &Error) -> String {
    match err {
        Error::Config(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Where the configuration came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,
    /// Named by `BN_CONFIG`.
    Environment,
    /// Found in the XDG config directory.
    XdgConfig,
    /// No file; built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Loaded configuration with provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub config: InferenceConfig,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// `~/.config/bayesnet/config.toml` (or the platform equivalent).
pub fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME).join(CONFIG_FILENAME))
}

/// Pick the config file to read.
///
/// Explicit paths (CLI or environment) must exist; the XDG file is used only
/// when present.
fn resolve_path(
    cli_path: Option<&Path>,
    env_path: Option<String>,
    xdg_path: Option<PathBuf>,
) -> Result<Option<(PathBuf, ConfigSource)>> {
    let explicit = cli_path
        .map(|p| (p.to_path_buf(), ConfigSource::CliArgument))
        .or_else(|| {
            env_path
                .filter(|p| !p.trim().is_empty())
                .map(|p| (PathBuf::from(p), ConfigSource::Environment))
        });

    if let Some((path, source)) = explicit {
        if !path.is_file() {
            return Err(Error::Config(format!(
                "config file not found: {} (from {})",
                path.display(),
                source
            )));
        }
        return Ok(Some((path, source)));
    }

    Ok(xdg_path
        .filter(|p| p.is_file())
        .map(|p| (p, ConfigSource::XdgConfig)))
}

fn load_from(
    cli_path: Option<&Path>,
    env_path: Option<String>,
    xdg_path: Option<PathBuf>,
) -> Result<ResolvedConfig> {
    match resolve_path(cli_path, env_path, xdg_path)? {
        Some((path, source)) => Ok(ResolvedConfig {
            config: InferenceConfig::from_file(&path)?,
            path: Some(path),
            source,
        }),
        None => Ok(ResolvedConfig {
            config: InferenceConfig::default(),
            path: None,
            source: ConfigSource::BuiltinDefault,
        }),
    }
}

/// Load configuration with the standard resolution order.
pub fn load_config(cli_path: Option<&Path>) -> Result<ResolvedConfig> {
    load_from(cli_path, std::env::var(ENV_CONFIG).ok(), xdg_config_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = InferenceConfig::default();
        assert_eq!(config.method, Method::Enumeration);
        assert_eq!(config.samples, 10_000);
        assert_eq!(config.seed, None);
        assert_eq!(config.precision, 3);
    }

    #[test]
    fn test_parse_partial_file() {
        let config = InferenceConfig::from_toml_str("method = \"gibbs\"\nseed = 7\n").unwrap();
        assert_eq!(config.method, Method::Gibbs);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.samples, DEFAULT_SAMPLES);
    }

    #[test]
    fn test_rejects_unknown_fields_and_methods() {
        assert!(matches!(
            InferenceConfig::from_toml_str("sampels = 3"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            InferenceConfig::from_toml_str("method = \"magic\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_rejects_large_precision() {
        let err = InferenceConfig::from_toml_str("precision = 40").unwrap_err();
        assert!(err.to_string().contains("precision"));
    }

    #[test]
    fn test_toml_roundtrip_keeps_values() {
        let config = InferenceConfig {
            method: Method::LikelihoodWeighting,
            samples: 500,
            seed: Some(9),
            precision: 5,
        };
        let text = config.to_toml().unwrap();
        assert!(text.contains("likelihood_weighting"));
        assert_eq!(InferenceConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_cli_path_wins() {
        let cli = write_config("samples = 1\n");
        let env = write_config("samples = 2\n");
        let resolved = load_from(
            Some(cli.path()),
            Some(env.path().display().to_string()),
            None,
        )
        .unwrap();
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert_eq!(resolved.config.samples, 1);
    }

    #[test]
    fn test_env_then_xdg() {
        let env = write_config("samples = 2\n");
        let xdg = write_config("samples = 3\n");
        let resolved = load_from(
            None,
            Some(env.path().display().to_string()),
            Some(xdg.path().to_path_buf()),
        )
        .unwrap();
        assert_eq!(resolved.source, ConfigSource::Environment);

        let resolved = load_from(None, None, Some(xdg.path().to_path_buf())).unwrap();
        assert_eq!(resolved.source, ConfigSource::XdgConfig);
        assert_eq!(resolved.config.samples, 3);
    }

    #[test]
    fn test_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        let resolved = load_from(None, None, Some(missing.clone())).unwrap();
        assert_eq!(resolved.source, ConfigSource::BuiltinDefault);
        assert_eq!(resolved.config, InferenceConfig::default());

        assert!(matches!(
            load_from(Some(&missing), None, None),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_bad_file_names_path() {
        let file = write_config("precision = \"three\"\n");
        let err = load_from(Some(file.path()), None, None).unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }
}
