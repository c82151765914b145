//! Exit codes for `bn-infer`.
//!
//! Exit code ranges:
//! - 0-1: Completed runs (1 = the sampler never saw the query's outcome)
//! - 10-19: User errors (arguments, network files, configuration)
//! - 20-29: Internal and I/O errors

use bn_common::{Error, ErrorCategory};

/// Exit codes for `bn-infer`; a stable contract for scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// A posterior (or the requested report) was produced.
    Success = 0,

    /// The normalizing total was zero.
    InsufficientSamples = 1,

    /// Invalid arguments.
    ArgsError = 10,

    /// The network violates a structural invariant or names are unknown.
    NetworkError = 11,

    /// The network file could not be parsed.
    LoadError = 12,

    /// Invalid configuration.
    ConfigError = 13,

    /// Internal error (bug - please report).
    InternalError = 20,

    /// I/O error.
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Codes 0-1 report a finished run.
    pub fn is_success(self) -> bool {
        (self as i32) < 10
    }

    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Stable name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Success => "OK",
            ExitCode::InsufficientSamples => "OK_INSUFFICIENT_SAMPLES",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::NetworkError => "ERR_NETWORK",
            ExitCode::LoadError => "ERR_LOAD",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match (err, err.category()) {
            (Error::Json(_), _) => ExitCode::InternalError,
            (_, ErrorCategory::Network) => ExitCode::NetworkError,
            (_, ErrorCategory::Load) => ExitCode::LoadError,
            (_, ErrorCategory::Config) => ExitCode::ConfigError,
            (_, ErrorCategory::Io) => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}
