//! Structured logging.
//!
//! stdout is reserved for results; every log line goes to stderr, either as
//! human-readable text or as JSON lines. Events carry a `run_id` so the lines
//! of one invocation can be grouped.
//!
//! ```ignore
//! use bn_core::logging::{init_logging, event_names, generate_run_id, LogConfig, LogContext, Stage};
//!
//! init_logging(&LogConfig::from_env(None, None));
//! let ctx = LogContext::new(generate_run_id());
//! bn_core::log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "starting");
//! ```

pub mod config;
pub mod events;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, LogContext, Stage};

use std::io::IsTerminal;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the filter for `config`: raw `RUST_LOG` directives when present,
/// otherwise the configured level.
fn env_filter(config: &LogConfig) -> EnvFilter {
    let fallback = || {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::from(config.level).into())
            .parse_lossy("")
    };
    match &config.directives {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|_| fallback()),
        None => fallback(),
    }
}

/// Initialize the global subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(config: &LogConfig) {
    let filter = env_filter(config);

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);
            // try_init fails only when a subscriber is already installed
            let _ = if config.timestamps {
                tracing_subscriber::registry().with(filter).with(layer).try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.without_time())
                    .try_init()
            };
        }
        LogFormat::Jsonl => {
            let layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .flatten_event(true);
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init();
        }
    }
}

/// Generate a unique run ID for this invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("run-{}", &uuid[..12])
}

/// Emit a structured event tagged with the context's run id and a stage.
///
/// ```ignore
/// log_event!(ctx, INFO, event_names::INFER_FINISHED, Stage::Infer, "done", method = "gibbs");
/// ```
#[macro_export]
macro_rules! log_event {
    ($ctx:expr, $level:ident, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)* $(,)?) => {
        tracing::event!(
            tracing::Level::$level,
            event = $event,
            run_id = %$ctx.run_id,
            stage = %$stage,
            $($key = $val,)*
            "{}",
            $msg
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_run_id() {
        let id1 = generate_run_id();
        let id2 = generate_run_id();

        assert!(id1.starts_with("run-"));
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 16);
        assert!(id1[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_filter_uses_directives() {
        let config = LogConfig {
            directives: Some("bn_core=debug".to_string()),
            ..LogConfig::default()
        };
        assert!(env_filter(&config).to_string().contains("bn_core=debug"));
    }

    #[test]
    fn test_filter_falls_back_to_level() {
        let config = LogConfig::default().with_level(LogLevel::Trace);
        assert!(env_filter(&config).to_string().contains("trace"));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(&LogConfig::default());
        init_logging(&LogConfig::default().with_format(LogFormat::Jsonl));
        let ctx = LogContext::new("run-000000000000");
        crate::log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "test run");
    }
}
