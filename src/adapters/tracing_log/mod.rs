// Tracing log adapter - Structured logging using tracing crate

use std::fmt;
use std::str::FromStr;

use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::EnvFilter;

/// Variable read for filter directives when no level is given on the command line
pub const RUST_LOG: &str = "RUST_LOG";

use crate::domain::errors::*;
use crate::ports::*;

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(DomainError::BadArgs(format!(
                "Invalid log format: {}. Valid formats: pretty, compact, json",
                other
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// Filter for the subscriber.
///
/// A level given with `--log-level` beats `RUST_LOG`; otherwise valid
/// `RUST_LOG` directives beat the configured level.
pub fn log_filter(level: LogLevel, level_from_cli: bool, rust_log: Option<&str>) -> EnvFilter {
    match rust_log {
        Some(directives) if !level_from_cli => EnvFilter::try_new(directives)
            .unwrap_or_else(|_| EnvFilter::new(level.as_filter())),
        _ => EnvFilter::new(level.as_filter()),
    }
}

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays machine-readable.
pub fn init_tracing(
    level: LogLevel,
    level_from_cli: bool,
    format: LogFormat,
) -> Result<(), DomainError> {
    let rust_log = std::env::var(RUST_LOG).ok();
    let filter = log_filter(level, level_from_cli, rust_log.as_deref());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| DomainError::ConfigFail(format!("Failed to initialize logging: {}", e)))
}

/// Tracing log adapter
pub struct TracingLogAdapter {
    min_level: LogLevel,
}

impl TracingLogAdapter {
    /// Adapter that drops messages below `min_level`
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    /// Check if log level should be logged
    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

impl LogPort for TracingLogAdapter {
    fn log(&self, level: LogLevel, message: &str) {
        if !self.should_log(level) {
            return;
        }
        match level {
            LogLevel::Error => error!(target: "cropper::log", "{}", message),
            LogLevel::Warn => warn!(target: "cropper::log", "{}", message),
            LogLevel::Info => info!(target: "cropper::log", "{}", message),
            LogLevel::Debug => debug!(target: "cropper::log", "{}", message),
            LogLevel::Trace => trace!(target: "cropper::log", "{}", message),
        }
    }
}
