//! Logging setup for harness processing
//!
//! Structured logging via `tracing`. The library only emits events; binaries
//! call [`init_logging`] once to install a subscriber.
//!
//! # Usage
//!
//! ```rust,no_run
//! use harnessviz::core::logging::init_logging;
//!
//! init_logging(Some("debug"), Some("pretty")).unwrap();
//! ```
//!
//! # Environment Variables
//!
//! - `HARNESSVIZ_LOG_LEVEL`: log level or filter directive
//! - `RUST_LOG`: fallback filter, read by `tracing-subscriber`
//! - `HARNESSVIZ_LOG_FORMAT`: `compact`, `pretty` or `json`
//!
//! Filters accept per-module directives, e.g.
//! `RUST_LOG="info,harnessviz::model::harness=trace"`.

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Environment variable consulted for the log level
pub const LOG_LEVEL_ENV: &str = "HARNESSVIZ_LOG_LEVEL";

/// Environment variable consulted for the log format
pub const LOG_FORMAT_ENV: &str = "HARNESSVIZ_LOG_FORMAT";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single-line output
    #[default]
    Compact,
    /// Multi-line output with source locations
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// All valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Resolve the level directive: argument, then `HARNESSVIZ_LOG_LEVEL`, then
/// `RUST_LOG`, then `info`
pub fn resolve_level(level: Option<&str>) -> String {
    level
        .map(str::to_string)
        .or_else(|| std::env::var(LOG_LEVEL_ENV).ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string())
}

/// Resolve the format: argument, then `HARNESSVIZ_LOG_FORMAT`, then compact
pub fn resolve_format(format: Option<&str>) -> Result<LogFormat, String> {
    match format
        .map(str::to_string)
        .or_else(|| std::env::var(LOG_FORMAT_ENV).ok())
    {
        Some(name) => name.parse(),
        None => Ok(LogFormat::default()),
    }
}

/// Install the global tracing subscriber
///
/// Fails if the format is unknown or a subscriber is already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = resolve_level(level);
    let format = resolve_format(format).map_err(|e| format!("Invalid log format: {}", e))?;

    let filter = if log_level == "off" {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    match format {
        LogFormat::Compact => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_level(true)
                        .with_span_events(FmtSpan::NONE)
                        .compact(),
                )
                .try_init()?;
        }
        LogFormat::Pretty => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::ACTIVE)
                        .pretty(),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .json(),
                )
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::from_str("PRETTY").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_explicit_arguments_win() {
        assert_eq!(resolve_level(Some("trace")), "trace");
        assert_eq!(resolve_format(Some("json")).unwrap(), LogFormat::Json);
        assert!(resolve_format(Some("xml")).is_err());
    }
}
