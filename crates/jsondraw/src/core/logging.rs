//! Logging infrastructure for diagram generation
//!
//! Structured logging uses the `tracing` crate. Events are written to stderr
//! so that a document printed to stdout is never interleaved with log lines.
//!
//! # Usage
//!
//! ```rust,no_run
//! use jsondraw::core::logging::init_logging;
//!
//! // Initialize with default settings
//! init_logging(None, None).ok();
//!
//! // Or with custom level and format
//! init_logging(Some("debug"), Some("pretty")).ok();
//! ```
//!
//! # Log Formats
//!
//! - `compact`: Single-line format, good for production
//! - `pretty`: Multi-line format with colors, good for development
//! - `json`: JSON format, good for log aggregation systems
//!
//! # Environment Variables
//!
//! - `JSONDRAW_LOG_LEVEL`: Set log level (trace|debug|info|warn|error|off)
//! - `JSONDRAW_LOG_FORMAT`: Set log format (compact|pretty|json)
//! - `RUST_LOG`: Alternative way to set log level (tracing-subscriber standard)
//!
//! # Filtering Logs
//!
//! ```bash
//! # Only the builder, at debug level
//! RUST_LOG="jsondraw::drawio::builder=debug" jsondraw convert -i data.json
//!
//! # Everything at info, style resolution at trace
//! RUST_LOG="info,jsondraw::drawio::style=trace" jsondraw convert -i data.json
//! ```

use std::str::FromStr;

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
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
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Pick the first of the explicit value, the given environment variables, or `default`
fn setting(explicit: Option<&str>, vars: &[&str], default: &str) -> String {
    resolve_setting(explicit, vars, default, |var| std::env::var(var).ok())
}

fn resolve_setting(
    explicit: Option<&str>,
    vars: &[&str],
    default: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| vars.iter().find_map(|var| lookup(var)))
        .unwrap_or_else(|| default.to_string())
}

/// The level is already resolved, so `RUST_LOG` is not consulted again here
fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Build the stderr output layer for a format
fn output_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let layer = fmt::layer().with_writer(std::io::stderr).with_level(true);
    match format {
        LogFormat::Compact => layer
            .with_target(false)
            .with_span_events(FmtSpan::NONE)
            .compact()
            .boxed(),
        LogFormat::Pretty => layer
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::ACTIVE)
            .pretty()
            .boxed(),
        LogFormat::Json => layer
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::ACTIVE)
            .json()
            .boxed(),
    }
}

/// Initialize the tracing subscriber with the given log level and format
///
/// * `level` - trace|debug|info|warn|error|off. If None, uses
///   `JSONDRAW_LOG_LEVEL` or `RUST_LOG`, or defaults to `info`.
/// * `format` - compact|pretty|json. If None, uses `JSONDRAW_LOG_FORMAT`,
///   or defaults to `compact`.
///
/// Returns an error for an unknown format or when a global subscriber is
/// already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = setting(level, &["JSONDRAW_LOG_LEVEL", "RUST_LOG"], "info");
    let log_format = setting(format, &["JSONDRAW_LOG_FORMAT"], "compact");

    let format =
        LogFormat::from_str(&log_format).map_err(|e| format!("Invalid log format: {}", e))?;

    Registry::default()
        .with(level_filter(&log_level))
        .with(output_layer(format))
        .try_init()?;

    Ok(())
}
