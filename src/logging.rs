//! Structured logging setup
//!
//! Installs a `tracing-subscriber` fmt subscriber with an `EnvFilter`.
//! `RUST_LOG` wins when set; otherwise `APISAIL_LOG_LEVEL` (default `info`)
//! is used. Output is JSON unless `APISAIL_LOG_FORMAT=pretty`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log format: JSON for CI, pretty-print for local runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json, // Default to JSON
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Include file:line location
    pub include_location: bool,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("APISAIL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("APISAIL_LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
            ),
            include_location: env::var("APISAIL_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already installed.
///
/// Logs go to stderr so command output on stdout stays machine readable.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.as_str()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(config.include_location)
                    .with_line_number(config.include_location)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialize JSON logging"),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_file(config.include_location)
                    .with_line_number(config.include_location)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialize pretty logging"),
    }
}
