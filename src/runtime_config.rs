//! # Runtime Configuration Module
//!
//! Settings for a loading pass: which description snapshot to read and how
//! strictly to treat missing examples.
//!
//! ## Environment Variables
//!
//! ### `APISAIL_SOURCE_FILE`
//!
//! Path of the description snapshot (`.yaml`, `.yml` or `.json`). Used by
//! the CLI when `--description` is not given.
//!
//! ### `APISAIL_FAIL_FAST`
//!
//! Abort the load on the first missing example (`true`, default) or collect
//! every violation before failing (`false`).
//!
//! ### `APISAIL_REQUIRE_PARAM_EXAMPLES`
//!
//! Treat required query parameters without an example as violations.
//! Default: `false`.
//!
//! ### `APISAIL_LOG_FORMAT`
//!
//! `pretty` or `json` (default).
//!
//! Boolean variables accept `1/0`, `true/false`, `yes/no` and `on/off`;
//! anything else keeps the default.
//!
//! ## Config file
//!
//! The same settings can be kept in YAML:
//!
//! ```yaml
//! source_file: features/support/my_blog.yaml
//! fail_fast: false
//! require_parameter_examples: true
//! log_format: pretty
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use apisail::runtime_config::SailConfig;
//!
//! let config = SailConfig::from_env();
//! let options = config.loader_options();
//! assert_eq!(options.fail_fast, config.fail_fast);
//! ```

use crate::logging::LogFormat;
use crate::registry::LoadOptions;
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Loader configuration from environment variables or a YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SailConfig {
    pub source_file: Option<PathBuf>,
    pub fail_fast: bool,
    pub require_parameter_examples: bool,
    pub log_format: LogFormat,
}

impl Default for SailConfig {
    fn default() -> Self {
        SailConfig {
            source_file: None,
            fail_fast: true,
            require_parameter_examples: false,
            log_format: LogFormat::Json,
        }
    }
}

impl SailConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Read a YAML config file; missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Override fields with whatever environment variables are set.
    #[must_use]
    pub fn merge_env(mut self) -> Self {
        if let Ok(path) = env::var("APISAIL_SOURCE_FILE") {
            if !path.trim().is_empty() {
                self.source_file = Some(PathBuf::from(path));
            }
        }
        self.fail_fast = env_bool("APISAIL_FAIL_FAST").unwrap_or(self.fail_fast);
        self.require_parameter_examples = env_bool("APISAIL_REQUIRE_PARAM_EXAMPLES")
            .unwrap_or(self.require_parameter_examples);
        if let Ok(format) = env::var("APISAIL_LOG_FORMAT") {
            self.log_format = LogFormat::parse(&format);
        }
        self
    }

    #[must_use]
    pub fn loader_options(&self) -> LoadOptions {
        LoadOptions {
            fail_fast: self.fail_fast,
            require_parameter_examples: self.require_parameter_examples,
        }
    }
}

fn env_bool(key: &str) -> Option<bool> {
    env::var(key).ok().and_then(|v| parse_bool(&v))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool(" 0 "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_defaults() {
        let config = SailConfig::default();
        assert!(config.fail_fast);
        assert!(!config.require_parameter_examples);
        assert_eq!(config.loader_options(), LoadOptions::default());
    }

    #[test]
    fn test_yaml_fills_missing_fields() {
        let config: SailConfig = serde_yaml::from_str("fail_fast: false\nlog_format: pretty\n").unwrap();
        assert!(!config.fail_fast);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.source_file.is_none());
    }
}
