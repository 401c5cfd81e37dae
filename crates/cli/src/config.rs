//! `scmctl` configuration file.
//!
//! ```toml
//! [gitee]
//! base_url = "https://gitee.com/"
//!
//! [telemetry]
//! log_format = "json"
//! otlp_endpoint = "http://localhost:4317"
//! ```
//!
//! Every table and key is optional.

use std::path::Path;

use anyhow::Context;
use gitee::GiteeConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub gitee: GiteeConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetryConfig {
    pub log_format: LogFormat,
    /// OTLP gRPC collector. Span export is disabled when unset.
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl CliConfig {
    /// Loads `path`, or returns defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
