//! Configuration management
//!
//! Loads exporter settings and metric declarations from TOML. The exporter
//! itself never reads files; the embedding process calls [`Config::load`]
//! and hands the result over.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::registry::{MetricDefinition, MetricType};

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub metrics: Vec<MetricConfig>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Background sweep configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    /// Run the periodic sweeper
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between sweeps
    #[serde(default = "default_sweep_interval")]
    pub interval_secs: u64,
}

impl SweepConfig {
    /// Sweep interval as a duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            interval_secs: default_sweep_interval(),
        }
    }
}

/// A metric declared in configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetricConfig {
    /// Metric name
    pub name: String,
    /// Exposition type
    #[serde(rename = "type")]
    pub datatype: MetricType,
    /// Help text
    #[serde(default)]
    pub help: String,
    /// Sample timeout in seconds (0 = never expires)
    #[serde(default)]
    pub timeout_secs: u64,
}

impl MetricConfig {
    /// Convert into a registry definition
    pub fn to_definition(&self) -> MetricDefinition {
        MetricDefinition::new(
            self.name.clone(),
            self.datatype,
            self.help.clone(),
            Duration::from_secs(self.timeout_secs),
        )
    }
}

// Default value functions
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }
fn default_true() -> bool { true }
fn default_sweep_interval() -> u64 { 5 }

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML document
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .with_context(|| "Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.sweep.enabled && self.sweep.interval_secs == 0 {
            anyhow::bail!("sweep.interval_secs must be > 0 when sweeping is enabled");
        }

        let mut seen = HashSet::new();
        for metric in &self.metrics {
            if metric.name.is_empty() {
                anyhow::bail!("metric name must not be empty");
            }
            if !seen.insert(metric.name.as_str()) {
                anyhow::bail!("metric {:?} is declared more than once", metric.name);
            }
        }
        Ok(())
    }
}
