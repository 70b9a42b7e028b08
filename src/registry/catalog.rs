//! Metric definitions
//!
//! Holds what each metric is (type, help text, staleness timeout) in the
//! order metrics were registered.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::error::{ExporterError, Result};

/// Exposition type of a metric, as written in the `# TYPE` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    /// Value that can go up or down
    Gauge,
    /// Monotonically increasing value
    Counter,
    /// Type not declared by the producer
    Untyped,
}

impl MetricType {
    /// Header keyword for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Gauge => "gauge",
            MetricType::Counter => "counter",
            MetricType::Untyped => "untyped",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered metric
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDefinition {
    /// Unique, case-sensitive name
    pub name: String,
    /// Exposition type
    pub datatype: MetricType,
    /// Help text, emitted verbatim
    pub help: String,
    /// Maximum sample age; zero disables expiry
    pub timeout: Duration,
}

impl MetricDefinition {
    /// Create a new definition
    pub fn new(
        name: impl Into<String>,
        datatype: MetricType,
        help: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            datatype,
            help: help.into(),
            timeout,
        }
    }

    /// Whether samples of this metric ever go stale
    #[inline]
    pub fn expires(&self) -> bool {
        !self.timeout.is_zero()
    }

    /// Whether a sample of the given age is past the timeout
    #[inline]
    pub fn is_stale(&self, age: Duration) -> bool {
        self.expires() && age > self.timeout
    }
}

/// Registration-ordered set of metric definitions
#[derive(Debug, Default)]
pub struct MetricCatalog {
    definitions: Vec<MetricDefinition>,
    /// Name to position in `definitions`
    index: HashMap<String, usize>,
}

impl MetricCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, rejecting empty and already-taken names
    pub fn insert(&mut self, definition: MetricDefinition) -> Result<()> {
        if definition.name.is_empty() {
            return Err(ExporterError::InvalidName);
        }
        if self.index.contains_key(&definition.name) {
            return Err(ExporterError::DuplicateMetric(definition.name));
        }

        self.index
            .insert(definition.name.clone(), self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    /// Look up a definition by name
    pub fn get(&self, name: &str) -> Option<&MetricDefinition> {
        self.index.get(name).map(|&i| &self.definitions[i])
    }

    /// Whether a metric with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Definitions in registration order
    pub fn iter(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.definitions.iter()
    }

    /// Number of registered metrics
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
