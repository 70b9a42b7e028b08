//! Registry error types

use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Errors returned by the exporter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExporterError {
    /// A metric with this name is already registered
    #[error("metric already registered: {0}")]
    DuplicateMetric(String),

    /// No metric with this name has been registered
    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    /// Metric names must not be empty
    #[error("metric name must not be empty")]
    InvalidName,
}
