//! Metric registry and exposition
//!
//! Definitions live in the catalog, samples in the instance store, and the
//! exporter ties both together behind a single lock.

mod catalog;
mod exporter;
mod labels;
mod render;
mod store;
mod sweeper;

pub use catalog::{MetricCatalog, MetricDefinition, MetricType};
pub use exporter::PrometheusExporter;
pub use labels::LabelSet;
pub use render::{format_value, write_family};
pub use store::{InstanceStore, Sample};
pub use sweeper::{spawn_sweeper, SweeperHandle};
