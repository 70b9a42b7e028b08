//! promsrv - in-process metrics exporter
//!
//! Accumulates named, labeled samples and renders them in the Prometheus
//! text exposition format. Samples of a metric with a timeout disappear once
//! they have not been written for longer than that timeout.
//!
//! ```
//! use std::time::Duration;
//! use promsrv::{MetricType, PrometheusExporter};
//!
//! let exporter = PrometheusExporter::new();
//! exporter
//!     .register("room_temperature", MetricType::Gauge, "Room temperature", Duration::from_secs(60))
//!     .unwrap();
//! exporter
//!     .set("room_temperature", Some(21.5), [("room", "kitchen")])
//!     .unwrap();
//!
//! assert!(exporter.render().contains("room_temperature{room=\"kitchen\"} 21.5"));
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod registry;
pub mod telemetry;
pub mod util;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{ExporterError, Result};
pub use registry::{spawn_sweeper, LabelSet, MetricDefinition, MetricType, PrometheusExporter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
