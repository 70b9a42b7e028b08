//! The exporter
//!
//! Owns the metric catalog and the instance store behind one lock, so every
//! call observes and leaves a consistent state.

use anyhow::Context;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::catalog::{MetricCatalog, MetricDefinition, MetricType};
use super::labels::LabelSet;
use super::render::write_family;
use super::store::InstanceStore;
use crate::clock::{Clock, SystemClock};
use crate::config::MetricConfig;
use crate::error::{ExporterError, Result};
use crate::telemetry;

#[derive(Debug, Default)]
struct State {
    catalog: MetricCatalog,
    store: InstanceStore,
}

impl State {
    /// Drop stale samples of every metric, returning how many were removed
    fn purge_expired(&mut self, clock: &dyn Clock) -> usize {
        let now = clock.now();
        let State { catalog, store } = self;

        let mut purged = 0;
        for definition in catalog.iter() {
            let n = store.purge_expired(definition, now);
            if n > 0 {
                debug!(metric = %definition.name, expired = n, "Expired stale samples");
            }
            purged += n;
        }
        purged
    }
}

/// Registry of labeled metrics rendered in Prometheus text format
///
/// Construct one per process and share it by `Arc` between producers calling
/// [`set`](Self::set) and the scrape handler calling [`render`](Self::render).
pub struct PrometheusExporter {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
}

impl PrometheusExporter {
    /// Create an exporter using the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an exporter reading time from `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
        }
    }

    /// Register a metric
    ///
    /// A zero `timeout` means samples never expire. Fails if the name is
    /// empty or already registered; the existing registration is kept.
    pub fn register(
        &self,
        name: impl Into<String>,
        datatype: MetricType,
        help: impl Into<String>,
        timeout: Duration,
    ) -> Result<()> {
        self.register_definition(MetricDefinition::new(name, datatype, help, timeout))
    }

    /// Register a prebuilt definition
    pub fn register_definition(&self, definition: MetricDefinition) -> Result<()> {
        let name = definition.name.clone();
        let datatype = definition.datatype;
        let timeout = definition.timeout;

        self.state.lock().catalog.insert(definition)?;

        telemetry::registered();
        debug!(
            metric = %name,
            %datatype,
            timeout_secs = timeout.as_secs_f64(),
            "Metric registered"
        );
        Ok(())
    }

    /// Register every metric from configuration, stopping at the first failure
    pub fn register_all(&self, metrics: &[MetricConfig]) -> anyhow::Result<()> {
        for metric in metrics {
            self.register_definition(metric.to_definition())
                .with_context(|| format!("Failed to register metric {:?}", metric.name))?;
        }
        Ok(())
    }

    /// Write or clear a sample
    ///
    /// `Some(value)` creates or updates the instance for `labels` and
    /// refreshes its timestamp. `None` removes it, and is a no-op if it does
    /// not exist. Unregistered names are rejected before anything changes.
    pub fn set(
        &self,
        name: &str,
        value: Option<f64>,
        labels: impl Into<LabelSet>,
    ) -> Result<()> {
        let mut state = self.state.lock();

        if !state.catalog.contains(name) {
            drop(state);
            telemetry::rejected();
            return Err(ExporterError::UnknownMetric(name.to_string()));
        }

        let labels = labels.into();
        let changed = match value {
            Some(value) => {
                let now = self.clock.now();
                state.store.upsert(name, labels, value, now);
                true
            }
            None => {
                let removed = state.store.remove(name, &labels);
                if removed {
                    debug!(metric = %name, %labels, "Sample cleared");
                }
                removed
            }
        };
        drop(state);

        if changed {
            telemetry::updated();
        }
        Ok(())
    }

    /// Render all live samples in Prometheus text format
    ///
    /// Stale samples are dropped first. Metrics without samples are omitted,
    /// headers included. Returns an empty string when nothing is live.
    pub fn render(&self) -> String {
        let mut state = self.state.lock();
        let purged = state.purge_expired(self.clock.as_ref());

        let mut out = String::new();
        let mut lines = 0;
        for definition in state.catalog.iter() {
            let samples = state
                .store
                .instances(&definition.name)
                .map(|(labels, sample)| (labels, sample.value));
            lines += write_family(&mut out, definition, samples);
        }
        drop(state);

        telemetry::expired(purged);
        debug!(samples = lines, bytes = out.len(), "Rendered exposition");
        out
    }

    /// Drop every stale sample now, returning how many were removed
    pub fn sweep(&self) -> usize {
        let purged = self.state.lock().purge_expired(self.clock.as_ref());
        telemetry::expired(purged);
        purged
    }

    /// Whether a metric with this name is registered
    pub fn is_registered(&self, name: &str) -> bool {
        self.state.lock().catalog.contains(name)
    }

    /// Definition of a registered metric
    pub fn definition(&self, name: &str) -> Option<MetricDefinition> {
        self.state.lock().catalog.get(name).cloned()
    }

    /// Current value of one instance
    ///
    /// Stale samples read as `None`, exactly as if they had been cleared.
    pub fn value(&self, name: &str, labels: impl Into<LabelSet>) -> Option<f64> {
        let labels = labels.into();
        let now = self.clock.now();
        let state = self.state.lock();

        let definition = state.catalog.get(name)?;
        let sample = state.store.get(name, &labels)?;
        (!definition.is_stale(sample.age(now))).then_some(sample.value)
    }

    /// Number of live samples across all metrics
    pub fn instance_count(&self) -> usize {
        let now = self.clock.now();
        let state = self.state.lock();

        state
            .catalog
            .iter()
            .map(|definition| {
                state
                    .store
                    .instances(&definition.name)
                    .filter(|(_, sample)| !definition.is_stale(sample.age(now)))
                    .count()
            })
            .sum()
    }

    /// Number of samples held in memory, including stale ones not yet swept
    pub fn stored_count(&self) -> usize {
        self.state.lock().store.len()
    }

    /// Number of registered metrics
    pub fn metric_count(&self) -> usize {
        self.state.lock().catalog.len()
    }
}

impl Default for PrometheusExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PrometheusExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("PrometheusExporter")
            .field("metrics", &state.catalog.len())
            .field("instances", &state.store.len())
            .finish()
    }
}
