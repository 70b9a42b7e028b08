//! Metric instances
//!
//! One sample per (metric name, label set). Samples carry the instant of
//! their last write, which is all expiry needs.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use super::catalog::MetricDefinition;
use super::labels::LabelSet;

/// Current value of one metric instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Last written value
    pub value: f64,
    /// When the value was last written
    pub updated_at: Instant,
}

impl Sample {
    /// Age of the sample at `now`
    #[inline]
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.updated_at)
    }
}

/// Samples grouped by metric name, ordered by label set within a metric
#[derive(Debug, Default)]
pub struct InstanceStore {
    series: HashMap<String, BTreeMap<LabelSet, Sample>>,
}

impl InstanceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite a sample
    pub fn upsert(&mut self, name: &str, labels: LabelSet, value: f64, now: Instant) {
        let sample = Sample {
            value,
            updated_at: now,
        };

        match self.series.get_mut(name) {
            Some(instances) => {
                instances.insert(labels, sample);
            }
            None => {
                let mut instances = BTreeMap::new();
                instances.insert(labels, sample);
                self.series.insert(name.to_string(), instances);
            }
        }
    }

    /// Remove a sample, returning whether one existed
    pub fn remove(&mut self, name: &str, labels: &LabelSet) -> bool {
        let Some(instances) = self.series.get_mut(name) else {
            return false;
        };

        let removed = instances.remove(labels).is_some();
        if instances.is_empty() {
            self.series.remove(name);
        }
        removed
    }

    /// Sample for an exact label set
    pub fn get(&self, name: &str, labels: &LabelSet) -> Option<&Sample> {
        self.series.get(name)?.get(labels)
    }

    /// All samples of a metric, ordered by label set
    pub fn instances(&self, name: &str) -> impl Iterator<Item = (&LabelSet, &Sample)> {
        self.series.get(name).into_iter().flatten()
    }

    /// Drop every sample of `definition` that is stale at `now`
    ///
    /// Returns the number of samples removed.
    pub fn purge_expired(&mut self, definition: &MetricDefinition, now: Instant) -> usize {
        if !definition.expires() {
            return 0;
        }
        let Some(instances) = self.series.get_mut(&definition.name) else {
            return 0;
        };

        let before = instances.len();
        instances.retain(|_, sample| !definition.is_stale(sample.age(now)));
        let purged = before - instances.len();

        if instances.is_empty() {
            self.series.remove(&definition.name);
        }
        purged
    }

    /// Number of samples of one metric
    pub fn count(&self, name: &str) -> usize {
        self.series.get(name).map_or(0, BTreeMap::len)
    }

    /// Number of samples across all metrics
    pub fn len(&self) -> usize {
        self.series.values().map(BTreeMap::len).sum()
    }

    /// Whether the store holds no samples
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
