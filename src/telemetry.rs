//! Self-instrumentation
//!
//! Reports the exporter's own activity through the `metrics` facade. These
//! calls are no-ops unless the embedding process installs a recorder.

use metrics::{counter, describe_counter};

/// Register descriptions for the exporter's own metrics
pub fn describe() {
    describe_counter!("promsrv_registrations_total", "Metrics registered");
    describe_counter!("promsrv_updates_total", "Sample writes and removals");
    describe_counter!(
        "promsrv_rejected_updates_total",
        "Writes rejected because the metric was not registered"
    );
    describe_counter!(
        "promsrv_expired_instances_total",
        "Samples dropped after exceeding their metric timeout"
    );
}

#[inline]
pub(crate) fn registered() {
    counter!("promsrv_registrations_total").increment(1);
}

#[inline]
pub(crate) fn updated() {
    counter!("promsrv_updates_total").increment(1);
}

#[inline]
pub(crate) fn rejected() {
    counter!("promsrv_rejected_updates_total").increment(1);
}

#[inline]
pub(crate) fn expired(count: usize) {
    if count > 0 {
        counter!("promsrv_expired_instances_total").increment(count as u64);
    }
}
