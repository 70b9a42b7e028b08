//! Background expiry
//!
//! Rendering already drops stale samples, but a process that is scraped
//! rarely would otherwise hold them in memory until the next scrape.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::exporter::PrometheusExporter;

/// Handle to a running sweeper task
///
/// Dropping the handle also stops the task, without waiting for it.
pub struct SweeperHandle {
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for it to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.task.await;
    }

    /// Whether the task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Start a task that sweeps `exporter` every `interval`
///
/// Must be called from within a tokio runtime.
pub fn spawn_sweeper(exporter: Arc<PrometheusExporter>, interval: Duration) -> SweeperHandle {
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let task = tokio::spawn(sweep_task(exporter, interval, shutdown_rx));

    info!(interval_secs = interval.as_secs_f64(), "Sweeper started");
    SweeperHandle { shutdown_tx, task }
}

async fn sweep_task(
    exporter: Arc<PrometheusExporter>,
    interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let purged = exporter.sweep();
                if purged > 0 {
                    debug!(purged, "Sweep removed stale samples");
                }
            }
            _ = shutdown_rx.recv() => break,
        }
    }

    info!("Sweeper stopped");
}
