//! Scheduled analytics rollups.
//!
//! The aggregator itself is passive; this task drives it on a tokio
//! interval with explicit start/stop so a hosting process can shut down
//! cleanly instead of carrying an always-on timer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::analytics::AnalyticsAggregator;

/// Drives [`AnalyticsAggregator::tick`] on a fixed schedule.
pub struct AnalyticsTask {
    aggregator: Arc<AnalyticsAggregator>,
    handle: Option<JoinHandle<()>>,
    shutdown: Option<watch::Sender<bool>>,
}

impl AnalyticsTask {
    pub fn new(aggregator: Arc<AnalyticsAggregator>) -> Self {
        Self {
            aggregator,
            handle: None,
            shutdown: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Begin scheduled rollups. Starting an already-running task is a no-op.
    ///
    /// The first rollup runs immediately, then every configured interval.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }

        let (tx, mut rx) = watch::channel(false);
        let aggregator = Arc::clone(&self.aggregator);
        let period = Duration::from_secs(aggregator.config().interval_secs.max(1));

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        debug!("running scheduled analytics rollup");
                        aggregator.tick();
                    }
                    _ = rx.changed() => break,
                }
            }
        });

        self.shutdown = Some(tx);
        self.handle = Some(handle);
    }

    /// Stop the schedule and wait for the task to finish.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(true);
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}
