use crate::{ConnectionRegistry, EVENTS_TARGET, Metrics, ShutdownCoordinator};

use std::time::Duration;

use log::{debug, info};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Periodic sweep that removes registry entries whose transport already closed.
///
/// Connection teardown and dispatcher eviction handle the common case; this
/// only catches connections whose close was never observed.
pub struct Reaper {
    registry: ConnectionRegistry,
    interval: Duration,
    metrics: Metrics,
}

impl Reaper {
    pub fn new(registry: ConnectionRegistry, interval: Duration, metrics: Metrics) -> Self {
        Self {
            registry,
            interval,
            metrics,
        }
    }

    /// Run one cycle; returns the number of connections pruned
    pub async fn sweep(&self) -> usize {
        let mut pruned = 0;

        for handle in self.registry.entries().await {
            if !handle.is_closed() {
                continue;
            }
            if self
                .registry
                .remove(handle.institution_id, handle.connection_id)
                .await
            {
                info!(
                    target: EVENTS_TARGET,
                    "event=prune institution_id={} connection_id={} remote={}",
                    handle.institution_id,
                    handle.connection_id,
                    handle.remote
                );
                self.metrics.connection_pruned();
                pruned += 1;
            }
        }

        if pruned > 0 {
            debug!("Reaper pruned {pruned} dead connections");
        }
        pruned
    }

    /// Sweep every `interval` until shutdown. The first sweep happens one
    /// interval after start.
    pub fn spawn(self, shutdown: &ShutdownCoordinator) -> JoinHandle<()> {
        let mut shutdown_guard = shutdown.subscribe_guard();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.sweep().await;
                    }
                    _ = shutdown_guard.wait() => {
                        debug!("Reaper stopping");
                        break;
                    }
                }
            }
        })
    }
}
