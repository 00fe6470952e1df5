//! Periodic settlement of expired arenas.
//!
//! Each pass settles every active arena past its `end_time`, retries
//! undelivered payouts, and evicts completed arenas older than the retention
//! window.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::api::ArenaRegistry;
use crate::api::registry::unix_now;

pub struct SweeperWorker {
    registry: ArenaRegistry,
    interval: Duration,
    retention: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl SweeperWorker {
    pub fn new(
        registry: ArenaRegistry,
        interval: Duration,
        retention: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            registry,
            interval,
            retention,
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        // First pass one interval after start, not immediately.
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.sweep().await,
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        debug!("sweeper stopped");
    }

    async fn sweep(&self) {
        let now = unix_now();

        let settled = self.registry.sweep_expired(now).await;
        let delivered = self.registry.retry_payouts().await;
        let evicted = self
            .registry
            .evict_completed(now, self.retention.as_secs() as i64)
            .await;

        if !settled.is_empty() || delivered > 0 || !evicted.is_empty() {
            info!(
                settled = settled.len(),
                payouts_retried = delivered,
                evicted = evicted.len(),
                "sweep complete"
            );
        }
    }
}
