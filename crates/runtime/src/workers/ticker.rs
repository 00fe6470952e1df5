//! Shared price feed for trading arenas.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::api::ArenaRegistry;

/// Moves every in-progress trading arena's prices once per interval.
pub struct PriceTicker {
    registry: ArenaRegistry,
    interval: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl PriceTicker {
    pub fn new(registry: ArenaRegistry, interval: Duration, shutdown_rx: watch::Receiver<bool>) -> Self {
        Self {
            registry,
            interval,
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let ticked = self.registry.tick_prices().await;
                    trace!(arenas = ticked, "prices ticked");
                }
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        debug!("price ticker stopped");
    }
}
