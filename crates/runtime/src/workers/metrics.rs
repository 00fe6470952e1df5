//! Engine-wide counters.
//!
//! Uses atomics for lock-free access from every arena worker.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct EngineMetrics {
    arenas_created: AtomicU64,
    submissions_accepted: AtomicU64,
    submissions_rejected: AtomicU64,
    generator_fallbacks: AtomicU64,
    settlements: AtomicU64,
    payouts_delivered: AtomicU64,
    payouts_failed: AtomicU64,
    price_ticks: AtomicU64,
    evictions: AtomicU64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_created(&self) {
        self.arenas_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_submission(&self, accepted: bool) {
        let counter = if accepted {
            &self.submissions_accepted
        } else {
            &self.submissions_rejected
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.generator_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_settlement(&self) {
        self.settlements.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_payout(&self, delivered: bool) {
        let counter = if delivered {
            &self.payouts_delivered
        } else {
            &self.payouts_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_tick(&self) {
        self.price_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn generator_fallbacks(&self) -> u64 {
        self.generator_fallbacks.load(Ordering::Relaxed)
    }

    pub fn settlements(&self) -> u64 {
        self.settlements.load(Ordering::Relaxed)
    }

    /// Creates a snapshot of all metrics for display/logging.
    ///
    /// Note: This is not atomic across all fields - individual fields
    /// may be updated between reads.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            arenas_created: self.arenas_created.load(Ordering::Relaxed),
            submissions_accepted: self.submissions_accepted.load(Ordering::Relaxed),
            submissions_rejected: self.submissions_rejected.load(Ordering::Relaxed),
            generator_fallbacks: self.generator_fallbacks.load(Ordering::Relaxed),
            settlements: self.settlements.load(Ordering::Relaxed),
            payouts_delivered: self.payouts_delivered.load(Ordering::Relaxed),
            payouts_failed: self.payouts_failed.load(Ordering::Relaxed),
            price_ticks: self.price_ticks.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of engine metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub arenas_created: u64,
    pub submissions_accepted: u64,
    pub submissions_rejected: u64,
    pub generator_fallbacks: u64,
    pub settlements: u64,
    pub payouts_delivered: u64,
    pub payouts_failed: u64,
    pub price_ticks: u64,
    pub evictions: u64,
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "arenas={} submissions={}/{} (ok/rejected) fallbacks={} settled={} payouts={}/{} (ok/failed)",
            self.arenas_created,
            self.submissions_accepted,
            self.submissions_rejected,
            self.generator_fallbacks,
            self.settlements,
            self.payouts_delivered,
            self.payouts_failed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let metrics = EngineMetrics::new();
        metrics.record_submission(true);
        metrics.record_submission(true);
        metrics.record_submission(false);
        metrics.record_fallback();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.submissions_accepted, 2);
        assert_eq!(snapshot.submissions_rejected, 1);
        assert_eq!(snapshot.generator_fallbacks, 1);
        assert_eq!(snapshot.settlements, 0);
    }
}
