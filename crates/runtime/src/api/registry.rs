//! Owned registry of live arenas.
//!
//! [`ArenaRegistry`] is the entry point for every arena operation. It maps
//! ids to [`ArenaHandle`]s, spawns one worker per arena, and runs the
//! cross-arena passes used by the sweeper and the price ticker.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info, warn};

use arena_core::{
    Arena, ArenaId, ArenaSpec, ArenaStatus, GameKind, GameView, LifecycleError, PlayerAddress,
    SettleTrigger, Settlement, Submission, SubmissionReceipt, compute_seed,
};

use super::errors::{ArenaError, Result};
use super::handle::ArenaHandle;
use crate::events::{Event, EventBus, LifecycleEvent};
use crate::repository::ArenaRecord;
use crate::workers::{ArenaWorker, MetricsSnapshot, WorkerContext};

/// Current wall-clock time in epoch seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Health snapshot: arena counts per status plus engine counters.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    pub open: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub metrics: MetricsSnapshot,
}

impl RegistryStats {
    pub fn total(&self) -> usize {
        self.open + self.in_progress + self.completed
    }
}

struct RegistryInner {
    arenas: RwLock<HashMap<ArenaId, ArenaHandle>>,
    next_id: AtomicU64,
    ctx: WorkerContext,
    command_buffer: usize,
    rng_seed: Option<u64>,
}

/// Cloneable handle to the arena registry.
#[derive(Clone)]
pub struct ArenaRegistry {
    inner: Arc<RegistryInner>,
}

impl ArenaRegistry {
    pub(crate) fn new(ctx: WorkerContext, command_buffer: usize, rng_seed: Option<u64>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                arenas: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                ctx,
                command_buffer: command_buffer.max(1),
                rng_seed,
            }),
        }
    }

    /// Respawns workers for persisted records and moves the id counter past them.
    pub(crate) async fn restore(&self, records: Vec<ArenaRecord>) -> usize {
        let count = records.len();
        for record in records {
            self.inner
                .next_id
                .fetch_max(record.id().0 + 1, Ordering::SeqCst);
            self.spawn(record).await;
        }
        count
    }

    /// Drops every handle; workers exit once in-flight commands finish.
    pub(crate) async fn close(&self) {
        self.inner.arenas.write().await.clear();
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.ctx.event_bus
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.ctx.metrics.snapshot()
    }

    async fn spawn(&self, record: ArenaRecord) -> ArenaHandle {
        let (command_tx, command_rx) = mpsc::channel(self.inner.command_buffer);
        let handle = ArenaHandle::new(record.id(), record.arena.kind, command_tx);

        let worker = ArenaWorker::new(record, self.inner.ctx.clone(), command_rx);
        tokio::spawn(worker.run());

        self.inner
            .arenas
            .write()
            .await
            .insert(handle.id(), handle.clone());
        handle
    }

    fn seed_for(&self, id: ArenaId) -> u64 {
        match self.inner.rng_seed {
            Some(seed) => compute_seed(seed, id.0, 0),
            None => rand::random(),
        }
    }

    pub async fn handle(&self, id: ArenaId) -> Result<ArenaHandle> {
        self.inner
            .arenas
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ArenaError::NotFound(id))
    }

    async fn handles(&self) -> Vec<ArenaHandle> {
        self.inner.arenas.read().await.values().cloned().collect()
    }

    /// Opens a new arena with the next id.
    pub async fn create(&self, spec: ArenaSpec) -> Result<Arena> {
        spec.validate()?;

        let id = ArenaId(self.inner.next_id.fetch_add(1, Ordering::SeqCst));
        let arena = Arena::open(id, spec, unix_now())?;
        let record = ArenaRecord::new(arena.clone(), self.seed_for(id));

        self.inner.ctx.persist(&record);
        self.spawn(record).await;
        self.inner.ctx.metrics.record_created();

        info!(arena = %id, kind = %arena.kind, title = %arena.title, "arena created");
        self.event_bus()
            .publish(Event::Lifecycle(LifecycleEvent::Created {
                arena_id: id,
                kind: arena.kind,
                title: arena.title.clone(),
            }));
        Ok(arena)
    }

    pub async fn join(&self, id: ArenaId, player: &str) -> Result<Arena> {
        let player = PlayerAddress::parse(player)?;
        self.handle(id).await?.join(player, unix_now()).await
    }

    pub async fn start(&self, id: ArenaId) -> Result<Arena> {
        self.handle(id).await?.start(unix_now()).await
    }

    pub async fn submit(
        &self,
        id: ArenaId,
        player: &str,
        submission: Submission,
    ) -> Result<SubmissionReceipt> {
        let player = PlayerAddress::parse(player)?;
        self.handle(id)
            .await?
            .submit(player, submission, unix_now())
            .await
    }

    /// Injects the real-world outcome of a prediction arena.
    pub async fn resolve_prediction(&self, id: ArenaId, outcome: impl Into<String>) -> Result<String> {
        self.handle(id).await?.resolve(outcome.into()).await
    }

    /// Explicit settle. Returns the stored settlement if already settled.
    pub async fn settle(&self, id: ArenaId) -> Result<Settlement> {
        self.handle(id)
            .await?
            .settle(SettleTrigger::Explicit, unix_now())
            .await
    }

    pub async fn get(&self, id: ArenaId) -> Result<Arena> {
        self.handle(id).await?.arena().await
    }

    /// Every registered arena, ascending by id.
    pub async fn list(&self) -> Vec<Arena> {
        let mut arenas = Vec::new();
        for handle in self.handles().await {
            match handle.arena().await {
                Ok(arena) => arenas.push(arena),
                Err(e) => warn!(arena = %handle.id(), error = %e, "arena worker unavailable"),
            }
        }
        arenas.sort_by_key(|arena| arena.id);
        arenas
    }

    /// Open and in-progress arenas.
    pub async fn list_active(&self) -> Vec<Arena> {
        let mut arenas = self.list().await;
        arenas.retain(Arena::is_active);
        arenas
    }

    pub async fn game_view(&self, id: ArenaId, player: &str) -> Result<GameView> {
        let player = PlayerAddress::parse(player)?;
        self.handle(id).await?.view(player).await
    }

    /// Current unit prices (micros) of a trading arena.
    pub async fn prices(&self, id: ArenaId) -> Result<BTreeMap<String, u64>> {
        let handle = self.handle(id).await?;
        if handle.kind() != GameKind::Trading {
            return Err(ArenaError::NotTradingArena(id));
        }
        handle.prices().await
    }

    pub async fn results(&self, id: ArenaId) -> Result<Settlement> {
        self.get(id)
            .await?
            .settlement
            .ok_or(ArenaError::Lifecycle(LifecycleError::NotCompleted))
    }

    /// Removes a settled arena whose payout was delivered.
    pub async fn evict(&self, id: ArenaId) -> Result<()> {
        let record = self.handle(id).await?.record().await?;
        if record.arena.settlement.is_none() || !record.payout_delivered {
            return Err(ArenaError::NotEvictable(id));
        }

        self.inner.arenas.write().await.remove(&id);
        self.inner.ctx.repository.delete(id)?;
        self.inner.ctx.metrics.record_eviction();

        info!(arena = %id, "arena evicted");
        self.event_bus()
            .publish(Event::Lifecycle(LifecycleEvent::Evicted { arena_id: id }));
        Ok(())
    }

    pub async fn stats(&self) -> RegistryStats {
        let arenas = self.list().await;
        let count = |status: ArenaStatus| arenas.iter().filter(|a| a.status == status).count();

        RegistryStats {
            open: count(ArenaStatus::Open),
            in_progress: count(ArenaStatus::InProgress),
            completed: count(ArenaStatus::Completed),
            metrics: self.metrics(),
        }
    }

    /// Settles every active arena past its `end_time`. Arenas that never
    /// started settle as refunds. Returns the ids settled by this pass.
    pub async fn sweep_expired(&self, now: i64) -> Vec<ArenaId> {
        let mut settled = Vec::new();
        for arena in self.list_active().await {
            if !arena.is_expired(now) {
                continue;
            }
            let result = match self.handle(arena.id).await {
                Ok(handle) => handle.settle(SettleTrigger::Expired, now).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(_) => settled.push(arena.id),
                Err(e) => warn!(arena = %arena.id, error = %e, "expiry settlement failed"),
            }
        }
        settled
    }

    /// Re-dispatches settled payouts the sink has not acknowledged.
    /// Returns how many were delivered by this pass.
    pub async fn retry_payouts(&self) -> usize {
        let mut delivered = 0;
        for handle in self.handles().await {
            let Ok(record) = handle.record().await else {
                continue;
            };
            if record.arena.settlement.is_none() || record.payout_delivered {
                continue;
            }
            match handle.retry_payout().await {
                Ok(true) => delivered += 1,
                Ok(false) => debug!(arena = %handle.id(), "payout still undelivered"),
                Err(e) => warn!(arena = %handle.id(), error = %e, "payout retry failed"),
            }
        }
        delivered
    }

    /// Evicts delivered arenas settled at least `retention_secs` ago.
    pub async fn evict_completed(&self, now: i64, retention_secs: i64) -> Vec<ArenaId> {
        let mut evicted = Vec::new();
        for arena in self.list().await {
            let Some(settlement) = &arena.settlement else {
                continue;
            };
            if now.saturating_sub(settlement.settled_at) < retention_secs {
                continue;
            }
            match self.evict(arena.id).await {
                Ok(()) => evicted.push(arena.id),
                Err(ArenaError::NotEvictable(_)) => {}
                Err(e) => warn!(arena = %arena.id, error = %e, "eviction failed"),
            }
        }
        evicted
    }

    /// Ticks every running trading arena. Returns how many moved.
    pub async fn tick_prices(&self) -> usize {
        let mut ticked = 0;
        for handle in self.handles().await {
            if handle.kind() != GameKind::Trading {
                continue;
            }
            match handle.tick_prices().await {
                Ok(Some(_)) => ticked += 1,
                Ok(None) => {}
                Err(e) => warn!(arena = %handle.id(), error = %e, "price tick failed"),
            }
        }
        ticked
    }
}
