//! High-level runtime orchestrator.
//!
//! The runtime owns the arena registry and the background loops, wires up
//! the shared worker dependencies, and exposes a builder-based API for
//! embedding the engine behind a transport.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::info;

use arena_content::FallbackPack;
use arena_core::{PcgRng, RngOracle};

use crate::api::{ArenaError, ArenaRegistry, LogPayoutSink, PayloadGenerator, PayoutSink, Result};
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, Topic};
use crate::oracle::PayloadOracle;
use crate::repository::{ArenaRepository, InMemoryArenaRepo};
use crate::settlement::SettlementCoordinator;
use crate::workers::{EngineMetrics, MetricsSnapshot, PriceTicker, SweeperWorker, WorkerContext};

/// Main runtime that hosts every arena.
///
/// [`ArenaRegistry`] is the cloneable façade handed to transports.
pub struct Runtime {
    registry: ArenaRegistry,
    event_bus: EventBus,
    shutdown_tx: watch::Sender<bool>,

    // Background workers
    sweeper_handle: JoinHandle<()>,
    ticker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to the registry
    pub fn registry(&self) -> ArenaRegistry {
        self.registry.clone()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Subscribe to events from a specific topic
    pub async fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic).await
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.registry.metrics()
    }

    /// Stops the background loops and releases every arena worker.
    pub async fn shutdown(self) -> Result<()> {
        // Receivers may already be gone if a loop panicked; the join below reports that.
        let _ = self.shutdown_tx.send(true);

        self.sweeper_handle.await.map_err(ArenaError::WorkerJoin)?;
        self.ticker_handle.await.map_err(ArenaError::WorkerJoin)?;

        self.registry.close().await;
        info!("runtime shut down");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    repository: Option<Arc<dyn ArenaRepository>>,
    generator: Option<Arc<dyn PayloadGenerator>>,
    payout_sink: Option<Arc<dyn PayoutSink>>,
    rng: Option<Arc<dyn RngOracle>>,
    fallback: FallbackPack,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            repository: None,
            generator: None,
            payout_sink: None,
            rng: None,
            fallback: FallbackPack::builtin(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Persist arenas through `repository` (default: in-memory)
    pub fn repository(mut self, repository: impl ArenaRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Set the external payload generator (optional)
    ///
    /// Without one, every arena starts from the fallback pack.
    pub fn generator(mut self, generator: impl PayloadGenerator + 'static) -> Self {
        self.generator = Some(Arc::new(generator));
        self
    }

    /// Set the payout sink (default: [`LogPayoutSink`])
    pub fn payout_sink(mut self, sink: impl PayoutSink + 'static) -> Self {
        self.payout_sink = Some(Arc::new(sink));
        self
    }

    pub fn rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Some(Arc::new(rng));
        self
    }

    /// Replace the built-in fallback content
    pub fn fallback_pack(mut self, pack: FallbackPack) -> Self {
        self.fallback = pack;
        self
    }

    /// Restores persisted arenas and spawns the background loops.
    pub async fn build(self) -> Result<Runtime> {
        let config = self.config;
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemoryArenaRepo::new()));
        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let metrics = Arc::new(EngineMetrics::new());

        let oracle = PayloadOracle::new(
            self.generator,
            self.fallback,
            config.generator_timeout,
            Arc::clone(&metrics),
        );
        let settlement = SettlementCoordinator::new(
            config.platform_fee_bps,
            self.payout_sink.unwrap_or_else(|| Arc::new(LogPayoutSink)),
        );

        let ctx = WorkerContext {
            config: config.game_config.clone(),
            auto_start: config.auto_start,
            repository: Arc::clone(&repository),
            oracle: Arc::new(oracle),
            settlement: Arc::new(settlement),
            rng: self.rng.unwrap_or_else(|| Arc::new(PcgRng)),
            event_bus: event_bus.clone(),
            metrics,
        };

        let registry = ArenaRegistry::new(ctx, config.command_buffer_size, config.rng_seed);
        let restored = registry.restore(repository.load_all()?).await;
        if restored > 0 {
            info!(restored, "restored arenas from repository");
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sweeper = SweeperWorker::new(
            registry.clone(),
            config.sweep_interval,
            config.retention,
            shutdown_rx.clone(),
        );
        let ticker = PriceTicker::new(registry.clone(), config.price_tick_interval, shutdown_rx);

        Ok(Runtime {
            registry,
            event_bus,
            shutdown_tx,
            sweeper_handle: tokio::spawn(sweeper.run()),
            ticker_handle: tokio::spawn(ticker.run()),
        })
    }
}
