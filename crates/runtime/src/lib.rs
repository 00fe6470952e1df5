//! Runtime orchestration for concurrent skill-game arenas.
//!
//! This crate wires the deterministic rules in `arena-core` to per-arena
//! worker tasks, payload sourcing, settlement, persistence, and an event
//! bus. Consumers build a [`Runtime`] and drive arenas through the cloneable
//! [`ArenaRegistry`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`settlement`] turns judgements into prizes and payouts
//! - [`oracle`] and [`repository`] provide content and storage adapters
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod oracle;
pub mod repository;
pub mod runtime;
pub mod settlement;

mod workers;

pub use api::{
    ArenaError, ArenaHandle, ArenaRegistry, GenerateRequest, GeneratorError, LogPayoutSink,
    PayloadGenerator, Payout, PayoutError, PayoutSink, RegistryStats, Result, StaticGenerator,
    UnavailableGenerator,
};
pub use config::RuntimeConfig;
pub use events::{
    Event, EventBus, LifecycleEvent, MarketEvent, SettlementEvent, SubmissionEvent, Topic,
};
pub use oracle::{PayloadOracle, SourcedPayload};
pub use repository::{
    ArenaRecord, ArenaRepository, FileArenaRepository, InMemoryArenaRepo, RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder};
pub use settlement::{SettlementCoordinator, SettlementPhase};
pub use workers::MetricsSnapshot;
