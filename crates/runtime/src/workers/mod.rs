//! Worker tasks that back the runtime orchestration.
//!
//! Each arena gets its own [`ArenaWorker`]; the sweeper and the price ticker
//! run engine-wide on fixed intervals until shutdown.

mod arena;
mod metrics;
mod sweeper;
mod ticker;

pub use arena::{ArenaWorker, Command, WorkerContext};
pub use metrics::{EngineMetrics, MetricsSnapshot};
pub use sweeper::SweeperWorker;
pub use ticker::PriceTicker;
