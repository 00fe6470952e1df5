//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, workers, or infrastructure.

pub mod errors;
pub mod generator;
pub mod handle;
pub mod payout;
pub mod registry;

pub use errors::{ArenaError, Result};
pub use generator::{
    GenerateRequest, GeneratorError, PayloadGenerator, StaticGenerator, UnavailableGenerator,
};
pub use handle::ArenaHandle;
pub use payout::{LogPayoutSink, Payout, PayoutError, PayoutSink};
pub use registry::{ArenaRegistry, RegistryStats};
