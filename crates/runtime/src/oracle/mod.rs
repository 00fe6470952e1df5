//! Content adapters that feed arenas their payloads.

mod payload;

pub use payload::{PayloadOracle, SourcedPayload};
