//! Arena records and the values that flow through their lifecycle.
//!
//! [`Arena`] owns the roster and the status machine; game-specific state lives
//! in [`crate::games`] and is attached by the runtime once the arena starts.
//! Every transition here is pure: callers pass the current time in.
mod address;
mod arena;
mod settlement;

pub use address::PlayerAddress;
pub use arena::{Amount, Arena, ArenaId, ArenaSpec, ArenaStatus, GameKind, RosterEntry};
pub use settlement::{PlayerResult, ResultDetail, SettleTrigger, Settlement};
