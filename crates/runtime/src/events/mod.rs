//! Topic-based event bus for arena events.
//!
//! Events are published to specific topics, and consumers (a websocket
//! transport, an indexer, tests) subscribe only to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{LifecycleEvent, MarketEvent, SettlementEvent, SubmissionEvent};
