//! Static arena content and loaders.
//!
//! This crate houses the built-in fallback payloads used whenever the external
//! generator is unavailable, plus loaders for overriding them from data files:
//! - Fallback packs (trivia, prediction, card decks, market) via RON
//! - Game scoring configuration via TOML
//!
//! Content is consumed by the runtime when an arena starts and is copied into
//! game state; nothing here is mutated at runtime.

pub mod fallback;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use fallback::FallbackPack;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, PackLoader};
