//! In-memory repository implementations.

mod arena;

pub use arena::InMemoryArenaRepo;
