//! File-based repository implementations.

mod arena;

pub use arena::FileArenaRepository;
