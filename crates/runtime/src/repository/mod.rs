//! Persistence adapters for arena records.
//!
//! Every arena worker writes its full [`ArenaRecord`] after each accepted
//! mutation, so a restarted runtime resumes from the last applied state.
//! Two backends ship here: an in-memory map for tests and embedded use, and
//! a directory of JSON files for durable deployments.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::FileArenaRepository;
pub use memory::InMemoryArenaRepo;
pub use traits::ArenaRepository;
pub use types::ArenaRecord;
