//! Repository contract for saving and loading arena records.

use arena_core::ArenaId;

use super::Result;
use super::types::ArenaRecord;

/// Repository for arena persistence.
///
/// Implementations are synchronous; callers are arena workers that persist
/// one small record at a time.
pub trait ArenaRepository: Send + Sync {
    /// Save (insert or overwrite) an arena record
    fn save(&self, record: &ArenaRecord) -> Result<()>;

    /// Load an arena record by id
    fn load(&self, id: ArenaId) -> Result<Option<ArenaRecord>>;

    /// Delete an arena record. Deleting a missing record is not an error.
    fn delete(&self, id: ArenaId) -> Result<()>;

    /// List all stored arena ids, ascending
    fn list_ids(&self) -> Result<Vec<ArenaId>>;

    /// Load every stored record, ascending by id
    fn load_all(&self) -> Result<Vec<ArenaRecord>> {
        let mut records = Vec::new();
        for id in self.list_ids()? {
            if let Some(record) = self.load(id)? {
                records.push(record);
            }
        }
        Ok(records)
    }
}
