//! In-memory ArenaRepository implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use arena_core::ArenaId;

use crate::repository::{ArenaRecord, ArenaRepository, RepositoryError, Result};

/// In-memory implementation of ArenaRepository.
///
/// Data lives for the lifetime of the process.
#[derive(Default)]
pub struct InMemoryArenaRepo {
    records: RwLock<BTreeMap<ArenaId, ArenaRecord>>,
}

impl InMemoryArenaRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArenaRepository for InMemoryArenaRepo {
    fn save(&self, record: &ArenaRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        records.insert(record.id(), record.clone());
        Ok(())
    }

    fn load(&self, id: ArenaId) -> Result<Option<ArenaRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.get(&id).cloned())
    }

    fn delete(&self, id: ArenaId) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        records.remove(&id);
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<ArenaId>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{Amount, Arena, ArenaSpec, GameKind};

    fn record(id: u64) -> ArenaRecord {
        let spec = ArenaSpec {
            title: "Prediction Market".into(),
            kind: GameKind::Prediction,
            bet_amount: Amount(1),
            min_players: 2,
            max_players: 4,
            start_time: 0,
            end_time: 600,
        };
        ArenaRecord::new(Arena::open(ArenaId(id), spec, 0).unwrap(), id)
    }

    #[test]
    fn save_load_delete() {
        let repo = InMemoryArenaRepo::new();
        repo.save(&record(2)).unwrap();
        repo.save(&record(1)).unwrap();

        assert_eq!(repo.list_ids().unwrap(), vec![ArenaId(1), ArenaId(2)]);
        assert_eq!(repo.load(ArenaId(2)).unwrap(), Some(record(2)));

        repo.delete(ArenaId(2)).unwrap();
        repo.delete(ArenaId(9)).unwrap();
        assert_eq!(repo.load(ArenaId(2)).unwrap(), None);
        assert_eq!(repo.len(), 1);
    }
}
