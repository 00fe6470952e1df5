//! File-based ArenaRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use arena_core::ArenaId;

use crate::repository::{ArenaRecord, ArenaRepository, RepositoryError, Result};

/// File-based implementation of ArenaRepository.
///
/// # File Format
///
/// Records are stored as `arena_{id}.json`, one file per arena. Writes go to
/// a temp file first and are renamed into place, so a crash mid-write never
/// leaves a truncated record behind.
pub struct FileArenaRepository {
    base_dir: PathBuf,
}

impl FileArenaRepository {
    /// Create a new file-based arena repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    fn record_path(&self, id: ArenaId) -> PathBuf {
        self.base_dir.join(format!("arena_{}.json", id))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl ArenaRepository for FileArenaRepository {
    fn save(&self, record: &ArenaRecord) -> Result<()> {
        let path = self.record_path(record.id());
        let temp_path = path.with_extension("json.tmp");

        let bytes =
            serde_json::to_vec_pretty(record).map_err(|e| RepositoryError::Json(e.to_string()))?;

        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;

        // Atomic rename
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!("Saved arena[{}] to {}", record.id(), path.display());

        Ok(())
    }

    fn load(&self, id: ArenaId) -> Result<Option<ArenaRecord>> {
        let path = self.record_path(id);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let record: ArenaRecord = serde_json::from_slice(&bytes)
            .map_err(|e| RepositoryError::CorruptedData(format!("{}: {}", path.display(), e)))?;

        if record.id() != id {
            return Err(RepositoryError::CorruptedData(format!(
                "{} holds arena {}",
                path.display(),
                record.id()
            )));
        }

        Ok(Some(record))
    }

    fn delete(&self, id: ArenaId) -> Result<()> {
        let path = self.record_path(id);

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted arena[{}]", id);
        }

        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<ArenaId>> {
        let mut ids = Vec::new();

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;

        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id_str) = filename
                    .strip_prefix("arena_")
                    .and_then(|s| s.strip_suffix(".json"))
                && let Ok(id) = id_str.parse::<u64>()
            {
                ids.push(ArenaId(id));
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }
}
