//! Content factory for loading arena content from a data directory.

use std::path::{Path, PathBuf};

use arena_core::GameConfig;

use crate::fallback::FallbackPack;
use crate::loaders::{ConfigLoader, LoadResult, PackLoader};

/// Content factory that loads all arena content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml     (optional, GameConfig)
/// └── fallback.ron    (optional, FallbackPack)
/// ```
///
/// Missing files fall back to the compiled-in defaults; files that exist but
/// fail to parse are errors.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the fallback pack from `fallback.ron`.
    pub fn load_fallback(&self) -> LoadResult<FallbackPack> {
        let path = self.data_dir.join("fallback.ron");
        if !path.exists() {
            return Ok(FallbackPack::builtin());
        }
        PackLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
