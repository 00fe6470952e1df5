//! Fallback pack loader.

use std::path::Path;

use crate::fallback::FallbackPack;
use crate::loaders::{LoadResult, read_file};

/// Loader for fallback payload packs from RON files.
pub struct PackLoader;

impl PackLoader {
    /// Load and validate a fallback pack.
    ///
    /// A pack with any structurally invalid payload is rejected as a whole.
    pub fn load(path: &Path) -> LoadResult<FallbackPack> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<FallbackPack> {
        let pack: FallbackPack = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse fallback pack RON: {}", e))?;
        pack.validate()
            .map_err(|e| anyhow::anyhow!("Invalid fallback pack: {}", e))?;

        Ok(pack)
    }
}
