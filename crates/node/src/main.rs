//! Arena engine node entry point.
//!
//! Composition root: loads configuration and content, builds the runtime,
//! optionally seeds demo arenas, and runs until interrupted.
mod logging;
mod seed;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use arena_content::{ContentFactory, FallbackPack, PackLoader};
use arena_runtime::{FileArenaRepository, Runtime, RuntimeConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    logging::setup(env::var_os("ARENA_LOG_DIR").map(PathBuf::from))?;

    let data_dir = env::var_os("ARENA_DATA_DIR").map(PathBuf::from);
    let (config, fallback) = load_content(data_dir.as_ref())?;

    let mut builder = Runtime::builder().config(config).fallback_pack(fallback);
    if let Some(dir) = &data_dir {
        let repository = FileArenaRepository::new(dir.join("arenas"))
            .with_context(|| format!("opening arena store under {}", dir.display()))?;
        info!(path = %repository.base_dir().display(), "using file arena repository");
        builder = builder.repository(repository);
    }
    let runtime = builder.build().await?;

    if read_flag("ARENA_SEED_DEMO") {
        seed::demo_arenas(&runtime.registry()).await?;
    }

    info!(stats = %runtime.metrics(), "arena node running");
    tokio::signal::ctrl_c().await?;

    info!("shutting down");
    runtime.shutdown().await?;
    Ok(())
}

/// Game config and fallback content: `config.toml` and `fallback.ron` from
/// the data directory, an explicit pack path, then environment overrides.
fn load_content(data_dir: Option<&PathBuf>) -> Result<(RuntimeConfig, FallbackPack)> {
    let mut config = RuntimeConfig::default();
    let mut fallback = FallbackPack::builtin();

    if let Some(dir) = data_dir {
        let factory = ContentFactory::new(dir);
        config.game_config = factory.load_config()?;
        fallback = factory.load_fallback()?;
    }
    if let Some(path) = env::var_os("ARENA_FALLBACK_PACK") {
        fallback = PackLoader::load(PathBuf::from(path).as_path())?;
    }

    Ok((config.override_from_env(), fallback))
}

fn read_flag(key: &str) -> bool {
    matches!(
        env::var(key).map(|v| v.to_lowercase()).as_deref(),
        Ok("true" | "1" | "yes" | "on")
    )
}
