//! Runtime configuration and environment loading.

use std::env;
use std::time::Duration;

use arena_core::GameConfig;

/// Runtime configuration shared across the registry and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    /// Per-arena command queue depth.
    pub command_buffer_size: usize,
    pub sweep_interval: Duration,
    pub price_tick_interval: Duration,
    /// Upper bound on a single generator call before the fallback is used.
    pub generator_timeout: Duration,
    pub platform_fee_bps: u32,
    /// Start arenas as soon as `min_players` have joined (default: false)
    pub auto_start: bool,
    /// Fixed root seed for reproducible runs; random per arena when unset.
    pub rng_seed: Option<u64>,
    /// How long settled and paid-out arenas stay queryable before eviction.
    pub retention: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 256,
            command_buffer_size: 32,
            sweep_interval: Duration::from_millis(5_000),
            price_tick_interval: Duration::from_millis(3_000),
            generator_timeout: Duration::from_millis(8_000),
            platform_fee_bps: 200,
            auto_start: false,
            rng_seed: None,
            retention: Duration::from_secs(3_600),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_SWEEP_INTERVAL_MS` - Expiry sweep interval (default: 5000)
    /// - `ARENA_PRICE_TICK_MS` - Trading price tick interval (default: 3000)
    /// - `ARENA_GENERATOR_TIMEOUT_MS` - Generator call bound (default: 8000)
    /// - `ARENA_PLATFORM_FEE_BPS` - Fee taken from each prize pool (default: 200)
    /// - `ARENA_COMMAND_BUFFER` - Per-arena command queue size (default: 32)
    /// - `ARENA_EVENT_BUFFER` - Per-topic event buffer size (default: 256)
    /// - `ARENA_AUTO_START` - Start on reaching min players (default: false)
    /// - `ARENA_RNG_SEED` - Root RNG seed (default: random)
    /// - `ARENA_RETENTION_SECS` - Completed arena retention (default: 3600)
    /// - `ARENA_STARTING_CASH` - Trading starting cash in whole units (default: 1000)
    /// - `ARENA_TRIVIA_POINTS` - Points per correct answer (default: 100)
    pub fn from_env() -> Self {
        Self::default().override_from_env()
    }

    /// Applies the variables listed on [`RuntimeConfig::from_env`] on top of `self`.
    pub fn override_from_env(self) -> Self {
        let mut config = self;

        if let Some(ms) = read_env::<u64>("ARENA_SWEEP_INTERVAL_MS") {
            config.sweep_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = read_env::<u64>("ARENA_PRICE_TICK_MS") {
            config.price_tick_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = read_env::<u64>("ARENA_GENERATOR_TIMEOUT_MS") {
            config.generator_timeout = Duration::from_millis(ms);
        }
        if let Some(bps) = read_env::<u32>("ARENA_PLATFORM_FEE_BPS") {
            config.platform_fee_bps = bps.min(10_000);
        }
        if let Some(capacity) = read_env::<usize>("ARENA_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("ARENA_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(auto_start) = read_env_bool("ARENA_AUTO_START") {
            config.auto_start = auto_start;
        }
        if let Some(seed) = read_env::<u64>("ARENA_RNG_SEED") {
            config.rng_seed = Some(seed);
        }
        if let Some(secs) = read_env::<u64>("ARENA_RETENTION_SECS") {
            config.retention = Duration::from_secs(secs);
        }

        // Game tuning
        if let Some(units) = read_env::<u64>("ARENA_STARTING_CASH") {
            config.game_config = config.game_config.with_starting_cash_units(units);
        }
        if let Some(points) = read_env::<u32>("ARENA_TRIVIA_POINTS") {
            config.game_config = config.game_config.with_trivia_points(points);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
