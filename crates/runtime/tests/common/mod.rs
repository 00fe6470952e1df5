//! Shared fixtures for runtime integration tests.
#![allow(dead_code)]

use std::time::Duration;

use arena_core::{Amount, ArenaSpec, GameKind};
use arena_runtime::{Runtime, RuntimeConfig};

/// 0.05 MON in wei.
pub const BET: u128 = 50_000_000_000_000_000;

pub fn player(n: u8) -> String {
    format!("0x{:040x}", n)
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Background loops effectively disabled so tests drive every transition.
pub fn quiet_config() -> RuntimeConfig {
    RuntimeConfig {
        rng_seed: Some(7),
        sweep_interval: Duration::from_secs(3_600),
        price_tick_interval: Duration::from_secs(3_600),
        generator_timeout: Duration::from_millis(200),
        ..RuntimeConfig::default()
    }
}

pub fn spec(kind: GameKind, min_players: u32, max_players: u32) -> ArenaSpec {
    let start = now();
    ArenaSpec {
        title: format!("{kind} arena"),
        kind,
        bet_amount: Amount(BET),
        min_players,
        max_players,
        start_time: start,
        end_time: start + 600,
    }
}

pub async fn runtime() -> Runtime {
    Runtime::builder()
        .config(quiet_config())
        .build()
        .await
        .expect("runtime should build")
}
