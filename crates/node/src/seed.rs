//! Demo arenas, one per game kind, opened at boot.

use anyhow::Result;
use arena_core::{Amount, ArenaSpec, GameKind};
use arena_runtime::ArenaRegistry;
use tracing::info;

const WEI_PER_MILLI: u128 = 1_000_000_000_000_000;
const DEMO_WINDOW_SECS: i64 = 600;

const DEMO_ARENAS: [(GameKind, &str, u128); 4] = [
    (GameKind::Prediction, "Crypto Price Prediction", 100),
    (GameKind::Trivia, "Blockchain Trivia Challenge", 50),
    (GameKind::Trading, "DeFi Trading Competition", 150),
    (GameKind::Strategy, "Smart Contract Strategy Duel", 200),
];

pub async fn demo_arenas(registry: &ArenaRegistry) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    for (kind, title, bet_millis) in DEMO_ARENAS {
        let arena = registry
            .create(ArenaSpec {
                title: title.to_string(),
                kind,
                bet_amount: Amount(bet_millis * WEI_PER_MILLI),
                min_players: 2,
                max_players: 10,
                start_time: now,
                end_time: now + DEMO_WINDOW_SECS,
            })
            .await?;
        info!(arena = %arena.id, %kind, bet = %arena.bet_amount, "seeded demo arena");
    }
    Ok(())
}
