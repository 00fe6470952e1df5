//! Prize computation and payout hand-off for settled arenas.
//!
//! Winner selection lives in `arena-core`; this module turns a
//! [`Judgement`] into the immutable [`Settlement`] stored on the arena and
//! forwards it to the payout sink.

use std::sync::Arc;

use arena_core::{Amount, Arena, Judgement, SettleTrigger, Settlement};

use crate::api::{Payout, PayoutError, PayoutSink};

/// Per-arena settlement state machine. Only moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SettlementPhase {
    Pending,
    /// Winners are being computed; a concurrent trigger must wait for the result.
    Judging,
    Settled,
}

pub struct SettlementCoordinator {
    fee_bps: u32,
    sink: Arc<dyn PayoutSink>,
}

impl SettlementCoordinator {
    pub const BPS_DENOMINATOR: u128 = 10_000;

    pub fn new(fee_bps: u32, sink: Arc<dyn PayoutSink>) -> Self {
        Self {
            fee_bps: fee_bps.min(Self::BPS_DENOMINATOR as u32),
            sink,
        }
    }

    pub fn fee_bps(&self) -> u32 {
        self.fee_bps
    }

    /// Total stakes: bet × roster size.
    pub fn prize_pool(arena: &Arena) -> Amount {
        Amount(
            arena
                .bet_amount
                .base_units()
                .saturating_mul(u128::from(arena.player_count())),
        )
    }

    /// Share for each winner. Refunds return the full stake; otherwise the
    /// platform fee is taken from the pool and the rest split evenly, with
    /// any indivisible remainder left undistributed.
    pub fn prize_per_winner(&self, arena: &Arena, winners: usize, refunded: bool) -> Amount {
        if winners == 0 {
            return Amount::ZERO;
        }
        if refunded {
            return arena.bet_amount;
        }
        let pool = Self::prize_pool(arena).base_units();
        let net = pool / Self::BPS_DENOMINATOR * (Self::BPS_DENOMINATOR - u128::from(self.fee_bps))
            + pool % Self::BPS_DENOMINATOR * (Self::BPS_DENOMINATOR - u128::from(self.fee_bps))
                / Self::BPS_DENOMINATOR;
        Amount(net / winners as u128)
    }

    /// Builds the settlement record for `arena` from a judgement.
    pub fn finalize(
        &self,
        arena: &Arena,
        judgement: Judgement,
        trigger: SettleTrigger,
        now: i64,
    ) -> Settlement {
        let prize_per_winner =
            self.prize_per_winner(arena, judgement.winners.len(), judgement.refunded);

        Settlement {
            winners: judgement.winners,
            results: judgement.results,
            prize_pool: Self::prize_pool(arena),
            prize_per_winner,
            trigger,
            settled_at: now,
            refunded: judgement.refunded,
        }
    }

    pub async fn dispatch(&self, payout: &Payout) -> Result<(), PayoutError> {
        self.sink.dispatch(payout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LogPayoutSink;
    use arena_core::{ArenaId, ArenaSpec, GameKind, PlayerAddress};

    const BET: u128 = 50_000_000_000_000_000; // 0.05 MON in wei

    fn arena(players: u8) -> Arena {
        let spec = ArenaSpec {
            title: "Card Strategy Duel".into(),
            kind: GameKind::Strategy,
            bet_amount: Amount(BET),
            min_players: 2,
            max_players: 10,
            start_time: 0,
            end_time: 600,
        };
        let mut arena = Arena::open(ArenaId(1), spec, 0).unwrap();
        for n in 1..=players {
            let address = PlayerAddress::parse(&format!("0x{:040x}", n)).unwrap();
            arena.admit(address, 0).unwrap();
        }
        arena
    }

    fn coordinator() -> SettlementCoordinator {
        SettlementCoordinator::new(200, Arc::new(LogPayoutSink))
    }

    #[test]
    fn fee_comes_out_of_the_pool() {
        let arena = arena(4);
        assert_eq!(SettlementCoordinator::prize_pool(&arena), Amount(4 * BET));
        // 4 × 0.05 × 0.98 = 0.196
        assert_eq!(
            coordinator().prize_per_winner(&arena, 1, false),
            Amount(196_000_000_000_000_000)
        );
        assert_eq!(
            coordinator().prize_per_winner(&arena, 2, false),
            Amount(98_000_000_000_000_000)
        );
    }

    #[test]
    fn refunds_return_the_stake() {
        let arena = arena(3);
        assert_eq!(coordinator().prize_per_winner(&arena, 3, true), Amount(BET));
        assert_eq!(coordinator().prize_per_winner(&arena, 0, false), Amount::ZERO);
    }

    #[test]
    fn fee_is_capped_at_the_whole_pool() {
        let coordinator = SettlementCoordinator::new(50_000, Arc::new(LogPayoutSink));
        assert_eq!(coordinator.fee_bps(), 10_000);
        assert_eq!(coordinator.prize_per_winner(&arena(2), 1, false), Amount::ZERO);
    }
}
