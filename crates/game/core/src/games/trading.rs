use std::collections::{BTreeMap, HashMap};

use super::{GameRules, JudgeContext, SubmitContext};
use crate::config::GameConfig;
use crate::error::SubmissionError;
use crate::payload::MarketPayload;
use crate::rng::{RngOracle, compute_seed};
use crate::state::{PlayerAddress, PlayerResult, ResultDetail};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TradeSide {
    Buy,
    Sell,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeOrder {
    pub asset: String,
    pub side: TradeSide,
    /// Whole units.
    pub quantity: u64,
}

/// Cash and holdings; all money in micros.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Portfolio {
    pub cash: u64,
    pub holdings: BTreeMap<String, u64>,
}

impl Portfolio {
    pub fn held(&self, asset: &str) -> u64 {
        self.holdings.get(asset).copied().unwrap_or_default()
    }

    /// Cash plus holdings marked at `prices`, saturating at `u64::MAX`.
    pub fn value_at(&self, prices: &BTreeMap<String, u64>) -> u64 {
        let marked: u128 = self
            .holdings
            .iter()
            .map(|(asset, qty)| u128::from(*qty) * u128::from(prices.get(asset).copied().unwrap_or(0)))
            .sum();
        u64::try_from(u128::from(self.cash) + marked).unwrap_or(u64::MAX)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeRecord {
    pub player: PlayerAddress,
    pub asset: String,
    pub side: TradeSide,
    pub quantity: u64,
    /// Unit price the trade executed at, in micros.
    pub price: u64,
    pub at: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeReceipt {
    pub order: TradeOrder,
    pub price: u64,
    /// `price × quantity`, in micros.
    pub notional: u64,
    pub portfolio: Portfolio,
}

/// Shared market plus one portfolio per player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradingState {
    pub starting_cash: u64,
    pub start_prices: BTreeMap<String, u64>,
    /// Current unit prices in micros; moved by [`TradingState::tick`].
    pub prices: BTreeMap<String, u64>,
    pub portfolios: HashMap<PlayerAddress, Portfolio>,
    /// Append-only.
    pub trades: Vec<TradeRecord>,
}

impl TradingState {
    const PPM: i64 = 1_000_000;

    /// Perturbs every price by at most ±`volatility_bps` (capped at
    /// [`GameConfig::MAX_PRICE_VOLATILITY_BPS`]), never below one micro.
    pub fn tick(&mut self, rng: &dyn RngOracle, seed: u64, volatility_bps: u32) {
        let spread = volatility_bps.min(GameConfig::MAX_PRICE_VOLATILITY_BPS) * 100;
        let spread_ppm = i64::from(spread);
        for (context, price) in self.prices.values_mut().enumerate() {
            let draw = rng.range(compute_seed(seed, 0, context as u32), 0, spread * 2);
            let delta_ppm = i64::from(draw) - spread_ppm;
            let scaled = i128::from(*price) * i128::from(Self::PPM + delta_ppm) / i128::from(Self::PPM);
            *price = u64::try_from(scaled.max(1)).unwrap_or(u64::MAX);
        }
    }

    fn quote(&self, asset: &str) -> Result<u64, SubmissionError> {
        self.prices
            .get(asset)
            .copied()
            .ok_or_else(|| SubmissionError::UnknownAsset(asset.to_string()))
    }

    fn pnl(&self, portfolio: &Portfolio) -> i64 {
        let value = i128::from(portfolio.value_at(&self.prices));
        let pnl = value - i128::from(self.starting_cash);
        pnl.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }
}

impl GameRules for TradingState {
    type Payload = MarketPayload;
    type Submission = TradeOrder;
    type Receipt = TradeReceipt;

    fn init(market: MarketPayload, roster: &[PlayerAddress], config: &GameConfig) -> Self {
        let prices: BTreeMap<String, u64> = market
            .assets
            .iter()
            .filter_map(|quote| Some((quote.symbol.clone(), quote.price_micros()?)))
            .collect();
        let empty_holdings: BTreeMap<String, u64> = prices.keys().map(|s| (s.clone(), 0)).collect();

        Self {
            starting_cash: config.starting_cash,
            start_prices: prices.clone(),
            prices,
            portfolios: roster
                .iter()
                .map(|player| {
                    (
                        player.clone(),
                        Portfolio {
                            cash: config.starting_cash,
                            holdings: empty_holdings.clone(),
                        },
                    )
                })
                .collect(),
            trades: Vec::new(),
        }
    }

    fn validate(
        &self,
        player: &PlayerAddress,
        order: &TradeOrder,
        _ctx: &SubmitContext<'_>,
    ) -> Result<(), SubmissionError> {
        let portfolio = self
            .portfolios
            .get(player)
            .ok_or_else(|| SubmissionError::NotAPlayer(player.clone()))?;
        let price = self.quote(&order.asset)?;
        if order.quantity == 0 {
            return Err(SubmissionError::InvalidQuantity);
        }

        match order.side {
            TradeSide::Buy => {
                let required = price.checked_mul(order.quantity).unwrap_or(u64::MAX);
                if required > portfolio.cash {
                    return Err(SubmissionError::InsufficientCash {
                        required,
                        available: portfolio.cash,
                    });
                }
            }
            TradeSide::Sell => {
                let held = portfolio.held(&order.asset);
                if order.quantity > held {
                    return Err(SubmissionError::InsufficientHoldings {
                        requested: order.quantity,
                        held,
                    });
                }
            }
        }
        Ok(())
    }

    fn apply(&mut self, player: &PlayerAddress, order: TradeOrder, ctx: &SubmitContext<'_>) -> TradeReceipt {
        let price = self.prices.get(&order.asset).copied().unwrap_or_default();
        let notional = price.saturating_mul(order.quantity);

        let portfolio = self.portfolios.entry(player.clone()).or_default();
        let held = portfolio.holdings.entry(order.asset.clone()).or_default();
        match order.side {
            TradeSide::Buy => {
                portfolio.cash -= notional;
                *held += order.quantity;
            }
            TradeSide::Sell => {
                *held -= order.quantity;
                portfolio.cash = portfolio.cash.saturating_add(notional);
            }
        }
        let portfolio = portfolio.clone();

        self.trades.push(TradeRecord {
            player: player.clone(),
            asset: order.asset.clone(),
            side: order.side,
            quantity: order.quantity,
            price,
            at: ctx.now,
        });

        TradeReceipt {
            order,
            price,
            notional,
            portfolio,
        }
    }

    fn standings(&mut self, roster: &[PlayerAddress], _ctx: &JudgeContext<'_>) -> Vec<PlayerResult> {
        roster
            .iter()
            .map(|player| {
                let (metric, detail) = match self.portfolios.get(player) {
                    Some(portfolio) => {
                        let pnl = self.pnl(portfolio);
                        (
                            pnl,
                            ResultDetail::Trading {
                                cash: portfolio.cash,
                                portfolio_value: portfolio.value_at(&self.prices),
                                pnl,
                            },
                        )
                    }
                    None => (
                        0,
                        ResultDetail::Trading {
                            cash: 0,
                            portfolio_value: 0,
                            pnl: 0,
                        },
                    ),
                };
                PlayerResult {
                    player: player.clone(),
                    metric,
                    winner: false,
                    detail,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::{player, roster};
    use crate::games::{run_submission, top_scorers};
    use crate::payload::AssetQuote;
    use crate::rng::PcgRng;

    const UNIT: u64 = GameConfig::MICROS_PER_UNIT;

    fn market() -> TradingState {
        let payload = MarketPayload {
            assets: vec![AssetQuote::new("ETH", 100.0), AssetQuote::new("MON", 1.2)],
        };
        TradingState::init(payload, &roster(2), &GameConfig::default())
    }

    fn order(side: TradeSide, asset: &str, quantity: u64) -> TradeOrder {
        TradeOrder {
            asset: asset.into(),
            side,
            quantity,
        }
    }

    fn trade(state: &mut TradingState, n: u8, o: TradeOrder) -> Result<TradeReceipt, SubmissionError> {
        let config = GameConfig::default();
        let ctx = SubmitContext { config: &config, now: 1_700_000_000 };
        run_submission(state, &player(n), o, &ctx)
    }

    #[test]
    fn buy_moves_exact_cash_into_holdings() {
        let mut state = market();
        let receipt = trade(&mut state, 1, order(TradeSide::Buy, "ETH", 2)).unwrap();

        assert_eq!(receipt.notional, 200 * UNIT);
        assert_eq!(receipt.portfolio.cash, 800 * UNIT);
        assert_eq!(receipt.portfolio.held("ETH"), 2);
        assert_eq!(state.trades.len(), 1);
        assert_eq!(state.trades[0].at, 1_700_000_000);
    }

    #[test]
    fn overspending_leaves_portfolio_untouched() {
        let mut state = market();
        trade(&mut state, 1, order(TradeSide::Buy, "ETH", 2)).unwrap();
        let before = state.portfolios[&player(1)].clone();

        assert_eq!(
            trade(&mut state, 1, order(TradeSide::Buy, "ETH", 10)),
            Err(SubmissionError::InsufficientCash {
                required: 1_000 * UNIT,
                available: 800 * UNIT
            })
        );
        assert_eq!(state.portfolios[&player(1)], before);
        assert_eq!(state.trades.len(), 1);
    }

    #[test]
    fn sell_is_the_inverse_of_buy() {
        let mut state = market();
        trade(&mut state, 1, order(TradeSide::Buy, "ETH", 3)).unwrap();
        let receipt = trade(&mut state, 1, order(TradeSide::Sell, "ETH", 3)).unwrap();

        assert_eq!(receipt.portfolio.cash, 1_000 * UNIT);
        assert_eq!(receipt.portfolio.held("ETH"), 0);
        assert_eq!(
            trade(&mut state, 1, order(TradeSide::Sell, "ETH", 1)),
            Err(SubmissionError::InsufficientHoldings { requested: 1, held: 0 })
        );
    }

    #[test]
    fn rejects_unknown_assets_and_zero_quantities() {
        let mut state = market();
        assert_eq!(
            trade(&mut state, 1, order(TradeSide::Buy, "DOGE", 1)),
            Err(SubmissionError::UnknownAsset("DOGE".into()))
        );
        assert_eq!(
            trade(&mut state, 1, order(TradeSide::Buy, "ETH", 0)),
            Err(SubmissionError::InvalidQuantity)
        );
        assert_eq!(
            trade(&mut state, 1, order(TradeSide::Buy, "ETH", u64::MAX)),
            Err(SubmissionError::InsufficientCash {
                required: u64::MAX,
                available: 1_000 * UNIT
            })
        );
    }

    #[test]
    fn ticks_stay_within_volatility_band() {
        let mut state = market();
        for nonce in 0..200 {
            let before = state.prices.clone();
            state.tick(&PcgRng, compute_seed(5, nonce, 0), 300);
            for (asset, price) in &state.prices {
                let old = before[asset] as f64;
                let ratio = *price as f64 / old;
                assert!((0.969..=1.031).contains(&ratio), "{asset} moved by {ratio}");
            }
        }
    }

    #[test]
    fn oversized_volatility_is_capped_at_a_full_swing() {
        let mut state = market();
        for nonce in 0..200 {
            let before = state.prices.clone();
            state.tick(&PcgRng, compute_seed(11, nonce, 0), 50_000);
            for (asset, price) in &state.prices {
                assert!(*price >= 1);
                assert!(*price <= before[asset] * 2, "{asset} more than doubled");
            }
        }
    }

    #[test]
    fn winner_has_the_best_pnl_at_current_prices() {
        let mut state = market();
        trade(&mut state, 1, order(TradeSide::Buy, "ETH", 5)).unwrap();
        state.prices.insert("ETH".into(), 110 * UNIT);

        let ctx = JudgeContext { rng: &PcgRng, seed: 0 };
        let standings = state.standings(&roster(2), &ctx);
        assert_eq!(standings[0].metric, (50 * UNIT) as i64);
        assert_eq!(standings[1].metric, 0);
        assert_eq!(top_scorers(&standings), vec![player(1)]);

        state.prices.insert("ETH".into(), 90 * UNIT);
        let standings = state.standings(&roster(2), &ctx);
        assert_eq!(top_scorers(&standings), vec![player(2)]);
    }
}
