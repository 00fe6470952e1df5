/// Scoring constants and tunable parameters shared by the four game kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Points for a correct trivia answer.
    pub trivia_points: u32,
    /// Cash each trading portfolio starts with, in micros.
    pub starting_cash: u64,
    /// Maximum relative price move per tick, in basis points.
    pub price_volatility_bps: u32,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Fixed-point scale for trading money: 1 unit = 1_000_000 micros.
    pub const MICROS_PER_UNIT: u64 = 1_000_000;
    /// Cards dealt to each strategy player.
    pub const HAND_SIZE: usize = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TRIVIA_POINTS: u32 = 100;
    pub const DEFAULT_STARTING_CASH_UNITS: u64 = 1_000;
    pub const DEFAULT_PRICE_VOLATILITY_BPS: u32 = 300;
    /// A tick never moves a price by more than 100%.
    pub const MAX_PRICE_VOLATILITY_BPS: u32 = 10_000;

    pub fn new() -> Self {
        Self {
            trivia_points: Self::DEFAULT_TRIVIA_POINTS,
            starting_cash: Self::DEFAULT_STARTING_CASH_UNITS * Self::MICROS_PER_UNIT,
            price_volatility_bps: Self::DEFAULT_PRICE_VOLATILITY_BPS,
        }
    }

    pub fn with_starting_cash_units(mut self, units: u64) -> Self {
        self.starting_cash = units.saturating_mul(Self::MICROS_PER_UNIT);
        self
    }

    pub fn with_trivia_points(mut self, points: u32) -> Self {
        self.trivia_points = points;
        self
    }

    pub fn with_price_volatility_bps(mut self, bps: u32) -> Self {
        self.price_volatility_bps = bps.min(Self::MAX_PRICE_VOLATILITY_BPS);
        self
    }

    /// Pulls out-of-range values loaded from files back into bounds.
    pub fn clamped(self) -> Self {
        let bps = self.price_volatility_bps;
        self.with_price_volatility_bps(bps)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
