//! Market snapshot model: one symbol's indicator readings for one tick.

use anyhow::{ensure, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Directional bias derived from indicator readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Bullish => "BULLISH",
            Trend::Bearish => "BEARISH",
            Trend::Neutral => "NEUTRAL",
        }
    }

    /// Classify from MACD and RSI readings: positive MACD below overbought
    /// reads bullish, negative MACD above oversold reads bearish.
    pub fn classify(macd: f64, rsi: f64) -> Self {
        if macd > 0.0 && rsi < 70.0 {
            Trend::Bullish
        } else if macd < 0.0 && rsi > 30.0 {
            Trend::Bearish
        } else {
            Trend::Neutral
        }
    }
}

/// One symbol's market state at a single tick.
///
/// Immutable once produced; the feed supplies exactly one per tracked
/// symbol per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Symbol identifier (e.g. "BTC/USD")
    pub symbol: String,

    /// Last traded price
    pub price: Decimal,

    /// Percent change over the reference window
    pub change_pct: f64,

    /// Traded volume
    pub volume: u64,

    /// Relative Strength Index, 0-100
    pub rsi: f64,

    /// MACD value; sign indicates bullish/bearish pressure
    pub macd: f64,

    /// Derived trend classification
    pub trend: Trend,
}

impl MarketSnapshot {
    /// Enforce feed-boundary invariants. The engine assumes validated
    /// input, so a feed must reject malformed snapshots before they
    /// reach the tick loop.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.price > Decimal::ZERO,
            "snapshot for {} has non-positive price {}",
            self.symbol,
            self.price
        );
        ensure!(
            (0.0..=100.0).contains(&self.rsi),
            "snapshot for {} has RSI {} outside [0, 100]",
            self.symbol,
            self.rsi
        );
        ensure!(
            self.macd.is_finite() && self.change_pct.is_finite(),
            "snapshot for {} has non-finite indicator readings",
            self.symbol
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot(price: Decimal, rsi: f64) -> MarketSnapshot {
        MarketSnapshot {
            symbol: "BTC/USD".to_string(),
            price,
            change_pct: 1.2,
            volume: 500_000,
            rsi,
            macd: 0.4,
            trend: Trend::classify(0.4, rsi),
        }
    }

    #[test]
    fn test_trend_classification() {
        assert_eq!(Trend::classify(0.5, 50.0), Trend::Bullish);
        assert_eq!(Trend::classify(-0.5, 50.0), Trend::Bearish);
        // Positive MACD but overbought: no bullish read
        assert_eq!(Trend::classify(0.5, 75.0), Trend::Neutral);
        // Negative MACD but oversold: no bearish read
        assert_eq!(Trend::classify(-0.5, 25.0), Trend::Neutral);
        assert_eq!(Trend::classify(0.0, 50.0), Trend::Neutral);
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        assert!(snapshot(dec!(45000), 55.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_price() {
        assert!(snapshot(Decimal::ZERO, 55.0).validate().is_err());
        assert!(snapshot(dec!(-1), 55.0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_rsi_out_of_range() {
        assert!(snapshot(dec!(100), 101.0).validate().is_err());
        assert!(snapshot(dec!(100), -0.5).validate().is_err());
    }
}
