//! Rule-based signal generation from market snapshots.
//!
//! Rules are evaluated in a fixed order and the first match wins. A bounded
//! random jitter is applied to the confidence score only, never to the
//! action, so equal-confidence signals do not tie at runtime.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{MarketSnapshot, Signal, SignalAction, Trend};

use super::EngineConfig;

/// Bounded randomness source for confidence jitter.
///
/// Injectable so a run can be reproduced from a seed and tests can pin
/// exact confidence values.
pub trait Jitter: Send {
    /// Uniform sample in `[0, span)`.
    fn sample(&mut self, span: f64) -> f64;
}

/// Seedable jitter backed by `StdRng`.
pub struct SeededJitter {
    rng: StdRng,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Jitter for SeededJitter {
    fn sample(&mut self, span: f64) -> f64 {
        self.rng.gen_range(0.0..span)
    }
}

/// Rule engine turning one snapshot into one signal per tick.
pub struct SignalGenerator {
    config: EngineConfig,
    jitter: Box<dyn Jitter>,
}

impl SignalGenerator {
    pub fn new(config: EngineConfig, jitter: Box<dyn Jitter>) -> Self {
        Self { config, jitter }
    }

    /// Create with a seeded jitter source for reproducible runs.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self::new(config, Box::new(SeededJitter::new(seed)))
    }

    /// Evaluate the rule set against one snapshot.
    pub fn generate(&mut self, snapshot: &MarketSnapshot) -> Signal {
        let (action, confidence, reason) = self.evaluate_rules(snapshot);
        let entry_price = snapshot.price;
        let (stop_loss, take_profit) = self.price_targets(action, entry_price);

        debug!(
            symbol = %snapshot.symbol,
            action = action.as_str(),
            confidence = confidence,
            "Signal generated"
        );

        Signal {
            symbol: snapshot.symbol.clone(),
            action,
            confidence,
            reason: reason.to_string(),
            entry_price,
            stop_loss,
            take_profit,
            risk_reward: self.config.risk_reward(),
        }
    }

    /// First matching rule wins; only the fallback emits a hold.
    fn evaluate_rules(&mut self, snapshot: &MarketSnapshot) -> (SignalAction, f64, &'static str) {
        if snapshot.rsi < 30.0 && snapshot.trend == Trend::Bullish {
            (
                SignalAction::Buy,
                80.0 + self.jitter.sample(15.0),
                "Oversold + Bullish trend detected (RSI < 30)",
            )
        } else if snapshot.rsi > 70.0 && snapshot.trend == Trend::Bearish {
            (
                SignalAction::Sell,
                75.0 + self.jitter.sample(15.0),
                "Overbought + Bearish trend detected (RSI > 70)",
            )
        } else if snapshot.macd > 0.5 && snapshot.change_pct > 2.0 {
            (
                SignalAction::Buy,
                70.0 + self.jitter.sample(20.0),
                "Strong MACD signal + Positive momentum",
            )
        } else if snapshot.macd < -0.5 && snapshot.change_pct < -2.0 {
            (
                SignalAction::Sell,
                70.0 + self.jitter.sample(20.0),
                "Weak MACD signal + Negative momentum",
            )
        } else {
            (
                SignalAction::Hold,
                50.0 + self.jitter.sample(20.0),
                "Market conditions unclear - Hold position",
            )
        }
    }

    /// Boundary prices relative to entry. Buys take the long-side targets;
    /// everything else takes the short-side targets (holds carry them for
    /// display but are never executed).
    fn price_targets(&self, action: SignalAction, entry: Decimal) -> (Decimal, Decimal) {
        let stop = self.config.stop_loss_pct;
        let take = self.config.take_profit_pct;
        match action {
            SignalAction::Buy => (
                entry * (Decimal::ONE - stop),
                entry * (Decimal::ONE + take),
            ),
            _ => (
                entry * (Decimal::ONE + stop),
                entry * (Decimal::ONE - take),
            ),
        }
    }
}
