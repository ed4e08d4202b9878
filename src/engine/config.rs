//! Engine configuration.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Thresholds and percentages for signal execution and exit boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum signal confidence (percent) required to open a trade
    pub min_confidence: f64,

    /// Fraction of available balance allocated per trade
    pub allocation_fraction: Decimal,

    /// Stop-loss distance from entry (0.0 to 1.0)
    pub stop_loss_pct: Decimal,

    /// Take-profit distance from entry (0.0 to 1.0)
    pub take_profit_pct: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_confidence: 70.0,              // Execution threshold
            allocation_fraction: dec!(0.10),   // 10% of balance per trade
            stop_loss_pct: dec!(0.02),         // 2% stop loss
            take_profit_pct: dec!(0.06),       // 6% take profit
        }
    }
}

impl EngineConfig {
    /// Take-profit distance over stop-loss distance.
    pub fn risk_reward(&self) -> f64 {
        if self.stop_loss_pct.is_zero() {
            return 0.0;
        }
        (self.take_profit_pct / self.stop_loss_pct)
            .to_f64()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_risk_reward() {
        let config = EngineConfig::default();
        assert!((config.risk_reward() - 3.0).abs() < f64::EPSILON);
    }
}
