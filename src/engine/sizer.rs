//! Position sizing under a fixed fractional-risk budget.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::EngineConfig;

/// Sizes new positions from the configured slice of available balance.
pub struct RiskSizer {
    config: EngineConfig,
}

impl RiskSizer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Whole units affordable with the allocation slice of the current
    /// balance. Sizing always draws on uninvested balance, never on
    /// invested capital or total equity. Zero means the trade is declined.
    pub fn quantity(&self, balance: Decimal, entry_price: Decimal) -> u64 {
        if entry_price <= Decimal::ZERO || balance <= Decimal::ZERO {
            return 0;
        }
        let budget = balance * self.config.allocation_fraction;
        (budget / entry_price).floor().to_u64().unwrap_or(0)
    }
}
