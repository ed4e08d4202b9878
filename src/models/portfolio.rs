//! Portfolio model: the capital partition and realized performance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Running portfolio state, owned and mutated only by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    /// Uninvested capital available for sizing new trades
    pub balance: Decimal,

    /// Capital locked in active trades at cost basis
    pub invested: Decimal,

    /// Cumulative realized P&L across settled trades
    pub profit: Decimal,

    /// Percent of settled trades with positive P&L
    pub win_rate: f64,
}

impl Portfolio {
    pub fn new(starting_balance: Decimal) -> Self {
        Self {
            balance: starting_balance,
            invested: Decimal::ZERO,
            profit: Decimal::ZERO,
            win_rate: 0.0,
        }
    }

    /// Total capital across the balance/invested partition.
    pub fn equity(&self) -> Decimal {
        self.balance + self.invested
    }
}
