//! Trade model: a simulated position and its lifecycle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Signal;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

/// Lifecycle state of a trade.
///
/// `Active` transitions exactly once, to `Closed` (take-profit) or
/// `Stopped` (stop-loss). Terminal states never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeStatus {
    Active,
    Closed,
    Stopped,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Active => "ACTIVE",
            TradeStatus::Closed => "CLOSED",
            TradeStatus::Stopped => "STOPPED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TradeStatus::Active)
    }
}

/// A simulated position, created by the execution engine and settled by the
/// position monitor. Trades are never deleted; settled trades are retained
/// for history and win-rate accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade identifier
    pub id: String,

    pub symbol: String,

    pub side: TradeSide,

    /// Price the position was opened at
    pub entry_price: Decimal,

    /// Whole units held, always >= 1
    pub quantity: u64,

    /// Stop boundary, fixed at open and never revised
    pub stop_loss: Decimal,

    /// Target boundary, fixed at open and never revised
    pub take_profit: Decimal,

    pub opened_at: DateTime<Utc>,

    pub status: TradeStatus,

    /// Realized P&L, set exactly once when the trade leaves `Active`
    pub pnl: Option<Decimal>,

    /// Rule text from the originating signal
    pub reason: String,
}

impl Trade {
    /// Open a new position from a signal at the sized quantity.
    pub fn open(signal: &Signal, side: TradeSide, quantity: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            symbol: signal.symbol.clone(),
            side,
            entry_price: signal.entry_price,
            quantity,
            stop_loss: signal.stop_loss,
            take_profit: signal.take_profit,
            opened_at: Utc::now(),
            status: TradeStatus::Active,
            pnl: None,
            reason: signal.reason.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == TradeStatus::Active
    }

    /// Capital allocated at open time.
    pub fn cost_basis(&self) -> Decimal {
        self.entry_price * Decimal::from(self.quantity)
    }

    /// P&L if the position settled at the given price.
    pub fn pnl_at(&self, current_price: Decimal) -> Decimal {
        let quantity = Decimal::from(self.quantity);
        match self.side {
            TradeSide::Buy => (current_price - self.entry_price) * quantity,
            TradeSide::Sell => (self.entry_price - current_price) * quantity,
        }
    }
}
