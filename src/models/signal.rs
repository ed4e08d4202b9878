//! Trading signal model emitted by the rule engine each tick.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TradeSide;

/// What the engine recommends doing about a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

impl SignalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalAction::Buy => "BUY",
            SignalAction::Sell => "SELL",
            SignalAction::Hold => "HOLD",
        }
    }

    /// The trade side this action maps to; `None` for holds.
    pub fn side(&self) -> Option<TradeSide> {
        match self {
            SignalAction::Buy => Some(TradeSide::Buy),
            SignalAction::Sell => Some(TradeSide::Sell),
            SignalAction::Hold => None,
        }
    }
}

/// Directional signal with confidence and price targets for one symbol.
///
/// Derived deterministically from one [`super::MarketSnapshot`] plus the
/// injected confidence jitter; consumed once per tick and not retained
/// beyond the published view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,

    pub action: SignalAction,

    /// Self-reported certainty in percent, 0-100
    pub confidence: f64,

    /// Human-readable rule that fired
    pub reason: String,

    /// Price the trade would enter at
    pub entry_price: Decimal,

    /// Adverse boundary that forces a close
    pub stop_loss: Decimal,

    /// Favorable boundary that realizes the gain
    pub take_profit: Decimal,

    /// Take-profit distance over stop-loss distance
    pub risk_reward: f64,
}
