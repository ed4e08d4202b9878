//! Position monitor: drives active trades to settlement against fresh
//! prices.
//!
//! Runs once per tick over the full trade history. Each active trade is
//! evaluated against the latest snapshot for its symbol; trades whose
//! symbol has no snapshot this tick are left untouched rather than judged
//! on a stale price.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::models::{MarketSnapshot, Trade, TradeSide, TradeStatus};

use super::Ledger;

/// Sweeps active trades against stop-loss and take-profit boundaries and
/// realizes P&L into the ledger. The only writer of a trade's terminal
/// fields.
pub struct PositionMonitor;

impl PositionMonitor {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate every active trade once. Returns the number of trades
    /// settled this sweep.
    ///
    /// The stop-loss boundary is checked before take-profit, so a price
    /// that gapped past both in one tick settles the trade as `Stopped`.
    /// Terminal trades are never re-evaluated.
    pub fn sweep(
        &self,
        trades: &mut [Trade],
        snapshots: &HashMap<String, MarketSnapshot>,
        ledger: &mut Ledger,
    ) -> usize {
        let mut settled = 0;

        for trade in trades.iter_mut().filter(|t| t.is_active()) {
            let Some(snapshot) = snapshots.get(&trade.symbol) else {
                continue;
            };
            let current = snapshot.price;

            let status = if stop_hit(trade, current) {
                TradeStatus::Stopped
            } else if target_hit(trade, current) {
                TradeStatus::Closed
            } else {
                continue;
            };

            let pnl = trade.pnl_at(current);
            let proceeds = current * Decimal::from(trade.quantity);
            ledger.settle(trade.cost_basis(), proceeds, pnl);

            trade.status = status;
            trade.pnl = Some(pnl);
            settled += 1;

            match status {
                TradeStatus::Stopped => warn!(
                    symbol = %trade.symbol,
                    side = trade.side.as_str(),
                    price = %current,
                    stop = %trade.stop_loss,
                    pnl = %pnl,
                    "Stop-loss hit, trade stopped"
                ),
                _ => info!(
                    symbol = %trade.symbol,
                    side = trade.side.as_str(),
                    price = %current,
                    target = %trade.take_profit,
                    pnl = %pnl,
                    "Take-profit hit, trade closed"
                ),
            }
        }

        settled
    }
}

impl Default for PositionMonitor {
    fn default() -> Self {
        Self::new()
    }
}

fn stop_hit(trade: &Trade, current: Decimal) -> bool {
    match trade.side {
        TradeSide::Buy => current <= trade.stop_loss,
        TradeSide::Sell => current >= trade.stop_loss,
    }
}

fn target_hit(trade: &Trade, current: Decimal) -> bool {
    match trade.side {
        TradeSide::Buy => current >= trade.take_profit,
        TradeSide::Sell => current <= trade.take_profit,
    }
}
