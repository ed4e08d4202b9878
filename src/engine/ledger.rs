//! Portfolio ledger: the single writer of portfolio state.

use rust_decimal::Decimal;

use crate::models::{Portfolio, Trade};

/// Owns the [`Portfolio`] and applies every capital movement. The execution
/// engine and position monitor mutate portfolio state only through this
/// type, which keeps the balance/invested partition consistent within a
/// tick.
pub struct Ledger {
    portfolio: Portfolio,
}

impl Ledger {
    pub fn new(starting_balance: Decimal) -> Self {
        Self {
            portfolio: Portfolio::new(starting_balance),
        }
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Move capital from balance into invested when a trade opens, so the
    /// same capital cannot be allocated twice across concurrent signals.
    pub fn reserve(&mut self, cost_basis: Decimal) {
        self.portfolio.balance -= cost_basis;
        self.portfolio.invested += cost_basis;
    }

    /// Return settlement proceeds to balance, release the cost basis from
    /// invested, and realize the P&L.
    pub fn settle(&mut self, cost_basis: Decimal, proceeds: Decimal, pnl: Decimal) {
        self.portfolio.balance += proceeds;
        self.portfolio.invested -= cost_basis;
        self.portfolio.profit += pnl;
    }

    /// Recompute the win rate over the full settled set. Left unchanged
    /// until at least one trade has settled.
    pub fn refresh_win_rate(&mut self, trades: &[Trade]) {
        let settled = trades.iter().filter(|t| t.status.is_terminal()).count();
        if settled == 0 {
            return;
        }
        let wins = trades
            .iter()
            .filter(|t| t.status.is_terminal())
            .filter(|t| t.pnl.map_or(false, |p| p > Decimal::ZERO))
            .count();
        self.portfolio.win_rate = wins as f64 / settled as f64 * 100.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TradeSide, TradeStatus};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn settled_trade(pnl: Decimal, status: TradeStatus) -> Trade {
        let mut trade = active_trade();
        trade.status = status;
        trade.pnl = Some(pnl);
        trade
    }

    fn active_trade() -> Trade {
        Trade {
            id: "t".to_string(),
            symbol: "AAPL".to_string(),
            side: TradeSide::Buy,
            entry_price: dec!(100),
            quantity: 10,
            stop_loss: dec!(98),
            take_profit: dec!(106),
            opened_at: Utc::now(),
            status: TradeStatus::Active,
            pnl: None,
            reason: String::new(),
        }
    }

    #[test]
    fn test_reserve_partitions_capital() {
        let mut ledger = Ledger::new(dec!(10000));
        ledger.reserve(dec!(1000));

        assert_eq!(ledger.portfolio().balance, dec!(9000));
        assert_eq!(ledger.portfolio().invested, dec!(1000));
        assert_eq!(ledger.portfolio().equity(), dec!(10000));
    }

    #[test]
    fn test_settle_realizes_pnl() {
        let mut ledger = Ledger::new(dec!(10000));
        ledger.reserve(dec!(1000));
        ledger.settle(dec!(1000), dec!(1065), dec!(65));

        assert_eq!(ledger.portfolio().balance, dec!(10065));
        assert_eq!(ledger.portfolio().invested, Decimal::ZERO);
        assert_eq!(ledger.portfolio().profit, dec!(65));
    }

    #[test]
    fn test_win_rate_ignores_active_trades() {
        let mut ledger = Ledger::new(dec!(10000));
        let trades = vec![
            settled_trade(dec!(5), TradeStatus::Closed),
            settled_trade(dec!(-2), TradeStatus::Stopped),
            settled_trade(dec!(1), TradeStatus::Closed),
            active_trade(),
        ];

        ledger.refresh_win_rate(&trades);

        // 2 of 3 settled trades won; the active trade does not count
        assert!((ledger.portfolio().win_rate - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_win_rate_unchanged_with_no_settled_trades() {
        let mut ledger = Ledger::new(dec!(10000));
        ledger.refresh_win_rate(&[active_trade()]);
        assert_eq!(ledger.portfolio().win_rate, 0.0);

        // An established rate survives a tick with nothing settled
        ledger.refresh_win_rate(&[settled_trade(dec!(5), TradeStatus::Closed)]);
        assert_eq!(ledger.portfolio().win_rate, 100.0);
        ledger.refresh_win_rate(&[]);
        assert_eq!(ledger.portfolio().win_rate, 100.0);
    }
}
