//! Reduces a session's settled trades to summary performance metrics.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use statrs::statistics::Statistics;

use crate::models::{Trade, TradeStatus};

/// Summary statistics for a trading session.
#[derive(Debug, Clone, Default)]
pub struct SessionMetrics {
    /// Number of settled trades
    pub total_trades: usize,

    /// Settled trades with positive P&L
    pub winning_trades: usize,

    /// Settled trades with zero or negative P&L
    pub losing_trades: usize,

    /// Trades settled at the take-profit boundary
    pub targets_hit: usize,

    /// Trades settled at the stop-loss boundary
    pub stops_hit: usize,

    /// Sum of realized P&L
    pub total_pnl: Decimal,

    /// Win rate (0.0 to 1.0)
    pub win_rate: f64,

    /// Average profit on winning trades
    pub avg_win: Decimal,

    /// Average loss on losing trades (absolute value)
    pub avg_loss: Decimal,

    /// Gross profit over gross loss
    pub profit_factor: f64,

    /// Average realized P&L per settled trade
    pub expectancy: Decimal,

    /// Largest peak-to-trough drop of the realized P&L curve
    pub max_drawdown: Decimal,

    /// Per-trade Sharpe ratio (mean over std-dev of trade P&L)
    pub sharpe_ratio: f64,
}

/// Calculator for session metrics.
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Compute metrics from the full trade history; active trades are
    /// ignored.
    pub fn calculate(trades: &[Trade]) -> SessionMetrics {
        let mut metrics = SessionMetrics::default();

        let settled: Vec<&Trade> = trades.iter().filter(|t| t.status.is_terminal()).collect();
        if settled.is_empty() {
            return metrics;
        }

        let pnls: Vec<Decimal> = settled.iter().filter_map(|t| t.pnl).collect();
        let (wins, losses): (Vec<Decimal>, Vec<Decimal>) =
            pnls.iter().copied().partition(|&p| p > Decimal::ZERO);

        metrics.total_trades = settled.len();
        metrics.winning_trades = wins.len();
        metrics.losing_trades = losses.len();
        metrics.targets_hit = settled
            .iter()
            .filter(|t| t.status == TradeStatus::Closed)
            .count();
        metrics.stops_hit = settled
            .iter()
            .filter(|t| t.status == TradeStatus::Stopped)
            .count();
        metrics.total_pnl = pnls.iter().copied().sum();
        metrics.win_rate = wins.len() as f64 / settled.len() as f64;

        if !wins.is_empty() {
            metrics.avg_win = wins.iter().copied().sum::<Decimal>() / Decimal::from(wins.len() as u32);
        }
        if !losses.is_empty() {
            metrics.avg_loss = losses.iter().map(|l| l.abs()).sum::<Decimal>()
                / Decimal::from(losses.len() as u32);
        }

        let gross_profit: Decimal = wins.iter().copied().sum();
        let gross_loss: Decimal = losses.iter().map(|l| l.abs()).sum();
        if gross_loss > Decimal::ZERO {
            metrics.profit_factor =
                gross_profit.to_f64().unwrap_or(0.0) / gross_loss.to_f64().unwrap_or(1.0);
        }

        metrics.expectancy = metrics.total_pnl / Decimal::from(settled.len() as u32);

        Self::calculate_drawdown(&mut metrics, &pnls);
        Self::calculate_sharpe(&mut metrics, &pnls);

        metrics
    }

    /// Largest peak-to-trough drop over the realized P&L curve.
    fn calculate_drawdown(metrics: &mut SessionMetrics, pnls: &[Decimal]) {
        let mut equity = Decimal::ZERO;
        let mut peak = Decimal::ZERO;
        let mut max_dd = Decimal::ZERO;

        for pnl in pnls {
            equity += pnl;
            if equity > peak {
                peak = equity;
            }
            let dd = peak - equity;
            if dd > max_dd {
                max_dd = dd;
            }
        }

        metrics.max_drawdown = max_dd;
    }

    /// Per-trade Sharpe from the P&L series; needs at least two samples.
    fn calculate_sharpe(metrics: &mut SessionMetrics, pnls: &[Decimal]) {
        if pnls.len() < 2 {
            return;
        }

        let returns: Vec<f64> = pnls.iter().filter_map(|p| p.to_f64()).collect();
        let mean = returns.clone().mean();
        let std_dev = returns.std_dev();

        if std_dev > 0.0 {
            metrics.sharpe_ratio = mean / std_dev;
        }
    }
}

impl std::fmt::Display for SessionMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Session Metrics ===")?;
        writeln!(
            f,
            "Settled Trades:  {} ({} targets, {} stops)",
            self.total_trades, self.targets_hit, self.stops_hit
        )?;
        writeln!(
            f,
            "Winners:         {} ({:.1}%)",
            self.winning_trades,
            self.win_rate * 100.0
        )?;
        writeln!(f, "Losers:          {}", self.losing_trades)?;
        writeln!(f, "Total P&L:       ${:.2}", self.total_pnl)?;
        writeln!(f, "Avg Win:         ${:.2}", self.avg_win)?;
        writeln!(f, "Avg Loss:        ${:.2}", self.avg_loss)?;
        writeln!(f, "Profit Factor:   {:.2}", self.profit_factor)?;
        writeln!(f, "Expectancy:      ${:.2}", self.expectancy)?;
        writeln!(f, "Max Drawdown:    ${:.2}", self.max_drawdown)?;
        writeln!(f, "Sharpe (trade):  {:.2}", self.sharpe_ratio)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeSide;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn trade(pnl: Option<Decimal>, status: TradeStatus) -> Trade {
        Trade {
            id: "t".to_string(),
            symbol: "AAPL".to_string(),
            side: TradeSide::Buy,
            entry_price: dec!(100),
            quantity: 1,
            stop_loss: dec!(98),
            take_profit: dec!(106),
            opened_at: Utc::now(),
            status,
            pnl,
            reason: String::new(),
        }
    }

    #[test]
    fn test_basic_pnl_metrics() {
        let trades = vec![
            trade(Some(dec!(100)), TradeStatus::Closed),
            trade(Some(dec!(-50)), TradeStatus::Stopped),
            trade(Some(dec!(200)), TradeStatus::Closed),
            trade(Some(dec!(-30)), TradeStatus::Stopped),
            trade(Some(dec!(150)), TradeStatus::Closed),
            trade(None, TradeStatus::Active),
        ];

        let metrics = MetricsCalculator::calculate(&trades);

        assert_eq!(metrics.total_trades, 5);
        assert_eq!(metrics.winning_trades, 3);
        assert_eq!(metrics.losing_trades, 2);
        assert_eq!(metrics.targets_hit, 3);
        assert_eq!(metrics.stops_hit, 2);
        assert_eq!(metrics.total_pnl, dec!(370));
        assert!((metrics.win_rate - 0.6).abs() < 0.001);
        assert_eq!(metrics.avg_win, dec!(150));
        assert_eq!(metrics.avg_loss, dec!(40));
        assert_eq!(metrics.expectancy, dec!(74));
    }

    #[test]
    fn test_drawdown_over_pnl_curve() {
        let trades = vec![
            trade(Some(dec!(100)), TradeStatus::Closed), // equity 100, peak 100
            trade(Some(dec!(50)), TradeStatus::Closed),  // equity 150, peak 150
            trade(Some(dec!(-80)), TradeStatus::Stopped), // equity 70, dd 80
            trade(Some(dec!(-20)), TradeStatus::Stopped), // equity 50, dd 100
            trade(Some(dec!(100)), TradeStatus::Closed), // recovers
        ];

        let metrics = MetricsCalculator::calculate(&trades);

        assert_eq!(metrics.max_drawdown, dec!(100));
    }

    #[test]
    fn test_empty_history() {
        let metrics = MetricsCalculator::calculate(&[trade(None, TradeStatus::Active)]);

        assert_eq!(metrics.total_trades, 0);
        assert_eq!(metrics.total_pnl, Decimal::ZERO);
        assert_eq!(metrics.win_rate, 0.0);
    }
}
