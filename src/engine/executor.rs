//! Execution engine: turns qualifying signals into open trades.

use tracing::{debug, info};

use crate::models::{Signal, Trade};

use super::{EngineConfig, Ledger, RiskSizer};

/// Opens positions for signals that clear the confidence threshold.
/// The only creator of trades.
pub struct ExecutionEngine {
    config: EngineConfig,
    sizer: RiskSizer,
}

impl ExecutionEngine {
    pub fn new(config: EngineConfig) -> Self {
        let sizer = RiskSizer::new(config.clone());
        Self { config, sizer }
    }

    /// Open a trade for the signal, reserving its cost basis in the ledger.
    ///
    /// Returns `None` for holds, confidence below the threshold, and
    /// zero-quantity sizings. A declined trade is not an error.
    pub fn execute(&self, signal: &Signal, ledger: &mut Ledger) -> Option<Trade> {
        let side = signal.action.side()?;

        if signal.confidence < self.config.min_confidence {
            debug!(
                symbol = %signal.symbol,
                confidence = signal.confidence,
                threshold = self.config.min_confidence,
                "Signal below execution threshold"
            );
            return None;
        }

        let quantity = self
            .sizer
            .quantity(ledger.portfolio().balance, signal.entry_price);
        if quantity == 0 {
            debug!(
                symbol = %signal.symbol,
                entry = %signal.entry_price,
                balance = %ledger.portfolio().balance,
                "Sized to zero, trade declined"
            );
            return None;
        }

        let trade = Trade::open(signal, side, quantity);
        ledger.reserve(trade.cost_basis());

        info!(
            symbol = %trade.symbol,
            side = trade.side.as_str(),
            quantity = trade.quantity,
            entry = %trade.entry_price,
            stop = %trade.stop_loss,
            target = %trade.take_profit,
            confidence = signal.confidence,
            "Opened trade"
        );

        Some(trade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SignalAction, TradeSide, TradeStatus};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn make_signal(action: SignalAction, confidence: f64, entry: Decimal) -> Signal {
        Signal {
            symbol: "TSLA".to_string(),
            action,
            confidence,
            reason: "Strong MACD signal + Positive momentum".to_string(),
            entry_price: entry,
            stop_loss: entry * dec!(0.98),
            take_profit: entry * dec!(1.06),
            risk_reward: 3.0,
        }
    }

    fn engine() -> ExecutionEngine {
        ExecutionEngine::new(EngineConfig::default())
    }

    #[test]
    fn test_hold_never_executes() {
        let mut ledger = Ledger::new(dec!(10000));
        let signal = make_signal(SignalAction::Hold, 95.0, dec!(100));

        assert!(engine().execute(&signal, &mut ledger).is_none());
        assert_eq!(ledger.portfolio().balance, dec!(10000));
    }

    #[test]
    fn test_low_confidence_rejected() {
        let mut ledger = Ledger::new(dec!(10000));
        let signal = make_signal(SignalAction::Buy, 69.9, dec!(100));

        assert!(engine().execute(&signal, &mut ledger).is_none());
    }

    #[test]
    fn test_threshold_confidence_executes() {
        let mut ledger = Ledger::new(dec!(10000));
        let signal = make_signal(SignalAction::Buy, 70.0, dec!(100));

        assert!(engine().execute(&signal, &mut ledger).is_some());
    }

    #[test]
    fn test_zero_quantity_declined() {
        let mut ledger = Ledger::new(dec!(10000));
        // 10% of 10000 cannot afford one unit at 45000
        let signal = make_signal(SignalAction::Buy, 90.0, dec!(45000));

        assert!(engine().execute(&signal, &mut ledger).is_none());
        assert_eq!(ledger.portfolio().invested, Decimal::ZERO);
    }

    #[test]
    fn test_open_reserves_capital() {
        let mut ledger = Ledger::new(dec!(10000));
        let signal = make_signal(SignalAction::Buy, 85.0, dec!(100));

        let trade = engine().execute(&signal, &mut ledger).expect("trade opens");

        assert_eq!(trade.quantity, 10);
        assert_eq!(trade.side, TradeSide::Buy);
        assert_eq!(trade.status, TradeStatus::Active);
        assert_eq!(trade.stop_loss, dec!(98.00));
        assert_eq!(trade.take_profit, dec!(106.00));
        assert_eq!(ledger.portfolio().balance, dec!(9000));
        assert_eq!(ledger.portfolio().invested, dec!(1000));
    }

    #[test]
    fn test_sizing_reads_debited_balance() {
        let mut ledger = Ledger::new(dec!(10000));
        let engine = engine();

        let first = engine
            .execute(&make_signal(SignalAction::Buy, 85.0, dec!(100)), &mut ledger)
            .expect("first trade opens");
        assert_eq!(first.quantity, 10);

        // Second signal in the same tick sizes from the remaining 9000
        let second = engine
            .execute(&make_signal(SignalAction::Buy, 85.0, dec!(100)), &mut ledger)
            .expect("second trade opens");
        assert_eq!(second.quantity, 9);
        assert_eq!(ledger.portfolio().balance, dec!(8100));
        assert_eq!(ledger.portfolio().invested, dec!(1900));
    }
}
