//! Session performance metrics computed over settled trades.

mod calculator;

pub use calculator::{MetricsCalculator, SessionMetrics};
