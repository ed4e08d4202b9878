//! Decision and lifecycle engine: signal rules, sizing, execution,
//! monitoring, and portfolio accounting.

mod config;
mod executor;
mod ledger;
mod monitor;
mod signals;
mod sizer;

pub use config::EngineConfig;
pub use executor::ExecutionEngine;
pub use ledger::Ledger;
pub use monitor::PositionMonitor;
pub use signals::{Jitter, SeededJitter, SignalGenerator};
pub use sizer::RiskSizer;
