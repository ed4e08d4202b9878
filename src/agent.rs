//! Agent runner: fixed-cadence tick loop over the decision engine.
//!
//! Each tick is one critical section: pull snapshots, generate signals,
//! open qualifying trades, sweep open trades against the same snapshots,
//! refresh the ledger, then publish the updated view. Tick N+1 never
//! starts before tick N completes, and a tick error halts the loop rather
//! than letting an inconsistent next tick run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, info};

use crate::engine::{EngineConfig, ExecutionEngine, Ledger, PositionMonitor, SignalGenerator};
use crate::feed::MarketFeed;
use crate::models::{MarketSnapshot, Portfolio, Signal, Trade};

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Starting balance in USD
    pub starting_balance: Decimal,

    /// Seconds between evaluation ticks
    pub tick_interval_secs: u64,

    /// Stop after this many ticks; run until shutdown when `None`
    pub max_ticks: Option<u64>,

    /// Engine thresholds and boundary percentages
    pub engine: EngineConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            starting_balance: dec!(10000),
            tick_interval_secs: 3,
            max_ticks: None,
            engine: EngineConfig::default(),
        }
    }
}

/// Everything the engine knows after a tick, published for display sinks.
#[derive(Debug, Clone, Serialize)]
pub struct EngineView {
    /// Ticks completed so far
    pub tick: u64,

    pub portfolio: Portfolio,

    /// Latest signal set, one per tracked symbol
    pub signals: Vec<Signal>,

    /// Full trade history, most recent first
    pub trades: Vec<Trade>,
}

/// Start/stop handle exposed to the control surface.
///
/// `stop` pauses scheduling of further ticks without tearing the agent
/// down; `shutdown` ends the run loop. In-flight ticks always complete.
#[derive(Clone)]
pub struct AgentControls {
    active: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
}

impl AgentControls {
    pub fn start(&self) {
        self.active.store(true, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

/// Drives the decision engine against a market feed on a fixed cadence.
pub struct TradingAgent {
    config: AgentConfig,
    feed: Box<dyn MarketFeed>,
    generator: SignalGenerator,
    executor: ExecutionEngine,
    monitor: PositionMonitor,

    // Engine state, mutated only inside tick()
    ledger: Ledger,
    trades: Vec<Trade>,
    signals: Vec<Signal>,
    tick_count: u64,

    active: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    view_tx: watch::Sender<EngineView>,
}

impl TradingAgent {
    pub fn new(config: AgentConfig, feed: Box<dyn MarketFeed>, generator: SignalGenerator) -> Self {
        let ledger = Ledger::new(config.starting_balance);
        let (view_tx, _) = watch::channel(EngineView {
            tick: 0,
            portfolio: ledger.portfolio().clone(),
            signals: Vec::new(),
            trades: Vec::new(),
        });

        Self {
            executor: ExecutionEngine::new(config.engine.clone()),
            config,
            feed,
            generator,
            monitor: PositionMonitor::new(),
            ledger,
            trades: Vec::new(),
            signals: Vec::new(),
            tick_count: 0,
            active: Arc::new(AtomicBool::new(true)),
            shutdown: Arc::new(AtomicBool::new(false)),
            view_tx,
        }
    }

    /// Handle for toggling and terminating the scheduler.
    pub fn controls(&self) -> AgentControls {
        AgentControls {
            active: self.active.clone(),
            shutdown: self.shutdown.clone(),
        }
    }

    /// Subscribe to the per-tick view stream.
    pub fn subscribe(&self) -> watch::Receiver<EngineView> {
        self.view_tx.subscribe()
    }

    /// Snapshot of the current view.
    pub fn view(&self) -> EngineView {
        self.build_view()
    }

    /// Main scheduling loop. Returns when shut down, when `max_ticks` is
    /// reached, or when a tick fails.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            balance = %self.config.starting_balance,
            interval = self.config.tick_interval_secs,
            "Agent starting"
        );

        // Ctrl+C requests shutdown; the in-flight tick still completes
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
            shutdown.store(true, Ordering::SeqCst);
        });

        let mut ticker = interval(Duration::from_secs(self.config.tick_interval_secs.max(1)));

        while !self.shutdown.load(Ordering::SeqCst) {
            ticker.tick().await;

            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }
            if !self.active.load(Ordering::SeqCst) {
                debug!("Agent inactive, skipping tick");
                continue;
            }

            self.tick().context("tick failed, halting scheduler")?;

            if let Some(max) = self.config.max_ticks {
                if self.tick_count >= max {
                    info!(ticks = self.tick_count, "Reached tick limit");
                    break;
                }
            }
        }

        info!(
            ticks = self.tick_count,
            trades = self.trades.len(),
            profit = %self.ledger.portfolio().profit,
            "Agent stopped"
        );
        Ok(())
    }

    /// One evaluation cycle over the latest snapshots.
    fn tick(&mut self) -> Result<()> {
        let snapshots = self.feed.next_tick()?;

        // Per-symbol lookup, rebuilt each tick for the monitor
        let by_symbol: HashMap<String, MarketSnapshot> = snapshots
            .iter()
            .map(|s| (s.symbol.clone(), s.clone()))
            .collect();

        // 1. Generate one signal per snapshot
        let signals: Vec<Signal> = snapshots
            .iter()
            .map(|s| self.generator.generate(s))
            .collect();

        // 2. Open qualifying trades, newest first in history
        for signal in &signals {
            if let Some(trade) = self.executor.execute(signal, &mut self.ledger) {
                self.trades.insert(0, trade);
            }
        }

        // 3. Sweep open trades against the same snapshot set
        let settled = self
            .monitor
            .sweep(&mut self.trades, &by_symbol, &mut self.ledger);

        // 4. Win rate over the full settled set
        self.ledger.refresh_win_rate(&self.trades);

        self.signals = signals;
        self.tick_count += 1;

        debug!(
            tick = self.tick_count,
            settled,
            balance = %self.ledger.portfolio().balance,
            invested = %self.ledger.portfolio().invested,
            "Tick complete"
        );

        // 5. Publish for display sinks; send only fails with no receivers
        let _ = self.view_tx.send(self.build_view());

        Ok(())
    }

    fn build_view(&self) -> EngineView {
        EngineView {
            tick: self.tick_count,
            portfolio: self.ledger.portfolio().clone(),
            signals: self.signals.clone(),
            trades: self.trades.clone(),
        }
    }
}
