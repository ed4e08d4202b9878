//! Rule-Based Paper-Trading Agent
//!
//! Evaluates streaming market snapshots, emits directional signals with
//! confidence scores, and manages the lifecycle of simulated positions
//! under stop-loss/take-profit risk management.

mod agent;
mod engine;
mod feed;
mod metrics;
mod models;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::agent::{AgentConfig, TradingAgent};
use crate::engine::{EngineConfig, SeededJitter, SignalGenerator};
use crate::feed::{MarketFeed, SyntheticFeed};
use crate::metrics::MetricsCalculator;

/// Paper-trading agent CLI.
#[derive(Parser)]
#[command(name = "tradeagent")]
#[command(about = "Simulated trading driven by rule-based market signals", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the trading agent against the synthetic market feed
    Run {
        /// Starting balance in USD
        #[arg(short, long, env = "AGENT_BALANCE", default_value = "10000")]
        balance: f64,

        /// Seconds between evaluation ticks
        #[arg(short, long, default_value = "3")]
        interval: u64,

        /// Stop after this many ticks (runs until Ctrl+C when omitted)
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Seed for the market feed and confidence jitter (random when omitted)
        #[arg(short, long, env = "AGENT_SEED")]
        seed: Option<u64>,
    },

    /// Generate one round of signals without trading
    Scan {
        /// Seed for the market feed and confidence jitter
        #[arg(short, long, env = "AGENT_SEED")]
        seed: Option<u64>,

        /// Emit the signal set as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the engine configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run {
            balance,
            interval,
            ticks,
            seed,
        } => {
            let config = AgentConfig {
                starting_balance: Decimal::try_from(balance)?,
                tick_interval_secs: interval,
                max_ticks: ticks,
                engine: EngineConfig::default(),
            };

            let (feed, generator): (Box<dyn MarketFeed>, SignalGenerator) = match seed {
                Some(seed) => (
                    Box::new(SyntheticFeed::new(seed)),
                    SignalGenerator::with_seed(config.engine.clone(), seed),
                ),
                None => (
                    Box::new(SyntheticFeed::from_entropy()),
                    SignalGenerator::new(
                        config.engine.clone(),
                        Box::new(SeededJitter::from_entropy()),
                    ),
                ),
            };

            let mut agent = TradingAgent::new(config, feed, generator);
            let mut view_rx = agent.subscribe();

            println!("\n=== Paper-Trading Agent ===");
            println!("Starting balance: ${balance:.2}");
            println!("Tick interval:    {interval}s");
            match seed {
                Some(seed) => println!("Seed:             {seed}"),
                None => println!("Seed:             (entropy)"),
            }
            println!("\nThis is SIMULATED trading - no real money involved.");
            println!("Press Ctrl+C to stop.\n");

            // Display sink: one status line per published tick
            let printer = tokio::spawn(async move {
                while view_rx.changed().await.is_ok() {
                    let view = view_rx.borrow_and_update().clone();
                    let active = view.trades.iter().filter(|t| t.is_active()).count();
                    println!(
                        "[{}] Tick {} | Balance: ${:.2} | Invested: ${:.2} | P&L: ${:.2} | Win Rate: {:.1}% | Active: {} | Trades: {}",
                        chrono::Local::now().format("%H:%M:%S"),
                        view.tick,
                        view.portfolio.balance,
                        view.portfolio.invested,
                        view.portfolio.profit,
                        view.portfolio.win_rate,
                        active,
                        view.trades.len(),
                    );
                }
            });

            if let Err(e) = agent.run().await {
                tracing::error!(error = %e, "Agent error");
            }
            printer.abort();

            // Final summary
            let view = agent.view();
            println!("\n=== Portfolio ===");
            println!("Balance:   ${:.2}", view.portfolio.balance);
            println!("Invested:  ${:.2}", view.portfolio.invested);
            println!("Profit:    ${:.2}", view.portfolio.profit);
            println!("Win Rate:  {:.1}%", view.portfolio.win_rate);
            println!();
            println!("{}", MetricsCalculator::calculate(&view.trades));

            if !view.trades.is_empty() {
                println!("--- Recent Trades ---");
                for trade in view.trades.iter().take(10) {
                    let pnl = trade
                        .pnl
                        .map(|p| format!("${p:.2}"))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "  {:<8} {:<4} {:>4} @ {:>10.2} [{:<7}] {:>10}  {}",
                        trade.symbol,
                        trade.side.as_str(),
                        trade.quantity,
                        trade.entry_price,
                        trade.status.as_str(),
                        pnl,
                        truncate(&trade.reason, 42),
                    );
                }
            }
        }

        Commands::Scan { seed, json } => {
            let mut feed = match seed {
                Some(seed) => SyntheticFeed::new(seed),
                None => SyntheticFeed::from_entropy(),
            };
            let mut generator = match seed {
                Some(seed) => SignalGenerator::with_seed(EngineConfig::default(), seed),
                None => SignalGenerator::new(
                    EngineConfig::default(),
                    Box::new(SeededJitter::from_entropy()),
                ),
            };

            let snapshots = feed.next_tick()?;
            let signals: Vec<_> = snapshots.iter().map(|s| generator.generate(s)).collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&signals)?);
                return Ok(());
            }

            info!(symbols = snapshots.len(), "Scanning market");

            println!(
                "\n{:<10} {:<6} {:>6} {:>12} {:>12} {:>12}  REASON",
                "SYMBOL", "ACTION", "CONF", "ENTRY", "STOP", "TARGET"
            );
            println!("{}", "-".repeat(100));

            for signal in &signals {
                println!(
                    "{:<10} {:<6} {:>5.1}% {:>12.2} {:>12.2} {:>12.2}  {}",
                    signal.symbol,
                    signal.action.as_str(),
                    signal.confidence,
                    signal.entry_price,
                    signal.stop_loss,
                    signal.take_profit,
                    truncate(&signal.reason, 44),
                );
            }
        }

        Commands::Config => {
            let config = EngineConfig::default();
            let agent = AgentConfig::default();

            println!("\n=== Engine Configuration ===\n");
            println!("Execution:");
            println!("  Min Confidence:       {:.0}%", config.min_confidence);
            println!(
                "  Allocation Fraction:  {}%",
                config.allocation_fraction * Decimal::from(100)
            );

            println!("\nExit Boundaries:");
            println!(
                "  Stop Loss:            {}%",
                config.stop_loss_pct * Decimal::from(100)
            );
            println!(
                "  Take Profit:          {}%",
                config.take_profit_pct * Decimal::from(100)
            );
            println!("  Risk/Reward:          {:.1}:1", config.risk_reward());

            println!("\nScheduler:");
            println!("  Tick Interval:        {}s", agent.tick_interval_secs);
            println!("  Starting Balance:     ${}", agent.starting_balance);
        }
    }

    Ok(())
}

/// Truncate a string with ellipsis if too long.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
