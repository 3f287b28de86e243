//! Command-line front end for the analyst swarm and watchlist
//!
//! `swarm analyze` runs the four-agent swarm over a stock snapshot read from
//! disk and prints the consensus; `swarm watch` evaluates a condition file
//! against one metrics sample.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use swarm_agents::{AgentSwarm, Fundamentals, IndicatorSet, StockSnapshot, SwarmEvent, SwarmRequest};
use swarm_core::{AgentStatus, Market};
use swarm_llm::{ChatClient, ChatConfig};
use swarm_watchlist::{TickerMetrics, WatchCondition, WatchlistItem, WatchlistStore};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "swarm")]
#[command(about = "Multi-agent stock analysis and watchlist alerts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the four analyst agents over one ticker and print the consensus
    Analyze {
        /// Ticker symbol, e.g. AAPL or 005930
        ticker: String,
        /// Market the ticker trades on (us or kr)
        #[arg(short, long, default_value = "us")]
        market: Market,
        /// Stock snapshot JSON (quote, listing info, OHLCV history)
        #[arg(short, long)]
        snapshot: PathBuf,
        /// Fundamentals JSON, routed to the fundamental agent
        #[arg(short, long)]
        fundamentals: Option<PathBuf>,
        /// Technical indicator JSON, routed to the technical agent
        #[arg(short, long)]
        indicators: Option<PathBuf>,
        /// Print each agent's full analysis text, not only the consensus
        #[arg(long)]
        full: bool,
    },
    /// Evaluate a watch condition file against one metrics sample
    Watch {
        /// Ticker symbol the conditions are armed on
        ticker: String,
        /// Market the ticker trades on (us or kr)
        #[arg(short, long, default_value = "us")]
        market: Market,
        /// JSON array of conditions, e.g. [{"type":"price_above","threshold":230}]
        #[arg(short, long)]
        conditions: PathBuf,
        /// Last price
        #[arg(long)]
        price: f64,
        /// Day change percentage
        #[arg(long, default_value_t = 0.0)]
        change: f64,
        /// RSI(14), if known
        #[arg(long)]
        rsi: Option<f64>,
        /// Session volume, if known
        #[arg(long)]
        volume: Option<f64>,
        /// Average volume, if known
        #[arg(long)]
        avg_volume: Option<f64>,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze { ticker, market, snapshot, fundamentals, indicators, full } => {
            analyze(&ticker, market, &snapshot, fundamentals.as_deref(), indicators.as_deref(), full)
                .await
        }
        Command::Watch { ticker, market, conditions, price, change, rsi, volume, avg_volume } => {
            watch(&ticker, market, &conditions, TickerMetrics {
                price,
                change_percent: change,
                rsi,
                volume,
                avg_volume,
            })
        }
    }
}

async fn analyze(
    ticker: &str,
    market: Market,
    snapshot_path: &Path,
    fundamentals_path: Option<&Path>,
    indicators_path: Option<&Path>,
    full: bool,
) -> anyhow::Result<()> {
    let snapshot: StockSnapshot = read_json(snapshot_path)?;

    let mut request = SwarmRequest::new(ticker, market, snapshot.format_context());
    if let Some(path) = fundamentals_path {
        let fundamentals: Fundamentals = read_json(path)?;
        request = request.with_fundamentals(fundamentals.format_context());
    }
    if let Some(path) = indicators_path {
        let indicators: IndicatorSet = read_json(path)?;
        request = request.with_indicators(indicators.format_context());
    }

    let config = ChatConfig::from_env().context("configuring the completion backend")?;
    let client = ChatClient::new(config)?;
    let swarm = Arc::new(AgentSwarm::new(Arc::new(client)));

    // Ctrl-C aborts all four agents; the run returns without a consensus
    {
        let swarm = Arc::clone(&swarm);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, cancelling swarm");
                swarm.cancel_swarm();
            }
        });
    }

    let mut events = swarm.subscribe();
    let progress = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                SwarmEvent::AgentUpdate(result) => match result.status {
                    AgentStatus::Done => {
                        println!(
                            "[{}] done: {} (confidence {}%)",
                            result.kind, result.meta.signal, result.meta.confidence
                        );
                    }
                    AgentStatus::Error => {
                        println!(
                            "[{}] failed: {}",
                            result.kind,
                            result.error.as_deref().unwrap_or("unknown error")
                        );
                    }
                    AgentStatus::Streaming => {}
                },
                SwarmEvent::Completed(_) | SwarmEvent::Cancelled => break,
            }
        }
    });

    let outcome = swarm.run_swarm(request).await?;
    let _ = progress.await;

    match outcome {
        Some(consensus) => {
            println!("\n{}", consensus.summary);
            println!(
                "Overall: {} | avg confidence {}% | {} bullish / {} bearish / {} neutral",
                consensus.overall_signal,
                consensus.avg_confidence,
                consensus.bull_count,
                consensus.bear_count,
                consensus.neutral_count(),
            );
            if full {
                for agent in &consensus.agents {
                    println!("\n===== {} =====\n{}", agent.kind, agent.text);
                }
            }
        }
        None => println!("\nAnalysis cancelled; no consensus produced."),
    }
    Ok(())
}

fn watch(
    ticker: &str,
    market: Market,
    conditions_path: &Path,
    metrics: TickerMetrics,
) -> anyhow::Result<()> {
    let conditions: Vec<WatchCondition> = read_json(conditions_path)?;

    let mut store = WatchlistStore::new();
    store.add_item(WatchlistItem::new(ticker, ticker, market, conditions));

    let fired = store.check(&HashMap::from([(ticker.to_string(), metrics)]));
    if fired.is_empty() {
        println!("No conditions fired for {ticker}.");
    } else {
        for alert in &fired {
            println!("ALERT {}", alert.message);
        }
    }
    Ok(())
}
