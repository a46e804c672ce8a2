//! Trendbot
//!
//! Runs one decision pass against the configured Alpaca account and exits.
//! Meant to be invoked periodically by cron or another external scheduler.

use chrono::Utc;
use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use trendbot::config::{get_environment, TradingConfig};
use trendbot::core::{RunContext, TradingRun};
use trendbot::ledger::LedgerStore;
use trendbot::logging;
use trendbot::services::AlpacaProvider;

#[derive(Debug, Parser)]
#[command(
    name = "trendbot",
    about = "SMA trend decision pass for an Alpaca account",
    disable_version_flag = true
)]
struct Cli {
    /// Print the version and exit
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Evaluate and report every decision without submitting orders or saving cooldowns
    #[arg(long)]
    dry_run: bool,

    /// Cooldown store path (overrides STATE_PATH)
    #[arg(long, value_name = "PATH")]
    state: Option<PathBuf>,

    /// Print the run report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if cli.version {
        println!("Stock Bot v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let mut config = TradingConfig::from_env().map_err(|e| {
        error!(error = %e, "Configuration error");
        e
    })?;
    if let Some(state) = cli.state {
        config.state_path = state;
    }

    info!(
        environment = %get_environment(),
        "Starting trendbot v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!(
        watchlist = ?config.strategy.watchlist,
        feed = %config.broker.data_feed,
        short_window = config.strategy.short_window,
        long_window = config.strategy.long_window,
        wait_days = config.strategy.wait_days,
        state = %config.state_path.display(),
        dry_run = cli.dry_run,
        "Configuration loaded"
    );

    let provider = Arc::new(AlpacaProvider::new(&config.broker));
    let ctx = RunContext::new(provider.clone(), provider);
    let store = LedgerStore::new(&config.state_path);
    let run = TradingRun::new(ctx, config.strategy.clone(), store)
        .with_mode(config.broker.mode())
        .with_dry_run(cli.dry_run);

    let report = run.run(Utc::now()).await.map_err(|e| {
        error!(error = %e, "Run aborted");
        e
    })?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }

    info!(
        decisions = report.decisions.len(),
        submitted = report.submitted().count(),
        "Run complete"
    );
    Ok(())
}
