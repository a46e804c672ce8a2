//! Trendbot Diagnostics
//!
//! Checks that the Alpaca credentials work for both trading and market data,
//! without running any trading logic.

use dotenvy::dotenv;
use std::env;
use std::process::ExitCode;

use trendbot::config::BrokerConfig;
use trendbot::diagnostics::run_diagnostics;
use trendbot::logging;
use trendbot::services::AlpacaRestClient;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    logging::init_logging();

    let config = match BrokerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let symbol = env::var("DIAG_SYMBOL")
        .map(|s| s.trim().to_uppercase())
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "PFE".to_string());

    println!("Loaded env:");
    println!("- ALPACA_PAPER={}", config.paper);
    println!("- ALPACA_DATA_FEED={}", config.data_feed);
    println!("- DIAG_SYMBOL={}", symbol);
    println!("- ALPACA_API_KEY present? true");
    println!("- ALPACA_API_SECRET present? true");
    println!();

    let client = AlpacaRestClient::new(&config);
    let report = run_diagnostics(&client, &symbol).await;
    print!("{}", report);

    if report.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
