//! Environment-driven configuration
//!
//! Read once at startup into an immutable [`TradingConfig`] that is threaded
//! through the engines. Nothing below the binaries reads the environment.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

pub const PAPER_TRADING_URL: &str = "https://paper-api.alpaca.markets";
pub const LIVE_TRADING_URL: &str = "https://api.alpaca.markets";
pub const DATA_URL: &str = "https://data.alpaca.markets";

/// Upper bound on `LOOKBACK_DAYS`, roughly a century of calendar days
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

/// Deployment environment name (`ENVIRONMENT`), used to pick the log format
pub fn get_environment() -> String {
    env::var("ENVIRONMENT")
        .map(|e| e.trim().to_lowercase())
        .ok()
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "sandbox".to_string())
}

/// Which consolidated feed daily bars come from. Affects entitlement only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFeed {
    Iex,
    Sip,
}

impl DataFeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataFeed::Iex => "iex",
            DataFeed::Sip => "sip",
        }
    }
}

impl fmt::Display for DataFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataFeed {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "iex" => Ok(DataFeed::Iex),
            "sip" => Ok(DataFeed::Sip),
            other => Err(ConfigError::invalid(
                "ALPACA_DATA_FEED",
                other,
                "expected 'iex' or 'sip'",
            )),
        }
    }
}

/// API key pair. `Debug` redacts the secret.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Brokerage connection settings
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub credentials: Credentials,
    pub paper: bool,
    pub data_feed: DataFeed,
    pub trading_url: Url,
    pub data_url: Url,
}

/// Signal, sizing and cooldown parameters
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub watchlist: Vec<String>,
    pub short_window: usize,
    pub long_window: usize,
    pub wait_days: i64,
    pub shares_per_trade: u32,
    pub max_shares: u32,
    pub lookback_days: i64,
    pub cash_start: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            watchlist: vec!["PFE".to_string(), "T".to_string()],
            short_window: 50,
            long_window: 200,
            wait_days: 5,
            shares_per_trade: 50,
            max_shares: 300,
            lookback_days: 400,
            cash_start: 10_000.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TradingConfig {
    pub broker: BrokerConfig,
    pub strategy: StrategyConfig,
    pub state_path: PathBuf,
}

impl TradingConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load from an explicit variable map (the process environment in production)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let broker = BrokerConfig::from_vars(vars)?;

        let watchlist = parse_watchlist(lookup(vars, "WATCHLIST").unwrap_or("PFE,T"))?;
        let short_window: usize = parse_or(vars, "SHORT_WINDOW", 50)?;
        let long_window: usize = parse_or(vars, "LONG_WINDOW", 200)?;
        if short_window == 0 {
            return Err(ConfigError::invalid("SHORT_WINDOW", "0", "must be at least 1"));
        }
        if long_window < short_window {
            return Err(ConfigError::invalid(
                "LONG_WINDOW",
                long_window.to_string(),
                format!("must be >= SHORT_WINDOW ({})", short_window),
            ));
        }

        let wait_days: i64 = parse_or(vars, "WAIT_DAYS", 5)?;
        if wait_days < 0 {
            return Err(ConfigError::invalid(
                "WAIT_DAYS",
                wait_days.to_string(),
                "must not be negative",
            ));
        }

        let shares_per_trade: u32 = parse_or(vars, "SHARES_PER_TRADE", 50)?;
        if shares_per_trade == 0 {
            return Err(ConfigError::invalid("SHARES_PER_TRADE", "0", "must be at least 1"));
        }
        let max_shares: u32 = parse_or(vars, "MAX_SHARES", 300)?;

        let lookback_days: i64 = parse_or(vars, "LOOKBACK_DAYS", 400)?;
        if !(1..=MAX_LOOKBACK_DAYS).contains(&lookback_days) {
            return Err(ConfigError::invalid(
                "LOOKBACK_DAYS",
                lookback_days.to_string(),
                format!("must be between 1 and {}", MAX_LOOKBACK_DAYS),
            ));
        }

        let cash_start: f64 = parse_or(vars, "CASH_START", 10_000.0)?;
        if !cash_start.is_finite() || cash_start < 0.0 {
            return Err(ConfigError::invalid(
                "CASH_START",
                cash_start.to_string(),
                "must be a finite, non-negative amount",
            ));
        }

        let state_path = PathBuf::from(lookup(vars, "STATE_PATH").unwrap_or("state.json"));

        Ok(Self {
            broker,
            strategy: StrategyConfig {
                watchlist,
                short_window,
                long_window,
                wait_days,
                shares_per_trade,
                max_shares,
                lookback_days,
                cash_start,
            },
            state_path,
        })
    }
}

impl BrokerConfig {
    /// Credentials, feed and endpoints only; the diagnostics probe needs nothing else
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let api_key = lookup(vars, "ALPACA_API_KEY").unwrap_or_default();
        let api_secret = lookup(vars, "ALPACA_API_SECRET").unwrap_or_default();
        if api_key.is_empty() || api_secret.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }

        let paper = lookup(vars, "ALPACA_PAPER").map(parse_bool).unwrap_or(true);
        let data_feed: DataFeed = lookup(vars, "ALPACA_DATA_FEED").unwrap_or("iex").parse()?;

        let default_trading = if paper {
            PAPER_TRADING_URL
        } else {
            LIVE_TRADING_URL
        };
        let trading_url = parse_url(
            "ALPACA_TRADING_URL",
            lookup(vars, "ALPACA_TRADING_URL").unwrap_or(default_trading),
        )?;
        let data_url = parse_url(
            "ALPACA_DATA_URL",
            lookup(vars, "ALPACA_DATA_URL").unwrap_or(DATA_URL),
        )?;

        Ok(Self {
            credentials: Credentials {
                api_key: api_key.to_string(),
                api_secret: api_secret.to_string(),
            },
            paper,
            data_feed,
            trading_url,
            data_url,
        })
    }

    pub fn mode(&self) -> &'static str {
        if self.paper {
            "PAPER"
        } else {
            "LIVE"
        }
    }
}

/// Split, trim and upper-case a comma-separated symbol list, keeping first occurrences
pub fn parse_watchlist(raw: &str) -> Result<Vec<String>, ConfigError> {
    let mut symbols: Vec<String> = Vec::new();
    for symbol in raw.split(',').map(|s| s.trim().to_uppercase()) {
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    if symbols.is_empty() {
        return Err(ConfigError::EmptyWatchlist);
    }
    Ok(symbols)
}

pub fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// Trimmed, non-empty value of `key`
fn lookup<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_or<T>(
    vars: &HashMap<String, String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(vars, key) {
        Some(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(key, raw, e.to_string())),
        None => Ok(default),
    }
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::invalid(key, raw, e.to_string()))
}
