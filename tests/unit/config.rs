//! Unit tests for environment configuration

use std::collections::HashMap;
use trendbot::config::{
    parse_bool, parse_watchlist, DataFeed, StrategyConfig, TradingConfig, MAX_LOOKBACK_DAYS,
};
use trendbot::error::ConfigError;

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    let mut vars: HashMap<String, String> = [
        ("ALPACA_API_KEY", "key-id"),
        ("ALPACA_API_SECRET", "secret-value"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in pairs {
        vars.insert(k.to_string(), v.to_string());
    }
    vars
}

#[test]
fn test_defaults() {
    let config = TradingConfig::from_vars(&vars(&[])).unwrap();

    assert_eq!(config.strategy, StrategyConfig::default());
    assert_eq!(config.strategy.watchlist, vec!["PFE", "T"]);
    assert_eq!(config.state_path.to_str(), Some("state.json"));
    assert!(config.broker.paper);
    assert_eq!(config.broker.mode(), "PAPER");
    assert_eq!(config.broker.data_feed, DataFeed::Iex);
    assert_eq!(config.broker.trading_url.as_str(), "https://paper-api.alpaca.markets/");
    assert_eq!(config.broker.data_url.as_str(), "https://data.alpaca.markets/");
}

#[test]
fn test_overrides() {
    let config = TradingConfig::from_vars(&vars(&[
        ("WATCHLIST", " aapl, msft ,AAPL,,"),
        ("SHORT_WINDOW", "2"),
        ("LONG_WINDOW", "4"),
        ("WAIT_DAYS", "0"),
        ("SHARES_PER_TRADE", "10"),
        ("MAX_SHARES", "25"),
        ("STATE_PATH", "/tmp/cooldowns.json"),
        ("ALPACA_PAPER", "false"),
        ("ALPACA_DATA_FEED", "SIP"),
    ]))
    .unwrap();

    assert_eq!(config.strategy.watchlist, vec!["AAPL", "MSFT"]);
    assert_eq!(config.strategy.short_window, 2);
    assert_eq!(config.strategy.long_window, 4);
    assert_eq!(config.strategy.wait_days, 0);
    assert_eq!(config.strategy.shares_per_trade, 10);
    assert_eq!(config.strategy.max_shares, 25);
    assert_eq!(config.state_path.to_str(), Some("/tmp/cooldowns.json"));
    assert_eq!(config.broker.mode(), "LIVE");
    assert_eq!(config.broker.trading_url.as_str(), "https://api.alpaca.markets/");
    assert_eq!(config.broker.data_feed, DataFeed::Sip);
}

#[test]
fn test_missing_credentials() {
    let mut vars = vars(&[]);
    vars.insert("ALPACA_API_SECRET".to_string(), "   ".to_string());

    let err = TradingConfig::from_vars(&vars).unwrap_err();
    assert!(matches!(err, ConfigError::MissingCredentials));
}

#[test]
fn test_invalid_values() {
    let cases = [
        ("SHORT_WINDOW", "abc", "SHORT_WINDOW"),
        ("SHORT_WINDOW", "0", "SHORT_WINDOW"),
        ("WAIT_DAYS", "-1", "WAIT_DAYS"),
        ("SHARES_PER_TRADE", "0", "SHARES_PER_TRADE"),
        ("MAX_SHARES", "-5", "MAX_SHARES"),
        ("ALPACA_DATA_FEED", "otc", "ALPACA_DATA_FEED"),
        ("ALPACA_TRADING_URL", "not a url", "ALPACA_TRADING_URL"),
    ];

    for (key, value, expected) in cases {
        match TradingConfig::from_vars(&vars(&[(key, value)])) {
            Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, expected),
            other => panic!("{}={} should be invalid, got {:?}", key, value, other.map(|_| ())),
        }
    }
}

#[test]
fn test_long_window_below_short_window() {
    let err = TradingConfig::from_vars(&vars(&[("SHORT_WINDOW", "20"), ("LONG_WINDOW", "10")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "LONG_WINDOW", .. }));

    // Equal windows are allowed
    let config = TradingConfig::from_vars(&vars(&[("SHORT_WINDOW", "10"), ("LONG_WINDOW", "10")]))
        .unwrap();
    assert_eq!(config.strategy.long_window, 10);
}

#[test]
fn test_watchlist_parsing() {
    assert_eq!(parse_watchlist("pfe,t").unwrap(), vec!["PFE", "T"]);
    assert_eq!(parse_watchlist("B, A ,b").unwrap(), vec!["B", "A"]);
    assert!(matches!(parse_watchlist(" , ,"), Err(ConfigError::EmptyWatchlist)));

    let err = TradingConfig::from_vars(&vars(&[("WATCHLIST", ",")])).unwrap_err();
    assert!(matches!(err, ConfigError::EmptyWatchlist));
}

#[test]
fn test_parse_bool() {
    for raw in ["1", "true", "TRUE", "yes", "Y", " on "] {
        assert!(parse_bool(raw), "{} should be truthy", raw);
    }
    for raw in ["0", "false", "no", "off", "paper"] {
        assert!(!parse_bool(raw), "{} should be falsy", raw);
    }
}

#[test]
fn test_debug_redacts_secret() {
    let config = TradingConfig::from_vars(&vars(&[])).unwrap();
    let debug = format!("{:?}", config);
    assert!(!debug.contains("key-id"));
    assert!(!debug.contains("secret-value"));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn test_lookback_days_bounds() {
    for raw in ["0", "36501", "100000000000"] {
        let err = TradingConfig::from_vars(&vars(&[("LOOKBACK_DAYS", raw)])).unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { key: "LOOKBACK_DAYS", .. }),
            "LOOKBACK_DAYS={} should be rejected",
            raw
        );
    }

    let config = TradingConfig::from_vars(&vars(&[("LOOKBACK_DAYS", "36500")])).unwrap();
    assert_eq!(config.strategy.lookback_days, MAX_LOOKBACK_DAYS);
}
