//! Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

/// Invalid or missing configuration. Always fatal, raised before any network call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Missing Alpaca credentials. \
         Set ALPACA_API_KEY and ALPACA_API_SECRET in your environment or .env."
    )]
    MissingCredentials,

    #[error("WATCHLIST is empty.")]
    EmptyWatchlist,

    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(
        key: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Invalid {
            key,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Failure talking to the brokerage trading or market data API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(
        "{context} returned {status} Unauthorized. \
         The credentials are being read, but Alpaca is rejecting them. \
         Make sure you are using Trading API keys (not broker/OAuth keys), \
         rotate them if needed, and run `diagnose` to confirm."
    )]
    Unauthorized { context: String, status: u16 },

    #[error(
        "Alpaca rejected the market data request: \
         subscription does not permit querying recent SIP data. \
         Set ALPACA_DATA_FEED=iex (free feed), \
         or ALPACA_DATA_FEED=sip with a paid subscription. \
         Run `diagnose` to confirm."
    )]
    SipNotPermitted,

    #[error("{0} not found")]
    NotFound(String),

    #[error("rate limited by {0}")]
    RateLimited(String),

    #[error("{context} failed with status {status}: {message}")]
    Status {
        context: String,
        status: u16,
        message: String,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether retrying the same idempotent request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::RateLimited(_) | ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Failure loading, flushing or locking the cooldown store.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("cooldown store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cooldown store at {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("another run holds the lock at {path}")]
    Locked { path: PathBuf },
}

/// Conditions that abort a run before any order logic.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot authenticate with the brokerage: {0}")]
    Auth(#[source] ApiError),

    #[error(transparent)]
    Lock(LedgerError),
}
