use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub status: String,
    pub cash: f64,
    pub equity: f64,
}

/// An open position as reported by the brokerage. Negative quantity is a short.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub qty: i64,
}

impl Position {
    pub fn new(symbol: impl Into<String>, qty: i64) -> Self {
        Self {
            symbol: symbol.into(),
            qty,
        }
    }

    /// Long shares held, zero for flat or short positions
    pub fn long_qty(&self) -> u32 {
        u32::try_from(self.qty.max(0)).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketClock {
    pub is_open: bool,
    pub next_open: Option<DateTime<Utc>>,
}
