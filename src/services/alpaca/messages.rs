//! Alpaca REST wire types

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{Account, Bar, MarketClock, OrderAck, OrderSide, Position};

/// Alpaca encodes most numeric account fields as strings
fn de_str_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StrOrNum {
        Str(String),
        Num(f64),
    }

    match StrOrNum::deserialize(deserializer)? {
        StrOrNum::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
        StrOrNum::Num(n) => Ok(n),
    }
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(deserialize_with = "de_str_f64")]
    pub cash: f64,
    #[serde(deserialize_with = "de_str_f64")]
    pub equity: f64,
}

impl From<AccountResponse> for Account {
    fn from(a: AccountResponse) -> Self {
        Account {
            id: a.id,
            status: a.status,
            cash: a.cash,
            equity: a.equity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ClockResponse {
    pub is_open: bool,
    #[serde(default)]
    pub next_open: Option<DateTime<FixedOffset>>,
}

impl From<ClockResponse> for MarketClock {
    fn from(c: ClockResponse) -> Self {
        MarketClock {
            is_open: c.is_open,
            next_open: c.next_open.map(|t| t.with_timezone(&Utc)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PositionResponse {
    pub symbol: String,
    #[serde(deserialize_with = "de_str_f64")]
    pub qty: f64,
}

impl From<PositionResponse> for Position {
    fn from(p: PositionResponse) -> Self {
        // Fractional shares are truncated toward zero, whole shares are all we trade.
        Position::new(p.symbol, p.qty.trunc() as i64)
    }
}

#[derive(Debug, Serialize)]
pub struct OrderBody<'a> {
    pub symbol: &'a str,
    pub qty: String,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: &'static str,
    pub time_in_force: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    #[serde(default)]
    pub status: String,
}

impl From<OrderResponse> for OrderAck {
    fn from(o: OrderResponse) -> Self {
        OrderAck {
            id: o.id,
            status: o.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BarData {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v", default)]
    pub volume: f64,
}

impl From<BarData> for Bar {
    fn from(b: BarData) -> Self {
        Bar::new(b.open, b.high, b.low, b.close, b.volume, b.timestamp)
    }
}

#[derive(Debug, Deserialize)]
pub struct BarsResponse {
    /// `null` when the range holds no bars
    #[serde(default)]
    pub bars: Option<Vec<BarData>>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}
