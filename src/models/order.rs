use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => f.write_str("buy"),
            OrderSide::Sell => f.write_str("sell"),
        }
    }
}

/// Day market order for a whole number of shares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub qty: u32,
}

impl OrderRequest {
    pub fn buy(symbol: impl Into<String>, qty: u32) -> Self {
        Self {
            symbol: symbol.into(),
            side: OrderSide::Buy,
            qty,
        }
    }

    pub fn sell(symbol: impl Into<String>, qty: u32) -> Self {
        Self {
            symbol: symbol.into(),
            side: OrderSide::Sell,
            qty,
        }
    }
}

/// Brokerage acknowledgement of an accepted order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    pub id: String,
    pub status: String,
}
