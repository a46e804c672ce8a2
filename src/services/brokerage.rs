//! Brokerage account and order interface.

use crate::error::ApiError;
use crate::models::{Account, MarketClock, OrderAck, OrderRequest, Position};

#[async_trait::async_trait]
pub trait Brokerage {
    async fn get_account(&self) -> Result<Account, ApiError>;

    async fn get_clock(&self) -> Result<MarketClock, ApiError>;

    /// All open positions; the account is the source of truth
    async fn list_positions(&self) -> Result<Vec<Position>, ApiError>;

    /// Submit a day market order. Never retried: a failure is reported as-is.
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck, ApiError>;
}
