//! Market data provider interface.

use crate::error::ApiError;
use crate::models::Bar;

#[async_trait::async_trait]
pub trait MarketDataProvider {
    /// Daily bars for a symbol covering the last `lookback_days` calendar days,
    /// oldest first
    async fn get_daily_bars(&self, symbol: &str, lookback_days: i64) -> Result<Vec<Bar>, ApiError>;
}
