//! Collaborators a run talks to

use crate::services::brokerage::Brokerage;
use crate::services::market_data::MarketDataProvider;
use std::sync::Arc;

/// Market data feed and brokerage account behind their capability traits,
/// so a run can be driven by the Alpaca provider or by in-memory fakes.
#[derive(Clone)]
pub struct RunContext {
    pub market_data: Arc<dyn MarketDataProvider + Send + Sync>,
    pub brokerage: Arc<dyn Brokerage + Send + Sync>,
}

impl RunContext {
    pub fn new(
        market_data: Arc<dyn MarketDataProvider + Send + Sync>,
        brokerage: Arc<dyn Brokerage + Send + Sync>,
    ) -> Self {
        Self {
            market_data,
            brokerage,
        }
    }
}
