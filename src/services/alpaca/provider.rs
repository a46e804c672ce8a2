//! Alpaca-backed market data and brokerage provider

use std::sync::Arc;

use chrono::{Duration, Utc};

use super::client::{AlpacaRestClient, BarsQuery};
use crate::config::BrokerConfig;
use crate::error::ApiError;
use crate::models::{Account, Bar, MarketClock, OrderAck, OrderRequest, Position};
use crate::services::brokerage::Brokerage;
use crate::services::market_data::MarketDataProvider;

#[derive(Clone)]
pub struct AlpacaProvider {
    client: Arc<AlpacaRestClient>,
}

impl AlpacaProvider {
    pub fn new(config: &BrokerConfig) -> Self {
        Self::with_client(Arc::new(AlpacaRestClient::new(config)))
    }

    pub fn with_client(client: Arc<AlpacaRestClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<AlpacaRestClient> {
        &self.client
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for AlpacaProvider {
    async fn get_daily_bars(&self, symbol: &str, lookback_days: i64) -> Result<Vec<Bar>, ApiError> {
        let end = Utc::now();
        let start = Duration::try_days(lookback_days)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| {
                ApiError::InvalidRequest(format!(
                    "lookback of {} days is out of range",
                    lookback_days
                ))
            })?;
        let query = BarsQuery {
            start: Some(start),
            end: Some(end),
            limit: None,
        };

        let mut bars: Vec<Bar> = self
            .client
            .get_daily_bars(symbol, &query)
            .await?
            .into_iter()
            .map(Bar::from)
            .collect();
        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}

#[async_trait::async_trait]
impl Brokerage for AlpacaProvider {
    async fn get_account(&self) -> Result<Account, ApiError> {
        Ok(self.client.get_account().await?.into())
    }

    async fn get_clock(&self) -> Result<MarketClock, ApiError> {
        Ok(self.client.get_clock().await?.into())
    }

    async fn list_positions(&self) -> Result<Vec<Position>, ApiError> {
        Ok(self
            .client
            .list_positions()
            .await?
            .into_iter()
            .map(Position::from)
            .collect())
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck, ApiError> {
        Ok(self.client.submit_order(order).await?.into())
    }
}
