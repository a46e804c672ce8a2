//! Thin REST client over the Alpaca trading and market data APIs

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::messages::{
    AccountResponse, BarData, BarsResponse, ClockResponse, ErrorBody, OrderBody, OrderResponse,
    PositionResponse,
};
use crate::config::{BrokerConfig, Credentials, DataFeed};
use crate::error::ApiError;
use crate::models::OrderRequest;

const TRADING: &str = "Alpaca trading API";
const MARKET_DATA: &str = "Alpaca market data";
const PAGE_LIMIT: u32 = 10_000;
const MAX_RETRIES: usize = 3;

/// Query for daily bars of one symbol
#[derive(Debug, Clone)]
pub struct BarsQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Total bars wanted; all pages are followed when `None`
    pub limit: Option<u32>,
}

pub struct AlpacaRestClient {
    http: Client,
    trading_url: Url,
    data_url: Url,
    credentials: Credentials,
    data_feed: DataFeed,
    retry_delay: Duration,
}

impl AlpacaRestClient {
    pub fn new(config: &BrokerConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_client(config, http)
    }

    pub fn with_client(config: &BrokerConfig, http: Client) -> Self {
        Self {
            http,
            trading_url: config.trading_url.clone(),
            data_url: config.data_url.clone(),
            credentials: config.credentials.clone(),
            data_feed: config.data_feed,
            retry_delay: Duration::from_millis(500),
        }
    }

    /// Initial backoff between retries of idempotent reads
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn data_feed(&self) -> DataFeed {
        self.data_feed
    }

    pub async fn get_account(&self) -> Result<AccountResponse, ApiError> {
        let url = join(&self.trading_url, "v2/account")?;
        self.get_json(url, TRADING).await
    }

    pub async fn get_clock(&self) -> Result<ClockResponse, ApiError> {
        let url = join(&self.trading_url, "v2/clock")?;
        self.get_json(url, TRADING).await
    }

    pub async fn list_positions(&self) -> Result<Vec<PositionResponse>, ApiError> {
        let url = join(&self.trading_url, "v2/positions")?;
        self.get_json(url, TRADING).await
    }

    /// Single POST, no retry
    pub async fn submit_order(&self, order: &OrderRequest) -> Result<OrderResponse, ApiError> {
        let url = join(&self.trading_url, "v2/orders")?;
        let body = OrderBody {
            symbol: &order.symbol,
            qty: order.qty.to_string(),
            side: order.side,
            order_type: "market",
            time_in_force: "day",
        };

        debug!(
            symbol = %order.symbol,
            side = %order.side,
            qty = order.qty,
            "AlpacaRestClient: submitting order"
        );
        let response = self
            .authorized(self.http.post(url))
            .json(&body)
            .send()
            .await?;
        decode(response, TRADING).await
    }

    /// Daily bars oldest first, following `next_page_token` until exhausted or `limit` is met
    pub async fn get_daily_bars(
        &self,
        symbol: &str,
        query: &BarsQuery,
    ) -> Result<Vec<BarData>, ApiError> {
        let base = join(&self.data_url, &format!("v2/stocks/{}/bars", symbol))?;
        let mut bars: Vec<BarData> = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = base.clone();
            {
                let mut params = url.query_pairs_mut();
                params
                    .append_pair("timeframe", "1Day")
                    .append_pair("adjustment", "raw")
                    .append_pair("feed", self.data_feed.as_str());
                if let Some(start) = query.start {
                    params.append_pair("start", &start.to_rfc3339_opts(SecondsFormat::Secs, true));
                }
                if let Some(end) = query.end {
                    params.append_pair("end", &end.to_rfc3339_opts(SecondsFormat::Secs, true));
                }
                let remaining = query.limit.map(|l| l.saturating_sub(bars.len() as u32));
                let page_size = remaining.unwrap_or(PAGE_LIMIT).min(PAGE_LIMIT);
                params.append_pair("limit", &page_size.to_string());
                if let Some(token) = &page_token {
                    params.append_pair("page_token", token);
                }
            }

            let page: BarsResponse = self.get_json(url, MARKET_DATA).await?;
            bars.extend(page.bars.unwrap_or_default());

            let limit_reached = query.limit.is_some_and(|l| bars.len() >= l as usize);
            match page.next_page_token {
                Some(token) if !token.is_empty() && !limit_reached => page_token = Some(token),
                _ => break,
            }
        }

        debug!(
            symbol = %symbol,
            bars = bars.len(),
            feed = %self.data_feed,
            "AlpacaRestClient: fetched daily bars"
        );
        Ok(bars)
    }

    /// GET with exponential backoff on transient failures
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &'static str,
    ) -> Result<T, ApiError> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.retry_delay)
            .with_max_times(MAX_RETRIES);

        (|| async {
            let response = self.authorized(self.http.get(url.clone())).send().await?;
            decode(response, context).await
        })
        .retry(backoff)
        .when(|e: &ApiError| e.is_transient())
        .notify(|e: &ApiError, delay: Duration| {
            warn!(
                error = %e,
                delay_ms = delay.as_millis() as u64,
                "{}: retrying request",
                context
            );
        })
        .await
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("APCA-API-KEY-ID", &self.credentials.api_key)
            .header("APCA-API-SECRET-KEY", &self.credentials.api_secret)
    }
}

fn join(base: &Url, path: &str) -> Result<Url, ApiError> {
    // Keep any path prefix on the base (proxies, mock servers).
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path)
        .map_err(|e| ApiError::InvalidRequest(format!("invalid URL for {}: {}", path, e)))
}

async fn decode<T: DeserializeOwned>(response: Response, context: &str) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(error_from_response(status, response, context).await);
    }

    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| ApiError::Decode(format!("{}: {}", context, e)))
}

async fn error_from_response(status: StatusCode, response: Response, context: &str) -> ApiError {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or(body);
    classify_error(status.as_u16(), &message, context)
}

/// Map an HTTP failure onto the error taxonomy
pub fn classify_error(status: u16, message: &str, context: &str) -> ApiError {
    let lowered = message.to_lowercase();
    match status {
        401 => ApiError::Unauthorized {
            context: context.to_string(),
            status,
        },
        403 if lowered.contains("subscription does not permit") && message.contains("SIP") => {
            ApiError::SipNotPermitted
        }
        403 if lowered.contains("forbidden") || lowered.contains("not authorized") => {
            ApiError::Unauthorized {
                context: context.to_string(),
                status,
            }
        }
        404 => ApiError::NotFound(context.to_string()),
        429 => ApiError::RateLimited(context.to_string()),
        _ => ApiError::Status {
            context: context.to_string(),
            status,
            message: message.to_string(),
        },
    }
}
