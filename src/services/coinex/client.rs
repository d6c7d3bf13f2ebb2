//! CoinEx spot kline client

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use tracing::{debug, info, warn};

use super::types::{ApiResponse, KlineData};
use crate::models::Candle;
use crate::services::market_data::{MarketDataError, MarketDataProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.coinex.com";
const KLINE_PATH: &str = "/v2/spot/kline";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Exchange period name for a bucket width in minutes.
pub fn resolution_to_period(resolution_minutes: u32) -> Result<String, MarketDataError> {
    match resolution_minutes {
        0 => Err(MarketDataError::UnsupportedResolution(0)),
        m if m < 60 => Ok(format!("{}min", m)),
        m if m % 1440 == 0 => Ok(format!("{}day", m / 1440)),
        m if m % 60 == 0 => Ok(format!("{}hour", m / 60)),
        m => Err(MarketDataError::UnsupportedResolution(m)),
    }
}

#[derive(Clone)]
pub struct CoinexClient {
    http: reqwest::Client,
    base_url: String,
    max_retries: usize,
    retry_delay: Duration,
}

impl CoinexClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, MarketDataError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
        }
    }

    /// Retries after a transient failure; 0 disables retrying.
    pub fn with_retries(mut self, max_retries: usize, delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = delay;
        self
    }

    async fn fetch_once(
        &self,
        symbol: &str,
        period: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let url = format!("{}{}", self.base_url, KLINE_PATH);
        let limit = limit.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[("market", symbol), ("period", period), ("limit", limit.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let body: ApiResponse<Vec<KlineData>> = response.json().await?;
        if body.code != 0 {
            return Err(MarketDataError::Api {
                code: body.code,
                message: body.message,
            });
        }

        let mut candles = body
            .data
            .unwrap_or_default()
            .into_iter()
            .map(KlineData::into_candle)
            .collect::<Result<Vec<_>, _>>()?;
        candles.sort_by_key(|c| c.timestamp);
        Ok(candles)
    }
}

#[async_trait]
impl MarketDataProvider for CoinexClient {
    async fn get_candles(
        &self,
        symbol: &str,
        resolution_minutes: u32,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let period = resolution_to_period(resolution_minutes)?;
        info!(symbol = %symbol, period = %period, "Fetching candles for {} | Timeframe: {}", symbol, period);

        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.retry_delay)
            .with_max_times(self.max_retries);

        let candles = (|| self.fetch_once(symbol, &period, limit))
            .retry(backoff)
            .when(MarketDataError::is_transient)
            .notify(|err, delay| {
                warn!(symbol = %symbol, error = %err, delay_ms = delay.as_millis() as u64, "Candle fetch failed, retrying");
            })
            .await?;

        debug!(symbol = %symbol, count = candles.len(), "Fetched {} candles for {}", candles.len(), symbol);
        Ok(candles)
    }
}
