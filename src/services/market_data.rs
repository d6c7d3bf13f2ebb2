//! Market data provider interface.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Candle;

#[derive(Debug, Error)]
pub enum MarketDataError {
    /// Transport failure or non-success HTTP status. Worth retrying.
    #[error("http error: {0}")]
    Http(String),

    #[error("exchange rejected request (code {code}): {message}")]
    Api { code: i64, message: String },

    #[error("malformed market data: {0}")]
    Parse(String),

    #[error("unsupported resolution: {0} minutes")]
    UnsupportedResolution(u32),
}

impl MarketDataError {
    pub fn is_transient(&self) -> bool {
        matches!(self, MarketDataError::Http(_))
    }
}

impl From<reqwest::Error> for MarketDataError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            MarketDataError::Parse(e.to_string())
        } else {
            MarketDataError::Http(e.to_string())
        }
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Most recent `limit` candles, oldest first. The last one may still be forming.
    async fn get_candles(
        &self,
        symbol: &str,
        resolution_minutes: u32,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError>;
}
