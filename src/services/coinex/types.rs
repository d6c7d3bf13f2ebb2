//! CoinEx v2 REST payloads.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::Candle;
use crate::services::market_data::MarketDataError;

/// Envelope of every v2 response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// One kline row. Prices and volume arrive as decimal strings.
#[derive(Debug, Deserialize)]
pub struct KlineData {
    pub created_at: i64,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

impl KlineData {
    pub fn into_candle(self) -> Result<Candle, MarketDataError> {
        let timestamp = DateTime::<Utc>::from_timestamp_millis(self.created_at).ok_or_else(|| {
            MarketDataError::Parse(format!("timestamp out of range: {}", self.created_at))
        })?;

        Ok(Candle::new(
            decimal("open", &self.open)?,
            decimal("high", &self.high)?,
            decimal("low", &self.low)?,
            decimal("close", &self.close)?,
            decimal("volume", &self.volume)?,
            timestamp,
        ))
    }
}

fn decimal(field: &str, raw: &str) -> Result<f64, MarketDataError> {
    raw.parse::<f64>()
        .map_err(|e| MarketDataError::Parse(format!("{} '{}': {}", field, raw, e)))
}
