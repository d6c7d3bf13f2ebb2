//! Boundary checks for candle series entering the indicators.

use super::error::IndicatorError;
use crate::models::Candle;

/// Fewest candles the filter recurrence can run on.
pub const MIN_SERIES_LEN: usize = 2;

/// Reject series the indicators cannot run on.
///
/// Requires at least two candles, finite OHLCV values and strictly
/// ascending timestamps.
pub fn validate_candles(candles: &[Candle]) -> Result<(), IndicatorError> {
    if candles.len() < MIN_SERIES_LEN {
        return Err(IndicatorError::InsufficientData {
            required: MIN_SERIES_LEN,
            actual: candles.len(),
        });
    }

    for (index, candle) in candles.iter().enumerate() {
        if !candle.is_finite() {
            return Err(IndicatorError::InvalidCandle {
                index,
                reason: "non-finite price or volume".to_string(),
            });
        }
    }

    for (index, pair) in candles.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(IndicatorError::InvalidCandle {
                index: index + 1,
                reason: format!(
                    "timestamp {} does not follow {}",
                    pair[1].timestamp, pair[0].timestamp
                ),
            });
        }
    }

    Ok(())
}
