//! Unit tests for candle validation

use chrono::Duration;
use rangefilter::indicators::{validate_candles, IndicatorError};
use rangefilter::models::Candle;

use crate::test_utils::{candles_from_closes, t0};

#[test]
fn test_single_candle_is_insufficient() {
    let candles = candles_from_closes(&[100.0]);
    assert_eq!(
        validate_candles(&candles),
        Err(IndicatorError::InsufficientData {
            required: 2,
            actual: 1
        })
    );
}

#[test]
fn test_empty_series_is_insufficient() {
    assert!(matches!(
        validate_candles(&[]),
        Err(IndicatorError::InsufficientData { actual: 0, .. })
    ));
}

#[test]
fn test_nan_close_is_rejected() {
    let mut candles = candles_from_closes(&[100.0, 101.0, 102.0]);
    candles[1].close = f64::NAN;
    assert!(matches!(
        validate_candles(&candles),
        Err(IndicatorError::InvalidCandle { index: 1, .. })
    ));
}

#[test]
fn test_infinite_high_is_rejected() {
    let mut candles = candles_from_closes(&[100.0, 101.0]);
    candles[0].high = f64::INFINITY;
    assert!(matches!(
        validate_candles(&candles),
        Err(IndicatorError::InvalidCandle { index: 0, .. })
    ));
}

#[test]
fn test_duplicate_timestamp_is_rejected() {
    let candles = vec![Candle::flat(100.0, t0()), Candle::flat(101.0, t0())];
    assert!(matches!(
        validate_candles(&candles),
        Err(IndicatorError::InvalidCandle { index: 1, .. })
    ));
}

#[test]
fn test_descending_timestamps_are_rejected() {
    let candles = vec![
        Candle::flat(100.0, t0()),
        Candle::flat(101.0, t0() + Duration::minutes(15)),
        Candle::flat(102.0, t0() + Duration::minutes(5)),
    ];
    assert!(matches!(
        validate_candles(&candles),
        Err(IndicatorError::InvalidCandle { index: 2, .. })
    ));
}

#[test]
fn test_valid_series_passes() {
    let candles = candles_from_closes(&[100.0, 101.0, 99.5]);
    assert!(validate_candles(&candles).is_ok());
}
