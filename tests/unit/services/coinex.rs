//! Unit tests for CoinEx payload handling

use rangefilter::services::coinex::resolution_to_period;
use rangefilter::services::coinex::types::{ApiResponse, KlineData};
use rangefilter::services::MarketDataError;

#[test]
fn test_minute_periods() {
    assert_eq!(resolution_to_period(1).unwrap(), "1min");
    assert_eq!(resolution_to_period(15).unwrap(), "15min");
    assert_eq!(resolution_to_period(59).unwrap(), "59min");
}

#[test]
fn test_hour_and_day_periods() {
    assert_eq!(resolution_to_period(60).unwrap(), "1hour");
    assert_eq!(resolution_to_period(240).unwrap(), "4hour");
    assert_eq!(resolution_to_period(1440).unwrap(), "1day");
}

#[test]
fn test_unsupported_periods() {
    assert!(matches!(
        resolution_to_period(0),
        Err(MarketDataError::UnsupportedResolution(0))
    ));
    assert!(matches!(
        resolution_to_period(90),
        Err(MarketDataError::UnsupportedResolution(90))
    ));
}

#[test]
fn test_kline_parses_string_numbers() {
    let raw = r#"{
        "code": 0,
        "message": "OK",
        "data": [{
            "market": "BTCUSDT",
            "created_at": 1700000000000,
            "open": "37000.5",
            "high": "37100",
            "low": "36950.25",
            "close": "37050",
            "volume": "12.5",
            "value": "463125"
        }]
    }"#;
    let response: ApiResponse<Vec<KlineData>> = serde_json::from_str(raw).unwrap();
    assert_eq!(response.code, 0);

    let candle = response.data.unwrap().remove(0).into_candle().unwrap();
    assert_eq!(candle.open, 37000.5);
    assert_eq!(candle.high, 37100.0);
    assert_eq!(candle.low, 36950.25);
    assert_eq!(candle.close, 37050.0);
    assert_eq!(candle.volume, 12.5);
    assert_eq!(candle.timestamp.timestamp(), 1_700_000_000);
}

#[test]
fn test_kline_rejects_bad_number() {
    let kline = KlineData {
        created_at: 0,
        open: "1".into(),
        high: "abc".into(),
        low: "1".into(),
        close: "1".into(),
        volume: "1".into(),
    };
    assert!(matches!(kline.into_candle(), Err(MarketDataError::Parse(_))));
}

#[test]
fn test_only_http_errors_are_transient() {
    assert!(MarketDataError::Http("timeout".into()).is_transient());
    assert!(!MarketDataError::Parse("x".into()).is_transient());
    assert!(!MarketDataError::Api {
        code: 3008,
        message: "bad market".into()
    }
    .is_transient());
}
