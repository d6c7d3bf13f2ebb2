//! Mocked CoinEx exchange shared by the client and worker tests

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const BASE_MS: i64 = 1_700_000_000_000;
pub const FIFTEEN_MINUTES_MS: i64 = 15 * 60 * 1000;

/// One kline row as CoinEx returns it, prices as decimal strings.
pub fn kline(index: i64, close: f64) -> Value {
    json!({
        "market": "BTCUSDT",
        "created_at": BASE_MS + index * FIFTEEN_MINUTES_MS,
        "open": close.to_string(),
        "high": close.to_string(),
        "low": close.to_string(),
        "close": close.to_string(),
        "volume": "1.5",
        "value": (close * 1.5).to_string()
    })
}

pub fn kline_body(klines: Vec<Value>) -> Value {
    json!({ "code": 0, "message": "OK", "data": klines })
}

/// Falls 60 candles from 200, then rises; cut so the second to last row is the first BUY.
pub fn buy_klines() -> Vec<Value> {
    let mut closes = Vec::new();
    let mut price = 200.0;
    for _ in 0..60 {
        closes.push(price);
        price -= 1.0;
    }
    for _ in 0..5 {
        closes.push(price);
        price += 2.0;
    }
    closes
        .into_iter()
        .enumerate()
        .map(|(i, close)| kline(i as i64, close))
        .collect()
}

pub async fn mock_klines(server: &MockServer, market: &str, period: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/v2/spot/kline"))
        .and(query_param("market", market))
        .and(query_param("period", period))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
