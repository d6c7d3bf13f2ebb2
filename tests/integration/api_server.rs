//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics, and the signal views.

#[path = "api_server/test_utils.rs"]
mod test_utils;

use chrono::{DateTime, Utc};
use rangefilter::models::{SignalRecord, SignalSide};
use serde_json::Value;

use test_utils::TestApiServer;

fn record(id: &str, symbol: &str, side: SignalSide, price: f64) -> SignalRecord {
    let time = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
    SignalRecord::new(id.to_string(), symbol, side, price, time)
}

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "rangefilter-signals");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    app.server.get("/health").await;

    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    for name in [
        "http_requests_total",
        "http_request_duration_seconds",
        "http_requests_in_flight",
    ] {
        assert!(body.contains(name), "Expected {} metric", name);
    }
    assert!(app.metrics.http_requests_total.get() >= 1);
}

#[tokio::test]
async fn metrics_endpoint_omits_worker_metrics() {
    let app = TestApiServer::new().await;
    let body = app.server.get("/metrics").await.text();

    for name in [
        "analysis_cycles_total",
        "analysis_failures_total",
        "signals_emitted_total",
        "analysis_duration_seconds",
        "database_connected",
    ] {
        assert!(!body.contains(name), "Unexpected {} metric", name);
    }
}

#[tokio::test]
async fn signals_endpoint_is_empty_without_a_file() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/signals").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn signals_endpoint_lists_latest_per_symbol() {
    let app = TestApiServer::new().await;
    app.store
        .upsert(record("11A22B", "BTCUSDT", SignalSide::Buy, 37000.0))
        .await
        .unwrap();
    app.store
        .upsert(record("33C44D", "ETHUSDT", SignalSide::Sell, 2000.5))
        .await
        .unwrap();
    app.store
        .upsert(record("55E66F", "BTCUSDT", SignalSide::Sell, 36500.0))
        .await
        .unwrap();

    let response = app.server.get("/signals").await;
    assert_eq!(response.status_code(), 200);

    let body: Vec<SignalRecord> = response.json();
    assert_eq!(body.len(), 2);
    assert_eq!(body[0].signal_id, "55E66F");
    assert_eq!(body[0].signal_side, SignalSide::Sell);
    assert_eq!(body[1].symbol, "ETHUSDT");
}

#[tokio::test]
async fn signal_by_symbol_is_case_insensitive() {
    let app = TestApiServer::new().await;
    app.store
        .upsert(record("11A22B", "BTCUSDT", SignalSide::Buy, 37000.0))
        .await
        .unwrap();

    let response = app.server.get("/signals/btcusdt").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["symbol"], "BTCUSDT");
    assert_eq!(body["signal_side"], "BUY");
    assert_eq!(body["entry_price"], 37000.0);
    assert_eq!(body["creation_time_utc"], "2023-11-14 22:13:20");
}

#[tokio::test]
async fn unknown_symbol_returns_not_found() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/signals/XRPUSDT").expect_failure().await;
    assert_eq!(response.status_code(), 404);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("XRPUSDT"));
}

#[tokio::test]
async fn unreadable_signal_file_returns_server_error() {
    let app = TestApiServer::new().await;
    app.write_signal_file("[{\"signal_id\": ");

    let response = app.server.get("/signals").expect_failure().await;
    assert_eq!(response.status_code(), 500);

    let body: Value = response.json();
    assert_eq!(body["error"], "Could not process signal file");
    assert!(body["details"].is_string());
}
