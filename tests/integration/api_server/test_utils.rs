//! Test utilities for API server integration tests

use axum_test::TestServer;
use rangefilter::core::http::{create_router, AppState, HealthStatus};
use rangefilter::db::SignalFileStore;
use rangefilter::metrics::Metrics;
use std::sync::Arc;
use std::time::Instant;
use tempfile::TempDir;
use tokio::sync::RwLock;

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub store: Arc<SignalFileStore>,
    pub dir: TempDir,
}

impl TestApiServer {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = Arc::new(SignalFileStore::new(dir.path().join("signals.json")));
        let metrics = Arc::new(Metrics::http_only().expect("metrics initialization"));
        let state = AppState {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
            signal_store: store.clone(),
        };

        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self {
            server,
            metrics,
            store,
            dir,
        }
    }

    /// Overwrite the signal file with raw contents.
    pub fn write_signal_file(&self, contents: &str) {
        std::fs::write(self.store.path(), contents).expect("write signal file");
    }
}
