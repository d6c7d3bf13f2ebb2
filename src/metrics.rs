//! Prometheus metrics for the worker and the API server.
//!
//! Each process owns its registry. The worker registers everything and
//! serves it on its own port; the API server only registers the HTTP
//! metrics it actually updates.

use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: Gauge,
    pub analysis_cycles_total: IntCounter,
    pub analysis_failures_total: IntCounter,
    pub signals_emitted_total: IntCounter,
    pub analysis_duration_seconds: Histogram,
    pub database_connected: Gauge,
}

impl Metrics {
    /// Full registry, used by the worker.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::build(true)
    }

    /// Registry exporting only the HTTP metrics.
    pub fn http_only() -> Result<Self, prometheus::Error> {
        Self::build(false)
    }

    fn build(with_analysis: bool) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            Gauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;
        let analysis_cycles_total =
            IntCounter::new("analysis_cycles_total", "Completed analysis cycles")?;
        let analysis_failures_total = IntCounter::new(
            "analysis_failures_total",
            "Symbols that failed to analyze within a cycle",
        )?;
        let signals_emitted_total =
            IntCounter::new("signals_emitted_total", "Signals written after de-duplication")?;
        let analysis_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "analysis_duration_seconds",
            "Duration of one analysis cycle in seconds",
        ))?;
        let database_connected =
            Gauge::new("database_connected", "1 when the analysis database is connected")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        if with_analysis {
            registry.register(Box::new(analysis_cycles_total.clone()))?;
            registry.register(Box::new(analysis_failures_total.clone()))?;
            registry.register(Box::new(signals_emitted_total.clone()))?;
            registry.register(Box::new(analysis_duration_seconds.clone()))?;
            registry.register(Box::new(database_connected.clone()))?;
        }

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            analysis_cycles_total,
            analysis_failures_total,
            signals_emitted_total,
            analysis_duration_seconds,
            database_connected,
        })
    }

    /// Text exposition format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
