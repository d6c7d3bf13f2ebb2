//! One analysis cycle across all configured symbols.
//!
//! Each symbol runs independently: fetch candles, analyze, persist the
//! annotated series, then decide on the closed candle. A failure for one
//! symbol is logged and never affects the others, and a failed symbol never
//! emits a signal.

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::db::{AnalysisDatabase, SignalFileStore, StoreError};
use crate::indicators::IndicatorError;
use crate::metrics::Metrics;
use crate::models::{RangeFilterConfig, Signal, SignalRecord, SignalSide};
use crate::services::market_data::{MarketDataError, MarketDataProvider};
use crate::signals::{
    generate_signal_id, next_emission, SignalEngine, SignalKey, SignalLedger, MIN_CANDLES,
};

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub symbols: Vec<String>,
    pub resolution_minutes: u32,
    pub candle_count: usize,
    pub range_filter: RangeFilterConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for RuntimeConfig {
    fn from(config: &Config) -> Self {
        Self {
            symbols: config.symbols.clone(),
            resolution_minutes: config.resolution_minutes,
            candle_count: config.candle_count,
            range_filter: config.range_filter.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What happened to one symbol in a cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    /// A new side was written.
    Emitted(SignalRecord),
    /// Analysis ran; the closed candle carried this label but nothing new was emitted.
    Unchanged(Signal),
    /// Too few candles to trust the analysis.
    Skipped { candles: usize },
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub outcomes: Vec<(String, SymbolOutcome)>,
}

impl CycleReport {
    pub fn outcome(&self, symbol: &str) -> Option<&SymbolOutcome> {
        self.outcomes
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, o)| o)
    }

    pub fn emitted(&self) -> impl Iterator<Item = &SignalRecord> {
        self.outcomes.iter().filter_map(|(_, o)| match o {
            SymbolOutcome::Emitted(r) => Some(r),
            _ => None,
        })
    }
}

pub struct AnalysisRuntime {
    config: RuntimeConfig,
    provider: Arc<dyn MarketDataProvider>,
    signal_store: Arc<SignalFileStore>,
    database: Option<Arc<AnalysisDatabase>>,
    metrics: Option<Arc<Metrics>>,
    ledger: Mutex<SignalLedger>,
}

impl AnalysisRuntime {
    pub fn new(
        config: RuntimeConfig,
        provider: Arc<dyn MarketDataProvider>,
        signal_store: Arc<SignalFileStore>,
    ) -> Self {
        Self {
            config,
            provider,
            signal_store,
            database: None,
            metrics: None,
            ledger: Mutex::new(SignalLedger::new()),
        }
    }

    pub fn with_database(mut self, database: Arc<AnalysisDatabase>) -> Self {
        self.database = Some(database);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Side last emitted for `symbol` at the configured resolution.
    pub async fn last_emitted(&self, symbol: &str) -> Option<SignalSide> {
        let key = SignalKey::new(symbol, self.config.resolution_minutes);
        self.ledger.lock().await.last(&key)
    }

    /// Analyze every symbol concurrently.
    pub async fn run_cycle(&self) -> CycleReport {
        let start = Instant::now();
        info!(
            symbols = self.config.symbols.len(),
            "===== Starting new analysis cycle at {} =====",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S")
        );

        let outcomes = join_all(self.config.symbols.iter().map(|symbol| async move {
            let outcome = match self.analyze_symbol(symbol).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(symbol = %symbol, error = %e, "Analysis failed for {}", symbol);
                    if let Some(ref metrics) = self.metrics {
                        metrics.analysis_failures_total.inc();
                    }
                    SymbolOutcome::Failed(e.to_string())
                }
            };
            (symbol.clone(), outcome)
        }))
        .await;

        if let Some(ref metrics) = self.metrics {
            metrics.analysis_cycles_total.inc();
            metrics
                .analysis_duration_seconds
                .observe(start.elapsed().as_secs_f64());
        }

        CycleReport { outcomes }
    }

    async fn analyze_symbol(&self, symbol: &str) -> Result<SymbolOutcome, RuntimeError> {
        let resolution = self.config.resolution_minutes;
        let candles = self
            .provider
            .get_candles(symbol, resolution, self.config.candle_count)
            .await?;

        if candles.len() < MIN_CANDLES {
            warn!(
                symbol = %symbol,
                count = candles.len(),
                min = MIN_CANDLES,
                "Not enough candles for {} ({} < {}), skipping",
                symbol,
                candles.len(),
                MIN_CANDLES
            );
            return Ok(SymbolOutcome::Skipped {
                candles: candles.len(),
            });
        }

        let series = SignalEngine::analyze(&candles, &self.config.range_filter)?;

        if let Some(ref db) = self.database {
            if let Err(e) = db.replace_analysis(symbol, resolution, series.rows()).await {
                error!(symbol = %symbol, error = %e, "Error saving analysis to database");
            }
        }

        let closed = series.closed_candle().ok_or_else(|| {
            IndicatorError::InvariantViolation("analyzed series has no closed candle".to_string())
        })?;
        info!(
            symbol = %symbol,
            signal = %closed.signal,
            "Analysis for {}: the closed candle at {} shows signal: {}",
            symbol,
            closed.candle.timestamp.format("%H:%M"),
            closed.signal
        );

        let key = SignalKey::new(symbol, resolution);
        let previous = self.ledger.lock().await.last(&key);
        let Some(side) = next_emission(previous, closed.signal) else {
            debug!(symbol = %symbol, previous = ?previous, "No new signal for {}", symbol);
            return Ok(SymbolOutcome::Unchanged(closed.signal));
        };

        let record = SignalRecord::new(
            generate_signal_id(),
            symbol,
            side,
            closed.candle.close,
            closed.candle.timestamp,
        );
        self.signal_store.upsert(record.clone()).await?;

        if let Some(ref db) = self.database {
            if let Err(e) = db.store_signal(&record, resolution).await {
                error!(symbol = %symbol, error = %e, "Error saving signal to database");
            }
        }

        self.ledger.lock().await.record(key, side);
        if let Some(ref metrics) = self.metrics {
            metrics.signals_emitted_total.inc();
        }

        info!(
            symbol = %symbol,
            side = %side,
            price = record.entry_price,
            signal_id = %record.signal_id,
            "Emitted {} signal for {} at {}",
            side,
            symbol,
            record.entry_price
        );
        Ok(SymbolOutcome::Emitted(record))
    }
}
