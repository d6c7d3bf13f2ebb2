//! Range filter analysis over a full candle series.

use serde::Serialize;
use tracing::debug;

use crate::indicators::error::IndicatorError;
use crate::indicators::trend::RangeFilterEngine;
use crate::models::{AnalyzedCandle, Candle, RangeFilterConfig, Signal};
use crate::signals::detector::SignalDetector;

/// Candles a caller should have before trusting a decision (more than 50).
pub const MIN_CANDLES: usize = 51;

pub struct SignalEngine;

impl SignalEngine {
    /// Validate, compute the filter and detect signals in one go.
    pub fn analyze(
        candles: &[Candle],
        config: &RangeFilterConfig,
    ) -> Result<AnalysisSeries, IndicatorError> {
        let points = RangeFilterEngine::compute(candles, config)?;
        let labels = SignalDetector::detect_with_trend(candles, &points)?;

        let rows: Vec<AnalyzedCandle> = candles
            .iter()
            .zip(points)
            .zip(labels)
            .map(|((candle, point), (signal, trend))| AnalyzedCandle {
                candle: candle.clone(),
                filter: point.filter_value,
                direction: point.direction,
                trend,
                signal,
            })
            .collect();

        if rows.len() < config.spin_up() {
            debug!(
                count = rows.len(),
                spin_up = config.spin_up(),
                "SignalEngine: series shorter than spin-up, output is unreliable"
            );
        }

        Ok(AnalysisSeries { rows })
    }
}

/// Annotated series produced by [`SignalEngine::analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSeries {
    rows: Vec<AnalyzedCandle>,
}

impl AnalysisSeries {
    pub fn rows(&self) -> &[AnalyzedCandle] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn signals(&self) -> impl Iterator<Item = Signal> + '_ {
        self.rows.iter().map(|r| r.signal)
    }

    /// Last fully closed candle: the second-to-last row.
    ///
    /// The final row is the still-forming candle and is never used for a
    /// decision.
    pub fn closed_candle(&self) -> Option<&AnalyzedCandle> {
        self.rows.len().checked_sub(2).map(|i| &self.rows[i])
    }
}
