//! Turns a filter line into discrete BUY/SELL events.
//!
//! A candle is "long" when it closes above an up-moving filter and "short"
//! when it closes below a down-moving one. The last long/short seen is
//! remembered as the trend, and a signal fires only on the candle where the
//! trend flips.

use crate::indicators::error::IndicatorError;
use crate::models::{Candle, Direction, FilterPoint, Signal, TrendState};

pub struct SignalDetector;

impl SignalDetector {
    /// Signal label for every candle, in order.
    pub fn detect(
        candles: &[Candle],
        points: &[FilterPoint],
    ) -> Result<Vec<Signal>, IndicatorError> {
        Ok(Self::detect_with_trend(candles, points)?
            .into_iter()
            .map(|(signal, _)| signal)
            .collect())
    }

    /// Like [`SignalDetector::detect`] but also returns the trend after each candle.
    pub fn detect_with_trend(
        candles: &[Candle],
        points: &[FilterPoint],
    ) -> Result<Vec<(Signal, TrendState)>, IndicatorError> {
        if candles.len() != points.len() {
            return Err(IndicatorError::InvariantViolation(format!(
                "{} candles but {} filter points",
                candles.len(),
                points.len()
            )));
        }

        let mut tracker = TrendTracker::default();
        Ok(candles
            .iter()
            .zip(points)
            .enumerate()
            .map(|(i, (candle, point))| {
                if i == 0 {
                    // Nothing to cross from on the first candle.
                    (Signal::None, tracker.trend())
                } else {
                    let signal = tracker.push(candle.close, point);
                    (signal, tracker.trend())
                }
            })
            .collect())
    }
}

/// Crossover memory, updated once per candle.
#[derive(Debug, Clone, Copy)]
pub struct TrendTracker {
    trend: TrendState,
}

impl Default for TrendTracker {
    fn default() -> Self {
        Self {
            trend: TrendState::Undetermined,
        }
    }
}

impl TrendTracker {
    /// Fold in one candle and return the signal it produces.
    pub fn push(&mut self, close: f64, point: &FilterPoint) -> Signal {
        let long = close > point.filter_value && point.direction == Direction::Up;
        let short = close < point.filter_value && point.direction == Direction::Down;
        let previous = self.trend;

        if long {
            self.trend = TrendState::Long;
        } else if short {
            self.trend = TrendState::Short;
        }

        match previous {
            TrendState::Short if long => Signal::Buy,
            TrendState::Long if short => Signal::Sell,
            _ => Signal::None,
        }
    }

    pub fn trend(&self) -> TrendState {
        self.trend
    }
}
