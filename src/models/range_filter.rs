//! Range filter configuration and per-candle outputs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::indicators::error::IndicatorError;

/// Which prices feed the filter band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    /// High and low are both the close.
    Close,
    /// High and low come from the candle wicks.
    Wicks,
}

impl FromStr for PriceSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "close" => Ok(Self::Close),
            "wicks" => Ok(Self::Wicks),
            other => Err(format!("unknown price source '{}'", other)),
        }
    }
}

/// Range filter parameters. Immutable for one computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeFilterConfig {
    pub price_source: PriceSource,
    pub range_multiplier: f64,
    /// Span of the EMA over absolute average-price changes.
    pub change_span: usize,
    pub smooth_range: bool,
    /// Span of the second smoothing pass, used when `smooth_range` is set.
    pub range_smooth_span: usize,
    pub average_filter_changes: bool,
    /// Span of the EMA over filter changes, used when `average_filter_changes` is set.
    pub average_span: usize,
}

impl Default for RangeFilterConfig {
    fn default() -> Self {
        Self {
            price_source: PriceSource::Close,
            range_multiplier: 2.618,
            change_span: 14,
            smooth_range: true,
            range_smooth_span: 27,
            average_filter_changes: true,
            average_span: 2,
        }
    }
}

impl RangeFilterConfig {
    pub fn validate(&self) -> Result<(), IndicatorError> {
        if !self.range_multiplier.is_finite() || self.range_multiplier <= 0.0 {
            return Err(IndicatorError::InvalidConfig(format!(
                "range_multiplier must be positive, got {}",
                self.range_multiplier
            )));
        }
        for (name, span) in [
            ("change_span", self.change_span),
            ("range_smooth_span", self.range_smooth_span),
            ("average_span", self.average_span),
        ] {
            if span == 0 {
                return Err(IndicatorError::InvalidConfig(format!(
                    "{} must be at least 1",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Longest span in play; output before this many candles is spin-up.
    pub fn spin_up(&self) -> usize {
        let mut span = self.change_span;
        if self.smooth_range {
            span = span.max(self.range_smooth_span);
        }
        span
    }
}

/// Direction of the filter line, forward-filled through flat stretches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    /// No move has been seen yet.
    Flat,
}

impl Direction {
    /// Numeric encoding used in stored rows: 1, -1, 0.
    pub fn as_i32(self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
            Direction::Flat => 0,
        }
    }
}

/// Filter value and direction for one candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterPoint {
    pub filter_value: f64,
    pub direction: Direction,
}

/// Crossover memory carried between candles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendState {
    Long,
    Short,
    Undetermined,
}

impl fmt::Display for TrendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendState::Long => write!(f, "LONG"),
            TrendState::Short => write!(f, "SHORT"),
            TrendState::Undetermined => write!(f, "UNDETERMINED"),
        }
    }
}
