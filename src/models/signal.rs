use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::candle::Candle;
use super::range_filter::{Direction, TrendState};

/// Per-candle signal label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    #[serde(rename = "NO_SIGNAL")]
    None,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

impl Signal {
    /// The actionable side, if any.
    pub fn side(self) -> Option<SignalSide> {
        match self {
            Signal::None => None,
            Signal::Buy => Some(SignalSide::Buy),
            Signal::Sell => Some(SignalSide::Sell),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Signal::None => "NO_SIGNAL",
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of an emitted signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalSide {
    Buy,
    Sell,
}

impl SignalSide {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalSide::Buy => "BUY",
            SignalSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for SignalSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candle annotated with everything the analysis derived for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedCandle {
    #[serde(flatten)]
    pub candle: Candle,
    pub filter: f64,
    pub direction: Direction,
    pub trend: TrendState,
    pub signal: Signal,
}

/// The current-signal artifact handed to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub signal_id: String,
    pub symbol: String,
    pub signal_side: SignalSide,
    pub entry_price: f64,
    /// Open time of the decision candle, `%Y-%m-%d %H:%M:%S` in UTC.
    pub creation_time_utc: String,
}

pub const CREATION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl SignalRecord {
    pub fn new(
        signal_id: String,
        symbol: impl Into<String>,
        side: SignalSide,
        entry_price: f64,
        candle_time: DateTime<Utc>,
    ) -> Self {
        Self {
            signal_id,
            symbol: symbol.into(),
            signal_side: side,
            entry_price,
            creation_time_utc: candle_time.format(CREATION_TIME_FORMAT).to_string(),
        }
    }
}
