//! Shared data models spanning the engine layers.

pub mod candle;
pub mod range_filter;
pub mod signal;

pub use candle::Candle;
pub use range_filter::{Direction, FilterPoint, PriceSource, RangeFilterConfig, TrendState};
pub use signal::{AnalyzedCandle, Signal, SignalRecord, SignalSide};
