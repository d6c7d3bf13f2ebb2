use thiserror::Error;

/// Failures of the indicator and signal core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// Non-finite prices or timestamps that do not strictly increase.
    #[error("invalid candle at index {index}: {reason}")]
    InvalidCandle { index: usize, reason: String },

    #[error("insufficient data: need at least {required} candles, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Internal inconsistency between parallel series. Programming error.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("invalid range filter configuration: {0}")]
    InvalidConfig(String),
}
