//! Trend indicators: Range Filter

pub mod range_filter;

pub use range_filter::*;
