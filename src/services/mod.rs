//! External market data sources.

pub mod coinex;
pub mod market_data;

pub use market_data::{MarketDataError, MarketDataProvider};
