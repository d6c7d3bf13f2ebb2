pub mod error;
pub mod validation;

pub mod trend;

pub use error::IndicatorError;
pub use validation::*;
