//! Signal derivation from the range filter.

pub mod dedup;
pub mod detector;
pub mod engine;
pub mod id;

pub use dedup::*;
pub use detector::*;
pub use engine::*;
pub use id::generate_signal_id;
