//! Persistence for analysis output.

pub mod error;
pub mod questdb;
pub mod signal_file;

pub use error::StoreError;
pub use questdb::{analysis_table_name, staging_table_name, AnalysisDatabase};
pub use signal_file::SignalFileStore;
