//! Range filter trend signals.
//!
//! The indicator core (`common`, `indicators`, `signals`) is pure and
//! synchronous. `services`, `db` and `core` wire it to an exchange, storage,
//! a polling schedule and an HTTP API.

pub mod common;
pub mod config;
pub mod core;
pub mod db;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
