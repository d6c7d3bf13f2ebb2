//! CoinEx exchange integration.

pub mod client;
pub mod types;

pub use client::{resolution_to_period, CoinexClient, DEFAULT_BASE_URL};
