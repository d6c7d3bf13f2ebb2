//! Environment-driven configuration.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::models::{PriceSource, RangeFilterConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Deployment environment name, `sandbox` unless `APP_ENV` says otherwise.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub symbols: Vec<String>,
    pub resolution_minutes: u32,
    pub candle_count: usize,
    pub coinex_base_url: String,
    pub questdb_url: Option<String>,
    pub signals_file: PathBuf,
    pub port: u16,
    /// Port the worker serves `/metrics` on.
    pub metrics_port: u16,
    /// Worker sleep after a cycle fails unexpectedly.
    pub error_backoff_seconds: u64,
    pub range_filter: RangeFilterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: vec!["BTCUSDT".to_string()],
            resolution_minutes: 15,
            candle_count: 200,
            coinex_base_url: "https://api.coinex.com".to_string(),
            questdb_url: None,
            signals_file: PathBuf::from("signals.json"),
            port: 8080,
            metrics_port: 9100,
            error_backoff_seconds: 300,
            range_filter: RangeFilterConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(raw) = lookup("SYMBOLS") {
            // Markets are uppercase on the exchange and in the signal file.
            let mut symbols: Vec<String> = Vec::new();
            for symbol in raw.split(',').map(|s| s.trim().to_ascii_uppercase()) {
                if !symbol.is_empty() && !symbols.contains(&symbol) {
                    symbols.push(symbol);
                }
            }
            if symbols.is_empty() {
                return Err(ConfigError::Empty("SYMBOLS"));
            }
            config.symbols = symbols;
        }

        if let Some(v) = parse::<u32, _>(&lookup, "RESOLUTION_MINUTES")? {
            config.resolution_minutes = positive("RESOLUTION_MINUTES", v)?;
        }
        if let Some(v) = parse::<usize, _>(&lookup, "CANDLE_COUNT")? {
            config.candle_count = positive("CANDLE_COUNT", v)?;
        }
        if let Some(url) = lookup("COINEX_BASE_URL") {
            config.coinex_base_url = url.trim_end_matches('/').to_string();
        }
        config.questdb_url = lookup("QUESTDB_URL").filter(|s| !s.trim().is_empty());
        if let Some(path) = lookup("SIGNALS_FILE") {
            config.signals_file = PathBuf::from(path);
        }
        if let Some(v) = parse(&lookup, "PORT")? {
            config.port = v;
        }
        if let Some(v) = parse(&lookup, "METRICS_PORT")? {
            config.metrics_port = v;
        }
        if let Some(v) = parse(&lookup, "ERROR_BACKOFF_SECONDS")? {
            config.error_backoff_seconds = v;
        }

        let rf = &mut config.range_filter;
        if let Some(v) = parse::<PriceSource, _>(&lookup, "RF_PRICE_SOURCE")? {
            rf.price_source = v;
        }
        if let Some(v) = parse(&lookup, "RF_RANGE_MULTIPLIER")? {
            rf.range_multiplier = v;
        }
        if let Some(v) = parse(&lookup, "RF_CHANGE_SPAN")? {
            rf.change_span = v;
        }
        if let Some(v) = parse(&lookup, "RF_SMOOTH_RANGE")? {
            rf.smooth_range = v;
        }
        if let Some(v) = parse(&lookup, "RF_RANGE_SMOOTH_SPAN")? {
            rf.range_smooth_span = v;
        }
        if let Some(v) = parse(&lookup, "RF_AVERAGE_FILTER_CHANGES")? {
            rf.average_filter_changes = v;
        }
        if let Some(v) = parse(&lookup, "RF_AVERAGE_SPAN")? {
            rf.average_span = v;
        }
        rf.validate().map_err(|e| ConfigError::Invalid {
            key: "RF_*",
            value: format!("{:?}", rf),
            reason: e.to_string(),
        })?;

        Ok(config)
    }
}

fn parse<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                key,
                value: raw,
                reason: e.to_string(),
            }),
    }
}

fn positive<T>(key: &'static str, value: T) -> Result<T, ConfigError>
where
    T: Default + PartialOrd + ToString,
{
    if value > T::default() {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        })
    }
}
