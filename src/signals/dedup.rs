//! Emit-on-change policy across polling cycles.
//!
//! The ledger is owned by the polling loop and passed in explicitly; the
//! analysis itself keeps no memory between runs.

use std::collections::HashMap;

use crate::models::{Signal, SignalSide};

/// Key a ledger entry is tracked under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignalKey {
    pub symbol: String,
    pub resolution_minutes: u32,
}

impl SignalKey {
    pub fn new(symbol: impl Into<String>, resolution_minutes: u32) -> Self {
        Self {
            symbol: symbol.into(),
            resolution_minutes,
        }
    }
}

/// Side to emit for `current`, given the side last emitted for the same key.
///
/// `NO_SIGNAL` never emits, and neither does a repeat of the last side.
pub fn next_emission(previous: Option<SignalSide>, current: Signal) -> Option<SignalSide> {
    let side = current.side()?;
    (previous != Some(side)).then_some(side)
}

/// Last emitted side per key.
#[derive(Debug, Clone, Default)]
pub struct SignalLedger {
    last: HashMap<SignalKey, SignalSide>,
}

impl SignalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self, key: &SignalKey) -> Option<SignalSide> {
        self.last.get(key).copied()
    }

    /// Mark `side` as emitted for `key`.
    pub fn record(&mut self, key: SignalKey, side: SignalSide) {
        self.last.insert(key, side);
    }
}
