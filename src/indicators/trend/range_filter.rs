//! Range Filter indicator
//!
//! An adaptive trend line that only moves when price leaves a volatility
//! scaled band around its previous value. The band is an EMA of absolute
//! average-price changes times a multiplier, optionally smoothed again. The
//! raw filter can additionally be averaged over the candles on which it
//! actually moved.
//!
//! Everything is computed in one forward scan: each output depends only on
//! the current candle and the registers carried from the previous one, so
//! [`RangeFilterState::push`] can also be driven one candle at a time.

use crate::common::math::{ConditionalEma, StreamingEma};
use crate::indicators::error::IndicatorError;
use crate::indicators::validation::validate_candles;
use crate::models::{Candle, Direction, FilterPoint, PriceSource, RangeFilterConfig};

pub struct RangeFilterEngine;

impl RangeFilterEngine {
    /// Filter value and direction for every candle, in order.
    ///
    /// Output has the same length as the input. Output before
    /// [`RangeFilterConfig::spin_up`] candles is not representative.
    ///
    /// Finite prices large enough to push the band or the filter out of
    /// range fail with [`IndicatorError::InvalidCandle`] at the first
    /// candle affected.
    pub fn compute(
        candles: &[Candle],
        config: &RangeFilterConfig,
    ) -> Result<Vec<FilterPoint>, IndicatorError> {
        config.validate()?;
        validate_candles(candles)?;

        let mut state = RangeFilterState::new(config);
        candles
            .iter()
            .enumerate()
            .map(|(index, candle)| {
                let point = state.push(candle);
                if point.filter_value.is_finite() && state.last_range().is_finite() {
                    Ok(point)
                } else {
                    Err(IndicatorError::InvalidCandle {
                        index,
                        reason: "prices overflow the filter band".to_string(),
                    })
                }
            })
            .collect()
    }
}

/// Registers carried between candles.
#[derive(Debug, Clone)]
pub struct RangeFilterState {
    source: PriceSource,
    multiplier: f64,
    change_ema: StreamingEma,
    range_ema: Option<StreamingEma>,
    averager: Option<ConditionalEma>,
    prev_avg_price: Option<f64>,
    prev_raw: Option<f64>,
    prev_value: Option<f64>,
    direction: Direction,
    last_range: f64,
}

impl RangeFilterState {
    pub fn new(config: &RangeFilterConfig) -> Self {
        Self {
            source: config.price_source,
            multiplier: config.range_multiplier,
            change_ema: StreamingEma::new(config.change_span),
            range_ema: config
                .smooth_range
                .then(|| StreamingEma::new(config.range_smooth_span)),
            averager: config
                .average_filter_changes
                .then(|| ConditionalEma::new(config.average_span)),
            prev_avg_price: None,
            prev_raw: None,
            prev_value: None,
            direction: Direction::Flat,
            last_range: 0.0,
        }
    }

    /// Advance by one candle.
    pub fn push(&mut self, candle: &Candle) -> FilterPoint {
        let (high, low) = match self.source {
            PriceSource::Close => (candle.close, candle.close),
            PriceSource::Wicks => (candle.high, candle.low),
        };
        let avg_price = high / 2.0 + low / 2.0;

        let raw = match (self.prev_avg_price, self.prev_raw) {
            (Some(prev_avg), Some(prev_raw)) => {
                let range = self.next_range((avg_price - prev_avg).abs());
                if high - range > prev_raw {
                    high - range
                } else if low + range < prev_raw {
                    low + range
                } else {
                    prev_raw
                }
            }
            // First candle: no change yet, the filter starts at the average price.
            _ => avg_price,
        };

        let value = match self.averager.as_mut() {
            Some(averager) => {
                // The first candle counts as a change, so the average is
                // seeded immediately and is never unset afterwards.
                let changed = self.prev_raw.map_or(true, |prev| raw != prev);
                averager.step(raw, changed).unwrap_or(raw)
            }
            None => raw,
        };

        if let Some(prev) = self.prev_value {
            if value > prev {
                self.direction = Direction::Up;
            } else if value < prev {
                self.direction = Direction::Down;
            }
        }

        self.prev_avg_price = Some(avg_price);
        self.prev_raw = Some(raw);
        self.prev_value = Some(value);

        FilterPoint {
            filter_value: value,
            direction: self.direction,
        }
    }

    fn next_range(&mut self, abs_change: f64) -> f64 {
        let smoothed_change = self.change_ema.update(abs_change);
        let mut range = self.multiplier * smoothed_change;
        if let Some(ema) = self.range_ema.as_mut() {
            range = ema.update(range);
        }
        self.last_range = range;
        range
    }

    /// Band width used for the most recent candle, zero before the second one.
    pub fn last_range(&self) -> f64 {
        self.last_range
    }

    /// Unaveraged filter value of the most recent candle.
    pub fn last_raw(&self) -> Option<f64> {
        self.prev_raw
    }
}
