//! Streaming averages shared by the indicators.
//!
//! Both averages use the non-adjusted recurrence
//! `ema[i] = ema[i-1] + alpha * (x[i] - ema[i-1])` with `alpha = 2 / (span + 1)`,
//! seeded with the first sample they see. This is not the same as a
//! fully-weighted warm-up window: the two differ during spin-up, with a gap
//! that shrinks roughly like `(1 - alpha)^n`.

/// Smoothing factor for an EMA span.
#[inline]
pub fn ema_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Exponential moving average updated one sample at a time.
#[derive(Debug, Clone, Copy)]
pub struct StreamingEma {
    alpha: f64,
    value: Option<f64>,
}

impl StreamingEma {
    pub fn new(span: usize) -> Self {
        Self {
            alpha: ema_alpha(span),
            value: None,
        }
    }

    /// Feed the next sample and return the updated average.
    ///
    /// The first sample becomes the average unchanged.
    pub fn update(&mut self, sample: f64) -> f64 {
        let next = match self.value {
            None => sample,
            Some(prev) => prev + self.alpha * (sample - prev),
        };
        self.value = Some(next);
        next
    }

    /// Current average, `None` until the first sample.
    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// EMA that only moves on samples the caller marks as updates.
///
/// Between updates the last value is carried forward unchanged. Before the
/// first update there is no value at all, which is distinct from zero.
#[derive(Debug, Clone, Copy)]
pub struct ConditionalEma {
    inner: StreamingEma,
}

impl ConditionalEma {
    pub fn new(span: usize) -> Self {
        Self {
            inner: StreamingEma::new(span),
        }
    }

    /// Advance one step. `sample` is only folded in when `changed` is true.
    pub fn step(&mut self, sample: f64, changed: bool) -> Option<f64> {
        if changed {
            Some(self.inner.update(sample))
        } else {
            self.inner.value()
        }
    }
}

/// Streaming EMA over a whole slice.
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let mut ema = StreamingEma::new(span);
    values.iter().map(|&v| ema.update(v)).collect()
}
