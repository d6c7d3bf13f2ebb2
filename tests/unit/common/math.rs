//! Unit tests for the streaming averages

use rangefilter::common::math::{ema_alpha, ema_series, ConditionalEma, StreamingEma};

use crate::test_utils::assert_close;

#[test]
fn test_alpha_from_span() {
    assert_close(ema_alpha(1), 1.0);
    assert_close(ema_alpha(2), 2.0 / 3.0);
    assert_close(ema_alpha(14), 2.0 / 15.0);
}

#[test]
fn test_streaming_ema_seeds_with_first_sample() {
    let mut ema = StreamingEma::new(14);
    assert!(ema.value().is_none());
    assert_eq!(ema.update(42.0), 42.0);
    assert_eq!(ema.value(), Some(42.0));
}

#[test]
fn test_streaming_ema_recurrence() {
    let mut ema = StreamingEma::new(3);
    ema.update(10.0);
    // alpha = 0.5
    assert_close(ema.update(20.0), 15.0);
    assert_close(ema.update(20.0), 17.5);
}

#[test]
fn test_ema_series_matches_streaming() {
    let values = [1.0, 4.0, 2.0, 8.0, 5.0];
    let series = ema_series(&values, 4);
    let mut ema = StreamingEma::new(4);
    for (v, s) in values.iter().zip(&series) {
        assert_eq!(ema.update(*v), *s);
    }
    assert_eq!(series[0], 1.0);
}

#[test]
fn test_span_one_tracks_input() {
    let series = ema_series(&[3.0, 7.0, -2.0], 1);
    assert_eq!(series, vec![3.0, 7.0, -2.0]);
}

#[test]
fn test_conditional_ema_unset_until_first_change() {
    let mut ema = ConditionalEma::new(2);
    assert_eq!(ema.step(100.0, false), None);
    assert_eq!(ema.step(100.0, false), None);
    assert_eq!(ema.step(103.0, true), Some(103.0));
}

#[test]
fn test_conditional_ema_carries_forward_between_changes() {
    let mut ema = ConditionalEma::new(2);
    ema.step(100.0, true);
    let updated = ema.step(106.0, true).unwrap();
    assert_close(updated, 104.0);
    // Samples without a change are ignored.
    assert_eq!(ema.step(500.0, false), Some(updated));
    assert_eq!(ema.step(500.0, false), Some(updated));
}
