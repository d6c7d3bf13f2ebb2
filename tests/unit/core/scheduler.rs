//! Unit tests for candle-aligned scheduling

use chrono::{DateTime, TimeZone, Utc};
use rangefilter::core::{CandleSchedule, ScheduleError};

fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, h, m, s).unwrap()
}

#[test]
fn test_expressions() {
    assert_eq!(CandleSchedule::new(1).unwrap().expression(), "1 */1 * * * *");
    assert_eq!(CandleSchedule::new(15).unwrap().expression(), "1 */15 * * * *");
    assert_eq!(CandleSchedule::new(60).unwrap().expression(), "1 0 */1 * * *");
    assert_eq!(CandleSchedule::new(240).unwrap().expression(), "1 0 */4 * * *");
    assert_eq!(CandleSchedule::new(1440).unwrap().expression(), "1 0 0 * * *");
}

#[test]
fn test_unaligned_resolutions_are_rejected() {
    for minutes in [0, 7, 90, 420] {
        assert!(
            matches!(
                CandleSchedule::new(minutes),
                Err(ScheduleError::UnalignedResolution(m)) if m == minutes
            ),
            "{} minutes",
            minutes
        );
    }
}

#[test]
fn test_next_run_is_one_second_past_the_boundary() {
    let schedule = CandleSchedule::new(15).unwrap();
    assert_eq!(schedule.next_after(at(10, 7, 30)), Some(at(10, 15, 1)));
    assert_eq!(schedule.next_after(at(10, 59, 59)), Some(at(11, 0, 1)));
}

#[test]
fn test_next_run_is_strictly_after_now() {
    let schedule = CandleSchedule::new(15).unwrap();
    assert_eq!(schedule.next_after(at(10, 15, 1)), Some(at(10, 30, 1)));
}

#[test]
fn test_hourly_and_daily_runs() {
    let hourly = CandleSchedule::new(60).unwrap();
    assert_eq!(hourly.next_after(at(10, 7, 30)), Some(at(11, 0, 1)));

    let daily = CandleSchedule::new(1440).unwrap();
    assert_eq!(
        daily.next_after(at(10, 7, 30)),
        Some(Utc.with_ymd_and_hms(2024, 3, 6, 0, 0, 1).unwrap())
    );
}
