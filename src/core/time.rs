//! Calendar and rounding helpers shared by every scoring pass.
//!
//! All day arithmetic is done in UTC. Scores are rounded half away from zero
//! (`f64::round`) and clamped after rounding, so intermediate sums may leave
//! the valid range without affecting the result.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Fractional days elapsed from `earlier` to `later` (negative if reversed).
pub fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Whole days elapsed, truncated toward zero.
pub fn whole_days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later - earlier).num_days()
}

/// Round half away from zero.
pub fn round_half_away(value: f64) -> i64 {
    value.round() as i64
}

/// Round then clamp into `[min, max]`.
pub fn clamp_round(value: f64, min: i64, max: i64) -> i64 {
    if value.is_nan() {
        return min;
    }
    round_half_away(value).clamp(min, max)
}

/// Round then clamp into the 0-100 score range.
pub fn score(value: f64) -> u32 {
    clamp_round(value, 0, 100) as u32
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last representable instant of `date`.
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + Duration::days(1) - Duration::nanoseconds(1)
}

/// Every calendar day from `start` through `end`, both inclusive.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}
