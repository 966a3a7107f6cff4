use chrono::{DateTime, Utc};

/// Age of a bar in fractional minutes. Negative when the bar is in the future.
pub fn bar_age_minutes(bar_time: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - bar_time).num_milliseconds() as f64 / 60_000.0
}

/// True when the bar's age lies within `[0, window_min]`.
///
/// Only gates notification delivery; stale bars are still classified and
/// reported.
pub fn is_fresh(bar_time: DateTime<Utc>, now: DateTime<Utc>, window_min: f64) -> bool {
    let age = bar_age_minutes(bar_time, now);
    (0.0..=window_min).contains(&age)
}
