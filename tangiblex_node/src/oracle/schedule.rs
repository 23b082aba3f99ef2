use chrono::{DateTime, Utc};
use std::time::Duration;

/// Time to sleep from `now` until the next wall-clock boundary of `period`.
///
/// A 300 s period fires at :00, :05, :10 ... of every hour, like `*/5 * * * *`.
pub fn delay_until_next_tick(now: DateTime<Utc>, period: Duration) -> Duration {
    let period_ms = i64::try_from(period.as_millis().max(1)).unwrap_or(i64::MAX);
    let elapsed = now.timestamp_millis().rem_euclid(period_ms);
    Duration::from_millis((period_ms - elapsed) as u64)
}
