//! Clock and calendar-day arithmetic.
//!
//! # Responsibility
//! - Provide the epoch-millisecond clock used for record timestamps.
//! - Convert timestamps to calendar-day indexes for uniqueness checks
//!   and whole-day age computations.
//!
//! # Invariants
//! - All timestamps are Unix epoch milliseconds (UTC).
//! - Day arithmetic truncates toward negative infinity so every
//!   millisecond of a day maps to the same index.

use std::time::{SystemTime, UNIX_EPOCH};

pub const MS_PER_DAY: i64 = 86_400_000;

/// Current time in Unix epoch milliseconds.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as i64)
        .unwrap_or(0)
}

/// Calendar-day index (days since the Unix epoch, UTC) for a timestamp.
pub fn day_index(timestamp_ms: i64) -> i64 {
    timestamp_ms.div_euclid(MS_PER_DAY)
}

/// Whole days elapsed between two timestamps, truncated toward zero.
///
/// `whole_days_between(anchor, now)` is the record's age in days.
pub fn whole_days_between(from_ms: i64, to_ms: i64) -> i64 {
    (to_ms - from_ms) / MS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::{day_index, now_ms, whole_days_between, MS_PER_DAY};

    #[test]
    fn day_index_groups_a_whole_day() {
        assert_eq!(day_index(0), 0);
        assert_eq!(day_index(MS_PER_DAY - 1), 0);
        assert_eq!(day_index(MS_PER_DAY), 1);
        assert_eq!(day_index(-1), -1);
    }

    #[test]
    fn whole_days_truncate_toward_zero() {
        assert_eq!(whole_days_between(0, MS_PER_DAY - 1), 0);
        assert_eq!(whole_days_between(0, MS_PER_DAY), 1);
        assert_eq!(whole_days_between(0, 2 * MS_PER_DAY + 5), 2);
    }

    #[test]
    fn clock_is_past_epoch() {
        assert!(now_ms() > 0);
    }
}
