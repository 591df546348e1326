// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Whole days between `date` and `now`, rounded toward negative infinity.
///
/// A timestamp in the future yields a negative count.
pub fn age_in_days(now: DateTime<Utc>, date: DateTime<Utc>) -> i64 {
    (now - date).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// Format elapsed seconds as `HH:MM:SS`. Hours are not wrapped.
pub fn format_elapsed(seconds: u64) -> String {
    let hrs = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hrs, mins, secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_age_in_days_floors() {
        let now = noon();
        assert_eq!(age_in_days(now, now), 0);
        assert_eq!(age_in_days(now, now - Duration::hours(23)), 0);
        assert_eq!(age_in_days(now, now - Duration::hours(24)), 1);
        assert_eq!(age_in_days(now, now - Duration::hours(47)), 1);
        assert_eq!(age_in_days(now, now - Duration::days(10)), 10);
    }

    #[test]
    fn test_age_in_days_future_is_negative() {
        let now = noon();
        assert_eq!(age_in_days(now, now + Duration::hours(1)), -1);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00:00");
        assert_eq!(format_elapsed(61), "00:01:01");
        assert_eq!(format_elapsed(3 * 3600 + 25 * 60 + 9), "03:25:09");
        assert_eq!(format_elapsed(100 * 3600), "100:00:00");
    }

    #[test]
    fn test_format_utc_rfc3339() {
        assert_eq!(format_utc_rfc3339(noon()), "2024-06-15T12:00:00Z");
    }
}
