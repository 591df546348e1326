// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rolling day/week/month averages over recent activity records.

use chrono::{DateTime, Utc};

use crate::models::{ActivityRecord, AverageStats, WindowTotals};
use crate::time_utils::age_in_days;

/// Number of most recent records the dashboard aggregates over.
pub const RECENT_WINDOW: usize = 5;

/// The most recent records of a newest-first history.
pub fn recent_window(records: &[ActivityRecord]) -> &[ActivityRecord] {
    &records[..records.len().min(RECENT_WINDOW)]
}

/// Compute day/week/month averages relative to `now`.
///
/// Each record is added to every window its age (in whole days, floored)
/// falls into: day is `<= 1`, week `<= 7`, month `<= 30`. The windows are
/// then divided by 1, 7 and 30 regardless of how many days had activity.
pub fn compute_averages(records: &[ActivityRecord], now: DateTime<Utc>) -> AverageStats {
    let mut day = WindowTotals::default();
    let mut week = WindowTotals::default();
    let mut month = WindowTotals::default();

    for record in records {
        let age = age_in_days(now, record.date);
        if age <= 1 {
            day.add(record);
        }
        if age <= 7 {
            week.add(record);
        }
        if age <= 30 {
            month.add(record);
        }
    }

    AverageStats {
        day: day.per_day(1.0),
        week: week.per_day(7.0),
        month: month.per_day(30.0),
    }
}
