//! Dashboard statistics.
//!
//! `RecentStats` is persisted under `@fitness_stats` and overwritten on
//! every session stop. `AverageStats` is never stored; it is recomputed
//! from the recent activity window on every load.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::ActivityRecord;

/// Totals of the most recently stopped session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecentStats {
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub steps: u64,
    /// Kilometers
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub last_activity: Option<ActivityRecord>,
}

impl RecentStats {
    /// Snapshot of a just-stopped session.
    pub fn from_record(record: &ActivityRecord) -> Self {
        Self {
            steps: record.steps,
            distance: record.distance,
            calories: record.calories,
            last_activity: Some(record.clone()),
        }
    }
}

/// Summed (or averaged) activity fields for one rollup window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WindowTotals {
    pub steps: f64,
    /// Seconds
    pub duration: f64,
    /// Kilometers
    pub distance: f64,
    pub calories: f64,
}

impl WindowTotals {
    /// Add one record's fields into the totals.
    pub fn add(&mut self, record: &ActivityRecord) {
        self.steps += record.steps as f64;
        self.duration += record.duration as f64;
        self.distance += record.distance;
        self.calories += record.calories;
    }

    /// Divide every field by `days`.
    pub fn per_day(self, days: f64) -> Self {
        Self {
            steps: self.steps / days,
            duration: self.duration / days,
            distance: self.distance / days,
            calories: self.calories / days,
        }
    }
}

/// Day/week/month averages shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AverageStats {
    pub day: WindowTotals,
    pub week: WindowTotals,
    pub month: WindowTotals,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(steps: u64) -> ActivityRecord {
        ActivityRecord {
            date: Utc::now(),
            duration: 600,
            steps,
            distance: 0.762,
            calories: 40.0,
            end_location: None,
        }
    }

    #[test]
    fn test_window_totals_add_and_divide() {
        let mut totals = WindowTotals::default();
        totals.add(&record(1000));
        totals.add(&record(400));

        assert_eq!(totals.steps, 1400.0);
        assert_eq!(totals.duration, 1200.0);
        assert_eq!(totals.calories, 80.0);

        let avg = totals.per_day(7.0);
        assert_eq!(avg.steps, 200.0);
        assert!((avg.duration - 1200.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_recent_stats_from_record() {
        let r = record(1234);
        let stats = RecentStats::from_record(&r);
        assert_eq!(stats.steps, 1234);
        assert_eq!(stats.calories, 40.0);
        assert_eq!(stats.last_activity, Some(r));
    }

    #[test]
    fn test_recent_stats_tolerates_missing_fields() {
        let stats: RecentStats = serde_json::from_str(r#"{"steps": 12}"#).unwrap();
        assert_eq!(stats.steps, 12);
        assert_eq!(stats.distance, 0.0);
        assert!(stats.last_activity.is_none());
    }
}
