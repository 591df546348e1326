// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Completed activity record, as persisted in the activity history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// One tracking session, created once when the session stops.
///
/// Stored newest-first under `@fitness_activities`; never modified after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityRecord {
    /// When the session stopped
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: DateTime<Utc>,
    /// Elapsed (unpaused) time in seconds
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub duration: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub steps: u64,
    /// Distance in kilometers
    pub distance: f64,
    /// Estimated kcal
    pub calories: f64,
    /// Last known position when the session stopped
    #[serde(default)]
    pub end_location: Option<GeoPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_stored_shape() {
        let json = r#"{
            "date": "2024-03-01T08:15:30.000Z",
            "duration": 1800,
            "steps": 2500,
            "distance": 1.905,
            "calories": 100,
            "endLocation": { "latitude": 45.46, "longitude": 9.19 }
        }"#;

        let record: ActivityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.duration, 1800);
        assert_eq!(record.steps, 2500);
        assert_eq!(record.calories, 100.0);
        assert_eq!(
            record.end_location,
            Some(GeoPoint {
                latitude: 45.46,
                longitude: 9.19
            })
        );
    }

    #[test]
    fn test_null_end_location() {
        let json = r#"{"date":"2024-03-01T08:15:30Z","duration":0,"steps":0,
            "distance":0,"calories":0,"endLocation":null}"#;
        let record: ActivityRecord = serde_json::from_str(json).unwrap();
        assert!(record.end_location.is_none());

        let out = serde_json::to_value(&record).unwrap();
        assert!(out.get("endLocation").unwrap().is_null());
    }
}
