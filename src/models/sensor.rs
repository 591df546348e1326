// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Transient sensor readings. None of these are persisted.

use serde::{Deserialize, Serialize};

use crate::models::GeoPoint;

/// One accelerometer reading in m/s², delivered roughly every 100 ms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccelerationSample {
    /// Device timestamp in milliseconds
    pub timestamp_ms: u64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AccelerationSample {
    pub fn new(timestamp_ms: u64, x: f64, y: f64, z: f64) -> Self {
        Self {
            timestamp_ms,
            x,
            y,
            z,
        }
    }

    /// Euclidean norm of the acceleration vector.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// A step accepted by the step detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepEvent {
    pub timestamp_ms: u64,
}

/// A raw position fix from the location sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFix {
    pub timestamp_ms: u64,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationFix {
    /// Check that the coordinates are finite and within WGS84 ranges.
    pub fn validate(&self) -> Result<(), String> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!("latitude out of range: {}", self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!("longitude out of range: {}", self.longitude));
        }
        Ok(())
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude() {
        let sample = AccelerationSample::new(0, 3.0, 4.0, 0.0);
        assert_eq!(sample.magnitude(), 5.0);
    }

    #[test]
    fn test_location_validation() {
        let fix = |latitude, longitude| LocationFix {
            timestamp_ms: 0,
            latitude,
            longitude,
        };

        assert!(fix(37.4, -122.1).validate().is_ok());
        assert!(fix(90.0, 180.0).validate().is_ok());
        assert!(fix(90.5, 0.0).validate().is_err());
        assert!(fix(0.0, -180.01).validate().is_err());
        assert!(fix(f64::NAN, 0.0).validate().is_err());
    }
}
