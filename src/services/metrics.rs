// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Unit conversions from a cumulative step count.
//!
//! These are flat linear estimates, not calibrated to the user.

/// Average stride length in meters.
pub const STRIDE_LENGTH_M: f64 = 0.762;

/// Energy estimate per step in kcal.
pub const KCAL_PER_STEP: f64 = 0.04;

/// Distance covered by `steps` steps, in kilometers.
pub fn distance_km(steps: u64) -> f64 {
    steps as f64 * STRIDE_LENGTH_M / 1000.0
}

/// Calories burned over `steps` steps.
pub fn calories_burned(steps: u64) -> f64 {
    steps as f64 * KCAL_PER_STEP
}

/// Steps per minute over `elapsed_secs`. Zero when no time has elapsed.
pub fn cadence_spm(steps: u64, elapsed_secs: u64) -> f64 {
    if elapsed_secs == 0 {
        return 0.0;
    }
    steps as f64 * 60.0 / elapsed_secs as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_km() {
        assert_eq!(distance_km(0), 0.0);
        assert_eq!(distance_km(1000), 0.762);
        for n in [1u64, 7, 1312, 99_999] {
            assert!((distance_km(n) - n as f64 * 0.000762).abs() < 1e-9);
        }
    }

    #[test]
    fn test_calories_burned() {
        assert_eq!(calories_burned(0), 0.0);
        assert_eq!(calories_burned(1000), 40.0);
        assert!((calories_burned(25) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cadence() {
        assert_eq!(cadence_spm(100, 0), 0.0);
        assert_eq!(cadence_spm(120, 60), 120.0);
        assert_eq!(cadence_spm(50, 120), 25.0);
    }
}
