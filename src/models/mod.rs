// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod playback;
pub mod sensor;
pub mod stats;

pub use activity::{ActivityRecord, GeoPoint};
pub use playback::{CurrentlyPlaying, NowPlaying, PlayerState, Track};
pub use sensor::{AccelerationSample, LocationFix, StepEvent};
pub use stats::{AverageStats, RecentStats, WindowTotals};
