// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod aggregator;
pub mod history;
pub mod metrics;
pub mod playback;
pub mod sensors;
pub mod session;
pub mod step_detector;

pub use aggregator::compute_averages;
pub use history::{ActivityHistory, Dashboard};
pub use playback::{PlaybackClient, PlaybackService, PlayerAction};
pub use sensors::{SensorEvent, SensorHub, SensorSubscription};
pub use session::{Session, SessionHandle, SessionSnapshot, SessionState, StopOutcome};
pub use step_detector::StepDetector;
