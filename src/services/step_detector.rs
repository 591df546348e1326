// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Step detection by acceleration magnitude threshold with a refractory
//! period.
//!
//! A sample whose magnitude exceeds the threshold counts as a step unless
//! the previous accepted step is within the refractory period. There is no
//! filtering or gravity removal.

use crate::models::{AccelerationSample, StepEvent};

/// Magnitude above which a sample is a step candidate (m/s²).
pub const STEP_THRESHOLD: f64 = 1.2;

/// Minimum time between two accepted steps (ms).
pub const REFRACTORY_PERIOD_MS: u64 = 300;

/// Session-scoped step detector.
#[derive(Debug, Clone, Default)]
pub struct StepDetector {
    last_step_ms: Option<u64>,
}

impl StepDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one sample, returning a `StepEvent` when a step is accepted.
    ///
    /// The sample timestamp is the detection time. Samples older than the
    /// last accepted step never produce a step.
    pub fn on_sample(&mut self, sample: &AccelerationSample) -> Option<StepEvent> {
        if sample.magnitude() <= STEP_THRESHOLD {
            return None;
        }

        let now = sample.timestamp_ms;
        if let Some(last) = self.last_step_ms {
            if now.saturating_sub(last) <= REFRACTORY_PERIOD_MS {
                return None;
            }
        }

        self.last_step_ms = Some(now);
        Some(StepEvent { timestamp_ms: now })
    }

    /// Process a batch of samples and return all detected steps.
    pub fn process_batch(&mut self, samples: &[AccelerationSample]) -> Vec<StepEvent> {
        samples.iter().filter_map(|s| self.on_sample(s)).collect()
    }
}
