// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tracking session lifecycle.
//!
//! `Session` is the state machine: Idle -> Tracking <-> Paused -> Stopped.
//! Stopped is terminal; a new session is a new `Session`.
//!
//! `SessionHandle` talks to a single actor task that owns the current
//! session. Commands, sensor readings and the one-second elapsed-time tick
//! are all processed on that task, one at a time.

use chrono::{DateTime, Utc};
use geo::{Coord, LineString};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::models::{AccelerationSample, ActivityRecord, GeoPoint, LocationFix, StepEvent};
use crate::services::history::ActivityHistory;
use crate::services::metrics::{cadence_spm, calories_burned, distance_km};
use crate::services::sensors::{SensorEvent, SensorHub, SensorSubscription};
use crate::services::step_detector::StepDetector;
use crate::time_utils::format_elapsed;

/// Elapsed-time accrual granularity.
const TICK: Duration = Duration::from_secs(1);

/// Pending commands before callers start waiting.
const COMMAND_BUFFER: usize = 32;

/// Google polyline precision used for the session path.
const PATH_PRECISION: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum SessionState {
    Idle,
    Tracking,
    Paused,
    Stopped,
}

/// Read-only view of a session for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionSnapshot {
    pub state: SessionState,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub steps: u64,
    pub distance_km: f64,
    pub calories: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub elapsed_seconds: u64,
    /// `HH:MM:SS`
    pub elapsed: String,
    /// Steps per minute
    pub cadence: f64,
    pub last_location: Option<GeoPoint>,
    /// Encoded polyline of the location path
    pub path_polyline: Option<String>,
}

/// A single tracking session.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    detector: StepDetector,
    steps: u64,
    elapsed_secs: u64,
    last_fix: Option<LocationFix>,
    path: Vec<GeoPoint>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            detector: StepDetector::new(),
            steps: 0,
            elapsed_secs: 0,
            last_fix: None,
            path: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Idle -> Tracking. Counters start from zero.
    pub fn start(&mut self) -> Result<()> {
        self.transition("start", &[SessionState::Idle], SessionState::Tracking)?;
        self.detector = StepDetector::new();
        self.steps = 0;
        self.elapsed_secs = 0;
        self.last_fix = None;
        self.path.clear();
        Ok(())
    }

    /// Tracking -> Paused.
    pub fn pause(&mut self) -> Result<()> {
        self.transition("pause", &[SessionState::Tracking], SessionState::Paused)
    }

    /// Paused -> Tracking.
    pub fn resume(&mut self) -> Result<()> {
        self.transition("resume", &[SessionState::Paused], SessionState::Tracking)
    }

    /// Tracking/Paused -> Stopped, producing the session's activity record.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Result<ActivityRecord> {
        self.transition(
            "stop",
            &[SessionState::Tracking, SessionState::Paused],
            SessionState::Stopped,
        )?;

        Ok(ActivityRecord {
            date: now,
            duration: self.elapsed_secs,
            steps: self.steps,
            distance: distance_km(self.steps),
            calories: calories_burned(self.steps),
            end_location: self.last_fix.map(|f| f.point()),
        })
    }

    /// Feed one acceleration sample. Ignored unless tracking.
    pub fn on_sample(&mut self, sample: &AccelerationSample) -> Option<StepEvent> {
        if self.state != SessionState::Tracking {
            return None;
        }

        let step = self.detector.on_sample(sample)?;
        self.steps += 1;
        tracing::debug!(steps = self.steps, timestamp_ms = step.timestamp_ms, "Step");
        Some(step)
    }

    /// Record a location fix. Kept while paused so the end location stays
    /// current; ignored when idle or stopped.
    pub fn on_location(&mut self, fix: &LocationFix) {
        if !matches!(self.state, SessionState::Tracking | SessionState::Paused) {
            return;
        }
        self.last_fix = Some(*fix);
        self.path.push(fix.point());
    }

    /// Accrue one second of elapsed time if tracking.
    pub fn tick(&mut self) {
        if self.state == SessionState::Tracking {
            self.elapsed_secs += 1;
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            steps: self.steps,
            distance_km: distance_km(self.steps),
            calories: calories_burned(self.steps),
            elapsed_seconds: self.elapsed_secs,
            elapsed: format_elapsed(self.elapsed_secs),
            cadence: cadence_spm(self.steps, self.elapsed_secs),
            last_location: self.last_fix.map(|f| f.point()),
            path_polyline: encode_path(&self.path),
        }
    }

    fn transition(
        &mut self,
        action: &str,
        from: &[SessionState],
        to: SessionState,
    ) -> Result<()> {
        if !from.contains(&self.state) {
            return Err(AppError::InvalidTransition(format!(
                "cannot {} a session that is {:?}",
                action, self.state
            )));
        }
        tracing::info!(from = ?self.state, to = ?to, "Session transition");
        self.state = to;
        Ok(())
    }
}

/// Encode the path as a Google polyline (x = longitude, y = latitude).
fn encode_path(path: &[GeoPoint]) -> Option<String> {
    if path.is_empty() {
        return None;
    }

    let line: LineString<f64> = path
        .iter()
        .map(|p| Coord {
            x: p.longitude,
            y: p.latitude,
        })
        .collect();

    match polyline::encode_coordinates(line, PATH_PRECISION) {
        Ok(encoded) => Some(encoded),
        Err(e) => {
            tracing::warn!(error = %e, points = path.len(), "Failed to encode session path");
            None
        }
    }
}

// ─── Actor ───────────────────────────────────────────────────────────────────

/// Result of stopping a session.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StopOutcome {
    pub activity: ActivityRecord,
    /// False when the history write failed; the session is stopped anyway.
    pub persisted: bool,
}

enum SessionCommand {
    Start(oneshot::Sender<Result<SessionSnapshot>>),
    Pause(oneshot::Sender<Result<SessionSnapshot>>),
    Resume(oneshot::Sender<Result<SessionSnapshot>>),
    Stop(oneshot::Sender<Result<StopOutcome>>),
    Snapshot(oneshot::Sender<SessionSnapshot>),
}

/// Cloneable handle to the session actor.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Spawn the session actor on the current tokio runtime.
    pub fn spawn(sensors: SensorHub, history: ActivityHistory) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let actor = SessionActor {
            rx,
            sensors,
            history,
            session: None,
            subscription: None,
        };
        tokio::spawn(actor.run());
        Self { tx }
    }

    pub async fn start(&self) -> Result<SessionSnapshot> {
        self.request(SessionCommand::Start).await?
    }

    pub async fn pause(&self) -> Result<SessionSnapshot> {
        self.request(SessionCommand::Pause).await?
    }

    pub async fn resume(&self) -> Result<SessionSnapshot> {
        self.request(SessionCommand::Resume).await?
    }

    pub async fn stop(&self) -> Result<StopOutcome> {
        self.request(SessionCommand::Stop).await?
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        self.request(SessionCommand::Snapshot).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(command(reply_tx))
            .await
            .map_err(|_| actor_gone())?;
        reply_rx.await.map_err(|_| actor_gone())
    }
}

fn actor_gone() -> AppError {
    AppError::Internal(anyhow::anyhow!("Session task is not running"))
}

struct SessionActor {
    rx: mpsc::Receiver<SessionCommand>,
    sensors: SensorHub,
    history: ActivityHistory,
    session: Option<Session>,
    subscription: Option<SensorSubscription>,
}

impl SessionActor {
    async fn run(mut self) {
        let mut ticker = tokio::time::interval_at(Instant::now() + TICK, TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                command = self.rx.recv() => match command {
                    Some(command) => {
                        if self.handle(command).await {
                            // Time accrues in whole seconds from the moment
                            // tracking (re)starts
                            ticker.reset();
                        }
                    }
                    None => break,
                },
                event = next_event(&mut self.subscription) => match event {
                    Some(event) => self.on_event(event),
                    None => self.subscription = None,
                },
                _ = ticker.tick() => {
                    if let Some(session) = self.session.as_mut() {
                        session.tick();
                    }
                }
            }
        }

        tracing::debug!("Session task exiting");
    }

    /// Run one command. Returns true when tracking (re)started.
    async fn handle(&mut self, command: SessionCommand) -> bool {
        // Readings published before the command take effect first
        self.drain_events();

        match command {
            SessionCommand::Start(reply) => {
                let result = self.start();
                let started = result.is_ok();
                let _ = reply.send(result);
                started
            }
            SessionCommand::Pause(reply) => {
                let _ = reply.send(self.with_session(Session::pause));
                false
            }
            SessionCommand::Resume(reply) => {
                let result = self.with_session(Session::resume);
                let resumed = result.is_ok();
                let _ = reply.send(result);
                resumed
            }
            SessionCommand::Stop(reply) => {
                let _ = reply.send(self.stop().await);
                false
            }
            SessionCommand::Snapshot(reply) => {
                let snapshot = match &self.session {
                    Some(session) => session.snapshot(),
                    None => Session::new().snapshot(),
                };
                let _ = reply.send(snapshot);
                false
            }
        }
    }

    fn start(&mut self) -> Result<SessionSnapshot> {
        if let Some(current) = &self.session {
            if matches!(current.state(), SessionState::Tracking | SessionState::Paused) {
                return Err(AppError::InvalidTransition(format!(
                    "a session is already {:?}",
                    current.state()
                )));
            }
        }

        let mut session = Session::new();
        session.start()?;
        self.subscription = Some(self.sensors.subscribe());
        let snapshot = session.snapshot();
        self.session = Some(session);
        Ok(snapshot)
    }

    fn with_session(&mut self, op: fn(&mut Session) -> Result<()>) -> Result<SessionSnapshot> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| AppError::InvalidTransition("no session has been started".to_string()))?;
        op(session)?;
        Ok(session.snapshot())
    }

    async fn stop(&mut self) -> Result<StopOutcome> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| AppError::InvalidTransition("no session has been started".to_string()))?;
        let activity = session.stop(Utc::now())?;

        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }

        let persisted = match self.history.record_session(&activity).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, steps = activity.steps, "Failed to save activity");
                false
            }
        };

        Ok(StopOutcome {
            activity,
            persisted,
        })
    }

    fn drain_events(&mut self) {
        while let Some(event) = self.subscription.as_mut().and_then(|s| s.try_recv()) {
            self.on_event(event);
        }
    }

    fn on_event(&mut self, event: SensorEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match event {
            SensorEvent::Acceleration(sample) => {
                session.on_sample(&sample);
            }
            SensorEvent::Location(fix) => session.on_location(&fix),
        }
    }
}

async fn next_event(subscription: &mut Option<SensorSubscription>) -> Option<SensorEvent> {
    match subscription {
        Some(subscription) => subscription.recv().await,
        None => std::future::pending().await,
    }
}
