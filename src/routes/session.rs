// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tracking session control and sensor ingestion.

use crate::error::{AppError, Result};
use crate::models::{AccelerationSample, LocationFix};
use crate::services::sensors::{Delivery, SensorEvent};
use crate::services::{SessionSnapshot, StopOutcome};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Upper bound on samples per upload (about 100 s at 10 Hz).
const MAX_SAMPLES_PER_BATCH: usize = 1000;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session", get(get_session))
        .route("/api/session/start", post(start_session))
        .route("/api/session/pause", post(pause_session))
        .route("/api/session/resume", post(resume_session))
        .route("/api/session/stop", post(stop_session))
        .route("/api/session/samples", post(post_samples))
        .route("/api/session/location", post(post_location))
}

async fn get_session(State(state): State<Arc<AppState>>) -> Result<Json<SessionSnapshot>> {
    Ok(Json(state.session.snapshot().await?))
}

async fn start_session(State(state): State<Arc<AppState>>) -> Result<Json<SessionSnapshot>> {
    Ok(Json(state.session.start().await?))
}

async fn pause_session(State(state): State<Arc<AppState>>) -> Result<Json<SessionSnapshot>> {
    Ok(Json(state.session.pause().await?))
}

async fn resume_session(State(state): State<Arc<AppState>>) -> Result<Json<SessionSnapshot>> {
    Ok(Json(state.session.resume().await?))
}

async fn stop_session(State(state): State<Arc<AppState>>) -> Result<Json<StopOutcome>> {
    Ok(Json(state.session.stop().await?))
}

// ─── Sensor Ingestion ────────────────────────────────────────

#[derive(Deserialize)]
struct SamplesRequest {
    samples: Vec<AccelerationSample>,
}

/// How many readings reached the active session.
#[derive(Serialize)]
struct IngestResponse {
    accepted: usize,
}

/// Forward a batch of accelerometer samples to the active session.
async fn post_samples(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SamplesRequest>,
) -> Result<Json<IngestResponse>> {
    if body.samples.len() > MAX_SAMPLES_PER_BATCH {
        return Err(AppError::BadRequest(format!(
            "at most {} samples per request",
            MAX_SAMPLES_PER_BATCH
        )));
    }
    if body
        .samples
        .iter()
        .any(|s| !(s.x.is_finite() && s.y.is_finite() && s.z.is_finite()))
    {
        return Err(AppError::BadRequest(
            "sample components must be finite".to_string(),
        ));
    }

    let accepted = body
        .samples
        .into_iter()
        .map(|s| state.sensors.publish(SensorEvent::Acceleration(s)))
        .filter(|d| *d == Delivery::Delivered)
        .count();

    Ok(Json(IngestResponse { accepted }))
}

/// Forward a location fix to the active session.
async fn post_location(
    State(state): State<Arc<AppState>>,
    Json(fix): Json<LocationFix>,
) -> Result<Json<IngestResponse>> {
    fix.validate().map_err(AppError::BadRequest)?;

    let accepted = match state.sensors.publish(SensorEvent::Location(fix)) {
        Delivery::Delivered => 1,
        _ => 0,
    };
    Ok(Json(IngestResponse { accepted }))
}
