// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Music playback companion routes.

use crate::error::{AppError, Result};
use crate::models::NowPlaying;
use crate::services::PlayerAction;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/playback", get(get_current_track))
        .route("/api/playback/token", put(put_token))
        .route("/api/playback/{action}", post(control))
}

/// Last cached track with the polled player status.
async fn get_current_track(State(state): State<Arc<AppState>>) -> Result<Json<NowPlaying>> {
    Ok(Json(state.playback.now_playing().await?))
}

#[derive(Deserialize)]
struct TokenRequest {
    access_token: String,
}

async fn put_token(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TokenRequest>,
) -> Result<StatusCode> {
    state.playback.set_token(&body.access_token).await?;
    tracing::info!("Playback token updated");
    Ok(StatusCode::NO_CONTENT)
}

async fn control(
    State(state): State<Arc<AppState>>,
    Path(action): Path<String>,
) -> Result<StatusCode> {
    let action = PlayerAction::parse(&action)
        .ok_or_else(|| AppError::NotFound(format!("Unknown player action: {}", action)))?;

    state.playback.control(action).await?;
    Ok(StatusCode::NO_CONTENT)
}
