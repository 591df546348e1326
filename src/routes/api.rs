// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard and activity history routes.

use crate::error::{AppError, Result};
use crate::models::ActivityRecord;
use crate::services::Dashboard;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const MAX_ACTIVITIES_LIMIT: usize = 500;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/activities", get(get_activities))
}

/// Recent stats, recent activities and averages. Never fails; storage
/// problems show up as zeroed stats.
async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<Dashboard> {
    Json(state.history.dashboard(chrono::Utc::now()).await)
}

#[derive(Deserialize)]
struct ActivitiesQuery {
    limit: Option<usize>,
}

/// Stored activities, newest first.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<Vec<ActivityRecord>>> {
    let limit = params.limit.unwrap_or(MAX_ACTIVITIES_LIMIT);
    if limit == 0 || limit > MAX_ACTIVITIES_LIMIT {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_ACTIVITIES_LIMIT
        )));
    }

    let mut activities = state.history.load_activities().await?;
    activities.truncate(limit);
    Ok(Json(activities))
}
