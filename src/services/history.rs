// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity history service.
//!
//! Handles:
//! 1. Appending a stopped session to the newest-first activity list
//! 2. Overwriting the recent-session stats
//! 3. Loading the dashboard (recent stats, recent activities, averages)

use chrono::{DateTime, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::{keys, KvStore};
use crate::error::Result;
use crate::models::{ActivityRecord, AverageStats, RecentStats};
use crate::services::aggregator::{compute_averages, recent_window};
use crate::time_utils::format_utc_rfc3339;

/// Everything the dashboard shows, derived from one load.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Dashboard {
    pub recent: RecentStats,
    /// Most recent activities, newest first
    pub activities: Vec<ActivityRecord>,
    /// Averages over `activities`
    pub averages: AverageStats,
    pub loaded_at: String,
}

/// Reads and writes activity history in the key-value store.
#[derive(Clone)]
pub struct ActivityHistory {
    store: KvStore,
}

impl ActivityHistory {
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    /// All stored activities, newest first.
    pub async fn load_activities(&self) -> Result<Vec<ActivityRecord>> {
        Ok(self
            .store
            .get_json::<Vec<ActivityRecord>>(keys::ACTIVITIES)
            .await?
            .unwrap_or_default())
    }

    /// Stats of the last stopped session, if any session was ever stopped.
    pub async fn load_recent_stats(&self) -> Result<Option<RecentStats>> {
        self.store.get_json(keys::STATS).await
    }

    /// Persist a stopped session.
    ///
    /// The record is prepended to the activity list, then the recent stats
    /// are replaced wholesale. The two writes are not atomic: if the stats
    /// write fails, the list already holds the record and `@fitness_stats`
    /// still describes the previous session.
    pub async fn record_session(&self, record: &ActivityRecord) -> Result<()> {
        let mut activities = self.load_activities().await?;
        activities.insert(0, record.clone());

        self.store.set_json(keys::ACTIVITIES, &activities).await?;
        self.store
            .set_json(keys::STATS, &RecentStats::from_record(record))
            .await?;

        tracing::info!(
            steps = record.steps,
            duration = record.duration,
            total_activities = activities.len(),
            "Activity recorded"
        );
        Ok(())
    }

    /// Load the dashboard view.
    ///
    /// Storage failures degrade to zeroed stats and an empty history.
    pub async fn dashboard(&self, now: DateTime<Utc>) -> Dashboard {
        let (stats, activities) =
            futures_util::future::join(self.load_recent_stats(), self.load_activities()).await;

        let recent = match stats {
            Ok(stats) => stats.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, key = keys::STATS, "Failed to load recent stats");
                RecentStats::default()
            }
        };

        let activities = match activities {
            Ok(all) => recent_window(&all).to_vec(),
            Err(e) => {
                tracing::warn!(error = %e, key = keys::ACTIVITIES, "Failed to load activities");
                Vec::new()
            }
        };

        let averages = compute_averages(&activities, now);

        Dashboard {
            recent,
            activities,
            averages,
            loaded_at: format_utc_rfc3339(now),
        }
    }
}
