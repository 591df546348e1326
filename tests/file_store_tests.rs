// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed key-value store tests.

use endorphin_tracker::db::{keys, KvStore};
use endorphin_tracker::services::ActivityHistory;

mod common;
use common::scratch_dir;

#[tokio::test]
async fn test_file_store_roundtrip() {
    let dir = scratch_dir("roundtrip");
    let store = KvStore::open(&dir).await.unwrap();

    assert!(store.get(keys::STATS).await.unwrap().is_none());

    store.set(keys::STATS, r#"{"steps":1}"#).await.unwrap();
    store.set(keys::STATS, r#"{"steps":2}"#).await.unwrap();
    assert_eq!(
        store.get(keys::STATS).await.unwrap().as_deref(),
        Some(r#"{"steps":2}"#)
    );
    assert!(dir.join("fitness_stats.json").exists());
    assert!(!dir.join("fitness_stats.json.tmp").exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_history_survives_reopen() {
    let dir = scratch_dir("reopen");

    {
        let history = ActivityHistory::new(KvStore::open(&dir).await.unwrap());
        let record = endorphin_tracker::models::ActivityRecord {
            date: chrono::Utc::now(),
            duration: 42,
            steps: 77,
            distance: 0.058674,
            calories: 3.08,
            end_location: None,
        };
        history.record_session(&record).await.unwrap();
    }

    let history = ActivityHistory::new(KvStore::open(&dir).await.unwrap());
    let activities = history.load_activities().await.unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].steps, 77);
    assert_eq!(history.load_recent_stats().await.unwrap().unwrap().steps, 77);

    std::fs::remove_dir_all(&dir).ok();
}
