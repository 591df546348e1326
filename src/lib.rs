// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Endorphin: step tracking and activity history
//!
//! This crate provides the backend for a fitness tracker: step detection
//! from accelerometer samples, tracking-session lifecycle, local activity
//! history with day/week/month averages, and a music playback companion.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::KvStore;
use services::{ActivityHistory, PlaybackClient, PlaybackService, SensorHub, SessionHandle};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub history: ActivityHistory,
    pub sensors: SensorHub,
    pub session: SessionHandle,
    pub playback: PlaybackService,
}

impl AppState {
    /// Wire services over `store` and spawn the session task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: Config, store: KvStore) -> Self {
        let history = ActivityHistory::new(store.clone());
        let sensors = SensorHub::new(config.sensor_buffer);
        let session = SessionHandle::spawn(sensors.clone(), history.clone());
        let playback =
            PlaybackService::new(PlaybackClient::new(config.playback_api_url.clone()), store);

        Self {
            config,
            history,
            sensors,
            session,
            playback,
        }
    }
}
