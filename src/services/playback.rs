// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote music playback integration.
//!
//! Handles:
//! - "Currently playing" lookups with a bearer token
//! - Play/pause and skip controls
//! - Periodic polling that caches the playing track and player status

use serde::Deserialize;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::db::{keys, KvStore};
use crate::error::AppError;
use crate::models::{CurrentlyPlaying, NowPlaying, PlayerState, Track};

/// Playback API client.
#[derive(Clone)]
pub struct PlaybackClient {
    http: reqwest::Client,
    base_url: String,
}

impl PlaybackClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the playing item. `None` when nothing is playing (HTTP 204).
    pub async fn currently_playing(
        &self,
        access_token: &str,
    ) -> Result<Option<CurrentlyPlaying>, AppError> {
        let url = format!("{}/me/player/currently-playing", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::PlaybackApi(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }

        self.check_response_json(response).await.map(Some)
    }

    pub async fn play(&self, access_token: &str) -> Result<(), AppError> {
        self.send(reqwest::Method::PUT, "play", access_token).await
    }

    pub async fn pause(&self, access_token: &str) -> Result<(), AppError> {
        self.send(reqwest::Method::PUT, "pause", access_token).await
    }

    pub async fn next(&self, access_token: &str) -> Result<(), AppError> {
        self.send(reqwest::Method::POST, "next", access_token).await
    }

    pub async fn previous(&self, access_token: &str) -> Result<(), AppError> {
        self.send(reqwest::Method::POST, "previous", access_token).await
    }

    async fn send(
        &self,
        method: reqwest::Method,
        action: &str,
        access_token: &str,
    ) -> Result<(), AppError> {
        let url = format!("{}/me/player/{}", self.base_url, action);

        let response = self
            .http
            .request(method, &url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::PlaybackApi(e.to_string()))?;

        self.check_response(response).await
    }

    /// Check response status, converting errors to `AppError`.
    async fn check_response(&self, response: reqwest::Response) -> Result<(), AppError> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(status_error(response).await)
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AppError::PlaybackApi(format!("JSON parse error: {}", e)))
    }
}

async fn status_error(response: reqwest::Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return AppError::PlaybackApi(AppError::PLAYBACK_TOKEN_ERROR.to_string());
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        tracing::warn!("Playback API rate limit hit (429)");
    }

    AppError::PlaybackApi(format!("HTTP {}: {}", status, body))
}

/// Player controls exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Play,
    Pause,
    Next,
    Previous,
}

impl PlayerAction {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "play" => Some(Self::Play),
            "pause" => Some(Self::Pause),
            "next" => Some(Self::Next),
            "previous" => Some(Self::Previous),
            _ => None,
        }
    }
}

/// Playback state backed by the key-value store.
#[derive(Clone)]
pub struct PlaybackService {
    client: PlaybackClient,
    store: KvStore,
}

impl PlaybackService {
    pub fn new(client: PlaybackClient, store: KvStore) -> Self {
        Self { client, store }
    }

    /// Store the bearer token obtained by the client's OAuth flow.
    pub async fn set_token(&self, token: &str) -> Result<(), AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::BadRequest("Token must not be empty".to_string()));
        }
        self.store.set(keys::PLAYBACK_TOKEN, token).await
    }

    pub async fn token(&self) -> Result<Option<String>, AppError> {
        self.store.get(keys::PLAYBACK_TOKEN).await
    }

    /// Last cached track. A cached `null` means nothing was playing.
    pub async fn cached_track(&self) -> Result<Option<Track>, AppError> {
        Ok(self
            .store
            .get_json::<Option<Track>>(keys::CURRENT_TRACK)
            .await?
            .flatten())
    }

    /// Last polled player status; idle when never polled.
    pub async fn player_state(&self) -> Result<PlayerState, AppError> {
        Ok(self
            .store
            .get_json::<PlayerState>(keys::PLAYER_STATE)
            .await?
            .unwrap_or_default())
    }

    /// Cached track and player status together.
    pub async fn now_playing(&self) -> Result<NowPlaying, AppError> {
        let (track, state) =
            futures_util::future::join(self.cached_track(), self.player_state()).await;
        Ok(NowPlaying::new(state?, track?))
    }

    /// Fetch the playing track and cache it with the player status. Does
    /// nothing without a token.
    ///
    /// When nothing is playing (HTTP 204) only the status is updated; the
    /// last cached track is kept.
    pub async fn refresh(&self) -> Result<Option<CurrentlyPlaying>, AppError> {
        let Some(token) = self.token().await? else {
            return Ok(None);
        };

        let playing = self.client.currently_playing(&token).await?;
        match &playing {
            Some(current) => {
                self.store.set_json(keys::CURRENT_TRACK, &current.item).await?;
                self.store
                    .set_json(keys::PLAYER_STATE, &PlayerState::from(current))
                    .await?;
                if let Some(track) = &current.item {
                    tracing::debug!(
                        track = %track.name,
                        artists = %track.artist_names(),
                        is_playing = current.is_playing,
                        "Now playing"
                    );
                }
            }
            None => {
                self.store
                    .set_json(keys::PLAYER_STATE, &PlayerState::idle())
                    .await?;
            }
        }
        Ok(playing)
    }

    /// Run a player control with the stored token.
    pub async fn control(&self, action: PlayerAction) -> Result<(), AppError> {
        let token = self
            .token()
            .await?
            .ok_or_else(|| AppError::NotFound("No playback token stored".to_string()))?;

        match action {
            PlayerAction::Play => self.client.play(&token).await,
            PlayerAction::Pause => self.client.pause(&token).await,
            PlayerAction::Next => self.client.next(&token).await,
            PlayerAction::Previous => self.client.previous(&token).await,
        }
    }

    /// Poll `refresh` every `interval`. Failures are logged and polling
    /// continues.
    pub fn spawn_poller(self, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if let Err(e) = self.refresh().await {
                    if e.is_playback_token_error() {
                        tracing::warn!("Playback token rejected; waiting for a new one");
                    } else {
                        tracing::warn!(error = %e, "Failed to fetch current track");
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_service(store: KvStore) -> PlaybackService {
        // Port 9 (discard) is never listening in tests
        PlaybackService::new(PlaybackClient::new("http://127.0.0.1:9"), store)
    }

    #[test]
    fn test_parse_player_action() {
        assert_eq!(PlayerAction::parse("play"), Some(PlayerAction::Play));
        assert_eq!(PlayerAction::parse("previous"), Some(PlayerAction::Previous));
        assert_eq!(PlayerAction::parse("shuffle"), None);
    }

    #[tokio::test]
    async fn test_refresh_without_token_is_noop() {
        let store = KvStore::in_memory();
        let service = offline_service(store.clone());

        assert!(service.refresh().await.unwrap().is_none());
        assert!(store.get(keys::CURRENT_TRACK).await.unwrap().is_none());
        assert!(store.get(keys::PLAYER_STATE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_control_without_token() {
        let service = offline_service(KvStore::in_memory());
        assert!(matches!(
            service.control(PlayerAction::Play).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_set_token() {
        let service = offline_service(KvStore::in_memory());
        assert!(matches!(
            service.set_token("   ").await,
            Err(AppError::BadRequest(_))
        ));

        service.set_token(" abc123\n").await.unwrap();
        assert_eq!(service.token().await.unwrap().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_playback_error() {
        let store = KvStore::in_memory();
        let service = offline_service(store);
        service.set_token("abc").await.unwrap();

        assert!(matches!(
            service.refresh().await,
            Err(AppError::PlaybackApi(_))
        ));
    }

    #[tokio::test]
    async fn test_cached_track() {
        let store = KvStore::in_memory();
        store
            .set(keys::CURRENT_TRACK, r#"{"name":"Song","artists":[{"name":"X"}]}"#)
            .await
            .unwrap();

        let track = offline_service(store).cached_track().await.unwrap().unwrap();
        assert_eq!(track.name, "Song");
        assert_eq!(track.artist_names(), "X");
    }

    #[tokio::test]
    async fn test_now_playing_defaults_to_idle() {
        let store = KvStore::in_memory();
        let service = offline_service(store.clone());

        let now = service.now_playing().await.unwrap();
        assert!(!now.is_playing);
        assert!(now.track.is_none());

        store
            .set(keys::PLAYER_STATE, r#"{"isPlaying":true,"progressMs":5000}"#)
            .await
            .unwrap();
        let now = service.now_playing().await.unwrap();
        assert!(now.is_playing);
        assert_eq!(now.progress_ms, Some(5000));
    }
}
