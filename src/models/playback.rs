// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Remote music playback state ("currently playing").

use serde::{Deserialize, Serialize};

/// Response body of `GET /me/player/currently-playing`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub progress_ms: Option<u64>,
    /// Null for ads and unsupported content types
    pub item: Option<Track>,
}

/// A playing track, also cached under `@current_track`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub album: Option<Album>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub images: Vec<AlbumImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumImage {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Player status from the last successful poll, cached under `@player_state`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub progress_ms: Option<u64>,
}

impl PlayerState {
    /// Nothing is playing (HTTP 204).
    pub fn idle() -> Self {
        Self::default()
    }
}

impl From<&CurrentlyPlaying> for PlayerState {
    fn from(playing: &CurrentlyPlaying) -> Self {
        Self {
            is_playing: playing.is_playing,
            progress_ms: playing.progress_ms,
        }
    }
}

/// Body of `GET /api/playback`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub is_playing: bool,
    pub progress_ms: Option<u64>,
    pub track: Option<Track>,
    pub cover_url: Option<String>,
}

impl NowPlaying {
    pub fn new(state: PlayerState, track: Option<Track>) -> Self {
        let cover_url = track.as_ref().and_then(|t| t.cover_url()).map(str::to_string);
        Self {
            is_playing: state.is_playing,
            progress_ms: state.progress_ms,
            track,
            cover_url,
        }
    }
}

impl Track {
    /// Artist names joined for display ("A, B").
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// First (largest) album cover, if any.
    pub fn cover_url(&self) -> Option<&str> {
        self.album
            .as_ref()
            .and_then(|a| a.images.first())
            .map(|i| i.url.as_str())
    }
}
