// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key-value store wrapper with typed JSON helpers.
//!
//! Values are opaque strings keyed by name. Backends:
//! - File: one file per key under a data directory
//! - Memory: a concurrent map, for tests and ephemeral runs
//! - Offline: every operation fails

use crate::error::AppError;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Key-value store client.
#[derive(Clone)]
pub struct KvStore {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    File(PathBuf),
    Memory(Arc<DashMap<String, String>>),
    Offline,
}

impl KvStore {
    /// Open a file-backed store rooted at `dir`, creating the directory.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::Storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        tracing::info!(path = %dir.display(), "Opened file store");

        Ok(Self {
            backend: Backend::File(dir),
        })
    }

    /// Create an in-memory store.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(DashMap::new())),
        }
    }

    /// Create a store whose every operation fails (offline mode).
    pub fn offline() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    /// Read the raw value stored under `key`.
    pub async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        match &self.backend {
            Backend::File(dir) => {
                let path = dir.join(file_name_for_key(key));
                match tokio::fs::read_to_string(&path).await {
                    Ok(value) => Ok(Some(value)),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(AppError::Storage(format!("Failed to read {}: {}", key, e))),
                }
            }
            Backend::Memory(map) => Ok(map.get(key).map(|v| v.value().clone())),
            Backend::Offline => Err(offline_error()),
        }
    }

    /// Replace the value stored under `key`.
    ///
    /// File writes go through a temporary sibling and a rename, so readers
    /// see either the old or the new value.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        match &self.backend {
            Backend::File(dir) => {
                let path = dir.join(file_name_for_key(key));
                let tmp = path.with_extension("json.tmp");
                tokio::fs::write(&tmp, value)
                    .await
                    .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", key, e)))?;
                tokio::fs::rename(&tmp, &path)
                    .await
                    .map_err(|e| AppError::Storage(format!("Failed to commit {}: {}", key, e)))?;
                Ok(())
            }
            Backend::Memory(map) => {
                map.insert(key.to_string(), value.to_string());
                Ok(())
            }
            Backend::Offline => Err(offline_error()),
        }
    }

    /// Read and deserialize a JSON value.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serialize and store a JSON value.
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw).await
    }
}

fn offline_error() -> AppError {
    AppError::Storage("Store not available (offline mode)".to_string())
}

/// Map a key such as `@fitness_stats` to a safe file name (`fitness_stats.json`).
fn file_name_for_key(key: &str) -> String {
    let stem: String = key
        .trim_start_matches('@')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        "_.json".to_string()
    } else {
        format!("{}.json", stem)
    }
}
