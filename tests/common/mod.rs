// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use endorphin_tracker::config::Config;
use endorphin_tracker::db::KvStore;
use endorphin_tracker::routes::create_router;
use endorphin_tracker::AppState;
use std::sync::Arc;

/// Create a test app over an in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_store(KvStore::in_memory())
}

/// Create a test app over the given store.
#[allow(dead_code)]
pub fn create_test_app_with_store(store: KvStore) -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default(), store)
}

/// Create a test app with a custom config.
#[allow(dead_code)]
pub fn create_test_app_with_config(
    config: Config,
    store: KvStore,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, store));
    (create_router(state.clone()), state)
}

/// Build a request with an optional JSON body.
#[allow(dead_code)]
pub fn request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Unique scratch directory for file store tests.
#[allow(dead_code)]
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "endorphin-{}-{}-{}",
        name,
        std::process::id(),
        nanos
    ))
}
