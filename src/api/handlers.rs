//! API Handlers
//!
//! Shared application state and HTTP request handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    Json,
};
use chrono::{Duration, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::cache::DiskCacheStore;
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Disk cache shared by all requests
    pub store: Arc<DiskCacheStore>,
    /// How long a captured response stays fresh
    pub ttl: Duration,
}

impl AppState {
    /// Creates a new AppState with the given store and TTL.
    pub fn new(store: DiskCacheStore, ttl: Duration) -> Self {
        Self {
            store: Arc::new(store),
            ttl,
        }
    }

    /// Opens the disk cache described by the Config.
    ///
    /// # Errors
    /// `CacheError::Configuration` when the grace period or TTL does not fit
    /// in a `Duration`, or the store cannot be opened.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = match config.grace_period {
            Some(secs) => DiskCacheStore::with_grace_period(
                &config.cache_dir,
                seconds("CACHE_GRACE_PERIOD_SECS", secs)?,
            )?,
            None => DiskCacheStore::new(&config.cache_dir)?,
        };
        Ok(Self::new(store, seconds("CACHE_TTL_SECS", config.cache_ttl)?))
    }

    /// Runs a store operation on the blocking pool.
    ///
    /// Store operations take the store lock and touch the disk, so they are
    /// kept off the async workers.
    pub async fn with_store<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&DiskCacheStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        match tokio::task::spawn_blocking(move || op(&store)).await {
            Ok(result) => result,
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        }
    }
}

fn seconds(name: &str, secs: u64) -> Result<Duration> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| CacheError::Configuration(format!("{} out of range: {}", name, secs)))
}

/// Query parameters for DELETE /cache
#[derive(Debug, Deserialize)]
pub struct InvalidateParams {
    /// Path and query of the cached response, e.g. `/cached?page=2`
    pub path: String,
}

/// Handler for GET /cached
///
/// Demo response that changes on every generation, so cache hits are visible.
pub async fn cached_text_handler() -> (HeaderMap, String) {
    generated_text("world")
}

/// Handler for GET /cached/:name
pub async fn cached_name_handler(Path(name): Path<String>) -> (HeaderMap, String) {
    generated_text(&name)
}

fn generated_text(name: &str) -> (HeaderMap, String) {
    let generated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true);

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&generated_at) {
        headers.insert("x-generated-at", value);
    }

    (headers, format!("hello {}, generated at {}", name, generated_at))
}

/// Handler for DELETE /cache
///
/// Removes the cached response for a path. Removing an uncached path succeeds.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Query(params): Query<InvalidateParams>,
) -> Result<StatusCode> {
    let key = params.path.clone();
    state.with_store(move |store| store.remove(&key)).await?;

    info!("Invalidated cached response for {}", params.path);
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
