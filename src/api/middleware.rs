//! Response Cache Middleware
//!
//! Serves GET requests from the disk cache and stores freshly generated
//! responses. Cache failures never fail the request: lookup errors count as
//! misses and write errors are logged.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::{debug, warn};

use super::handlers::AppState;
use crate::cache::CachedResponse;

/// Cache key for a request: its path plus query string.
pub fn cache_key(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Middleware putting the disk cache in front of the wrapped routes.
pub async fn response_cache(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = cache_key(request.uri());

    let lookup_key = key.clone();
    match state.with_store(move |store| store.get(&lookup_key)).await {
        Ok(Some(cached)) => {
            debug!("Serving {} from cache", key);
            return cached.into_response();
        }
        Ok(None) => {}
        Err(err) => warn!("Cache lookup for {} failed, treating as miss: {}", key, err),
    }

    let response = next.run(request).await;
    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("Failed to buffer response body for {}: {}", key, err);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Some(expires_at) = Utc::now().checked_add_signed(state.ttl) else {
        warn!("TTL overflows the expiration time, not caching {}", key);
        return Response::from_parts(parts, Body::from(bytes));
    };

    let cached = CachedResponse::from_parts(&parts, &bytes);
    let store_key = key.clone();
    if let Err(err) = state
        .with_store(move |store| store.set(&store_key, &cached, expires_at))
        .await
    {
        warn!("Failed to cache response for {}: {}", key, err);
    }

    Response::from_parts(parts, Body::from(bytes))
}
