//! Integration Tests for the Response Cache
//!
//! Tests the full request/response cycle through the caching middleware,
//! plus the store's documented behavior through the public API.

use std::fs;
use std::thread::sleep;
use std::time::Duration as StdDuration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{Duration, Utc};
use disk_response_cache::{
    api::create_router, cache::digest, AppState, CacheError, CachedResponse, DiskCacheStore,
};
use tempfile::TempDir;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app(ttl: Duration) -> (Router, AppState, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = DiskCacheStore::new(temp_dir.path()).unwrap();
    let state = AppState::new(store, ttl);
    (create_router(state.clone()), state, temp_dir)
}

async fn send(app: &Router, method: &str, uri: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn file_count(temp_dir: &TempDir) -> usize {
    fs::read_dir(temp_dir.path()).unwrap().count()
}

// == Caching Middleware Tests ==

#[tokio::test]
async fn test_second_request_served_from_cache() {
    let (app, _state, temp_dir) = create_test_app(Duration::minutes(5));

    let first = body_text(send(&app, "GET", "/cached").await).await;
    let second = body_text(send(&app, "GET", "/cached").await).await;

    assert!(first.starts_with("hello world"));
    assert_eq!(first, second, "Second response should be the cached one");
    assert!(temp_dir.path().join(digest("/cached")).is_file());
}

#[tokio::test]
async fn test_cached_response_replays_headers() {
    let (app, _state, _temp_dir) = create_test_app(Duration::minutes(5));

    let first = send(&app, "GET", "/cached/alice").await;
    let generated_at = first.headers().get("x-generated-at").unwrap().clone();
    let content_type = first.headers().get("content-type").unwrap().clone();

    let second = send(&app, "GET", "/cached/alice").await;

    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.headers().get("x-generated-at").unwrap(), &generated_at);
    assert_eq!(second.headers().get("content-type").unwrap(), &content_type);
}

#[tokio::test]
async fn test_distinct_paths_cached_separately() {
    let (app, _state, temp_dir) = create_test_app(Duration::minutes(5));

    let alice = body_text(send(&app, "GET", "/cached/alice").await).await;
    let bob = body_text(send(&app, "GET", "/cached/bob").await).await;
    let paged = body_text(send(&app, "GET", "/cached/alice?page=2").await).await;

    assert!(alice.starts_with("hello alice"));
    assert!(bob.starts_with("hello bob"));
    assert_ne!(alice, paged);
    assert_eq!(file_count(&temp_dir), 3);
}

#[tokio::test]
async fn test_invalidate_forces_regeneration() {
    let (app, _state, _temp_dir) = create_test_app(Duration::minutes(5));

    let first = body_text(send(&app, "GET", "/cached").await).await;

    let response = send(&app, "DELETE", "/cache?path=/cached").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let regenerated = body_text(send(&app, "GET", "/cached").await).await;
    assert_ne!(first, regenerated);
}

#[tokio::test]
async fn test_invalidate_uncached_path_is_ok() {
    let (app, _state, _temp_dir) = create_test_app(Duration::minutes(5));

    let response = send(&app, "DELETE", "/cache?path=/never-cached").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_non_get_requests_bypass_cache() {
    let (app, _state, temp_dir) = create_test_app(Duration::minutes(5));

    let response = send(&app, "POST", "/cached").await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(file_count(&temp_dir), 0);
}

#[tokio::test]
async fn test_zero_ttl_never_caches() {
    let (app, _state, temp_dir) = create_test_app(Duration::zero());

    let first = body_text(send(&app, "GET", "/cached").await).await;
    let second = body_text(send(&app, "GET", "/cached").await).await;

    assert_ne!(first, second);
    assert_eq!(file_count(&temp_dir), 0);
}

#[tokio::test]
async fn test_overflowing_ttl_skips_caching() {
    let (app, _state, temp_dir) = create_test_app(Duration::MAX);

    let first = send(&app, "GET", "/cached").await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_text(first).await;
    let second = body_text(send(&app, "GET", "/cached").await).await;

    assert!(first.starts_with("hello world"));
    assert_ne!(first, second);
    assert_eq!(file_count(&temp_dir), 0);
}

#[tokio::test]
async fn test_malformed_entry_treated_as_miss() {
    let (app, state, temp_dir) = create_test_app(Duration::minutes(5));
    let path = temp_dir.path().join(digest("/cached"));
    fs::write(&path, b"{ not a cache entry").unwrap();

    let response = send(&app, "GET", "/cached").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.starts_with("hello world"));
    // The store itself still reports the error, and the file is left alone
    assert!(matches!(
        state.store.get("/cached"),
        Err(CacheError::Deserialization { .. })
    ));
}

#[tokio::test]
async fn test_health_is_never_cached() {
    let (app, _state, temp_dir) = create_test_app(Duration::minutes(5));

    let response = send(&app, "GET", "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, r#"{"status":"healthy"}"#);
    assert_eq!(file_count(&temp_dir), 0);
}

// == Store Behavior Tests ==

#[test]
fn test_store_sweeps_on_unrelated_write() {
    let temp_dir = TempDir::new().unwrap();
    let store = DiskCacheStore::new(temp_dir.path()).unwrap();
    let response = CachedResponse::new(200, "text/plain", "short lived");

    store
        .set("/k1", &response, Utc::now() + Duration::milliseconds(10))
        .unwrap();
    sleep(StdDuration::from_millis(60));

    // Still on disk and still served before any write happens
    assert!(store.get("/k1").unwrap().is_some());

    store
        .set("/k2", &response, Utc::now() + Duration::minutes(5))
        .unwrap();

    assert!(store.get("/k1").unwrap().is_none());
    assert!(!temp_dir.path().join(digest("/k1")).exists());
    assert!(store.get("/k2").unwrap().is_some());
}

#[test]
fn test_store_rejects_relative_directory() {
    assert!(matches!(
        DiskCacheStore::new("cache"),
        Err(CacheError::Configuration(_))
    ));
}
