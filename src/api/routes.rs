//! API Routes
//!
//! Configures the Axum router, with the response cache on the demo routes only.

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{
    cached_name_handler, cached_text_handler, health_handler, invalidate_handler, AppState,
};
use super::middleware::response_cache;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /cached` - Cached demo response
/// - `GET /cached/:name` - Cached demo response per name
/// - `DELETE /cache?path=...` - Invalidate a cached response
/// - `GET /health` - Health check endpoint, never cached
///
/// # Middleware
/// - Response cache: only wraps the `/cached` routes
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cached = Router::new()
        .route("/cached", get(cached_text_handler))
        .route("/cached/:name", get(cached_name_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), response_cache));

    Router::new()
        .merge(cached)
        .route("/cache", delete(invalidate_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
