//! API Module
//!
//! HTTP layer that puts the disk cache in front of response-generating routes.
//!
//! # Endpoints
//! - `GET /cached` - Demo response, served through the cache
//! - `GET /cached/:name` - Demo response per name, served through the cache
//! - `DELETE /cache?path=...` - Invalidate the cached response for a path
//! - `GET /health` - Health check endpoint

pub mod conversions;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use middleware::{cache_key, response_cache};
pub use routes::create_router;
