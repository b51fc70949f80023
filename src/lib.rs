//! Disk Response Cache - A disk-backed, key-addressed response cache
//!
//! Maps cache keys to SHA-256 named files holding serialized responses and
//! sweeps expired entries on every write.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use api::AppState;
pub use cache::{CachedResponse, DiskCacheStore};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_sweep_task;
