//! Cache Module
//!
//! Provides disk-backed response caching with TTL sweeping.

mod digest;
mod entry;
mod expiry;
mod response;
mod storage;
mod store;


// Re-export public types
pub use digest::{digest, DIGEST_LEN};
pub use entry::CacheEntry;
pub use expiry::ExpirationIndex;
pub use response::{CachedResponse, Headers};
pub use storage::EntryStorage;
pub use store::DiskCacheStore;

// == Public Constants ==
/// Extra time an expired file is kept before sweeping, when none is configured
pub const DEFAULT_GRACE_PERIOD_MINUTES: i64 = 24;
