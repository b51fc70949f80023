//! Cache Store Module
//!
//! Disk cache engine combining digest-named files with an in-memory expiration index.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::cache::digest::digest;
use crate::cache::expiry::ExpirationIndex;
use crate::cache::storage::EntryStorage;
use crate::cache::{CacheEntry, CachedResponse, DEFAULT_GRACE_PERIOD_MINUTES};
use crate::error::{CacheError, Result};

/// File written and removed at construction to prove the directory is writable.
const WRITE_CHECK_FILE: &str = concat!(env!("CARGO_PKG_NAME"), ".write-check");

// == Disk Cache Store ==
/// Disk-backed response cache with TTL sweeping.
///
/// Every operation runs under one store-wide lock, so operations on the same
/// store are fully serialized even for unrelated keys. The expiration index is
/// owned by this instance and starts empty; files left in the directory by an
/// earlier instance are served by `get` but never swept by this one.
#[derive(Debug)]
pub struct DiskCacheStore {
    storage: EntryStorage,
    grace_period: Duration,
    /// Extra time past expiration before a sweep deletes an entry.
    sweep_delay: Duration,
    index: Mutex<ExpirationIndex>,
}

impl DiskCacheStore {
    // == Constructor ==
    /// Opens a store in `cache_dir` with the default 24 minute grace period.
    ///
    /// The grace period is recorded but not applied: entries become eligible
    /// for sweeping as soon as their expiration instant has passed.
    ///
    /// # Errors
    /// `CacheError::Configuration` if the path is relative, or the directory
    /// cannot be created or written to.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::open(
            cache_dir.into(),
            Duration::minutes(DEFAULT_GRACE_PERIOD_MINUTES),
            Duration::zero(),
        )
    }

    /// Opens a store in `cache_dir` that keeps expired files for an extra
    /// `grace_period` before they become eligible for sweeping.
    ///
    /// # Errors
    /// `CacheError::Configuration` for a negative grace period, plus the
    /// same directory checks as [`DiskCacheStore::new`].
    pub fn with_grace_period(cache_dir: impl Into<PathBuf>, grace_period: Duration) -> Result<Self> {
        if grace_period < Duration::zero() {
            return Err(CacheError::Configuration(format!(
                "grace period must not be negative, got {}s",
                grace_period.num_seconds()
            )));
        }
        Self::open(cache_dir.into(), grace_period, grace_period)
    }

    fn open(cache_dir: PathBuf, grace_period: Duration, sweep_delay: Duration) -> Result<Self> {
        if !cache_dir.is_absolute() {
            return Err(CacheError::Configuration(format!(
                "cache directory must be an absolute path, got {}",
                cache_dir.display()
            )));
        }

        fs::create_dir_all(&cache_dir).map_err(|e| {
            CacheError::Configuration(format!(
                "cannot create cache directory {}: {}",
                cache_dir.display(),
                e
            ))
        })?;

        let check = cache_dir.join(WRITE_CHECK_FILE);
        fs::write(&check, WRITE_CHECK_FILE)
            .and_then(|_| fs::remove_file(&check))
            .map_err(|e| {
                CacheError::Configuration(format!(
                    "cache directory {} is not writable: {}",
                    cache_dir.display(),
                    e
                ))
            })?;

        info!(
            "Disk cache opened at {} (grace period {}s, sweep delay {}s)",
            cache_dir.display(),
            grace_period.num_seconds(),
            sweep_delay.num_seconds()
        );

        Ok(Self {
            storage: EntryStorage::new(cache_dir),
            grace_period,
            sweep_delay,
            index: Mutex::new(ExpirationIndex::new()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, ExpirationIndex> {
        self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Get ==
    /// Retrieves the cached response for `key`, if a file exists for it.
    ///
    /// The expiration index is not consulted: an entry past its expiration
    /// that has not been swept yet is still returned as a hit.
    pub fn get(&self, key: &str) -> Result<Option<CachedResponse>> {
        let digest = digest(key);
        let _index = self.lock();

        if !self.storage.exists(&digest)? {
            debug!(digest = %digest, "Cache miss");
            return Ok(None);
        }

        let bytes = self.storage.read(&digest)?;
        let entry = CacheEntry::from_bytes(&digest, &bytes)?;
        debug!(digest = %digest, "Cache hit");
        Ok(Some(entry.into_response()))
    }

    // == Set ==
    /// Stores `response` under `key` until `expires_at`, then sweeps.
    ///
    /// Does nothing for an empty key. Skips the write when `expires_at` is not
    /// in the future or when a file for the key already exists (first write
    /// wins), but still runs a sweep pass in both cases.
    pub fn set(&self, key: &str, response: &CachedResponse, expires_at: DateTime<Utc>) -> Result<()> {
        if key.is_empty() {
            return Ok(());
        }

        let mut index = self.lock();

        if expires_at > Utc::now() {
            let digest = digest(key);
            if self.storage.exists(&digest)? {
                debug!(digest = %digest, "Entry already cached, keeping first write");
            } else {
                let bytes = CacheEntry::new(response, expires_at).to_bytes()?;
                self.storage.write(&digest, &bytes)?;
                debug!(digest = %digest, expires_at = %expires_at, "Cached entry written");
                index.record(digest, expires_at);
            }
        }

        self.sweep_locked(&mut index)?;
        Ok(())
    }

    // == Remove ==
    /// Deletes the entry for `key`. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) -> Result<()> {
        let digest = digest(key);
        let mut index = self.lock();

        if self.storage.delete(&digest)? {
            debug!(digest = %digest, "Cached entry removed");
        }
        index.remove(&digest);
        Ok(())
    }

    // == Sweep ==
    /// Runs a sweep pass outside of `set`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&self) -> Result<usize> {
        let mut index = self.lock();
        self.sweep_locked(&mut index)
    }

    fn sweep_locked(&self, index: &mut ExpirationIndex) -> Result<usize> {
        let removed = index.sweep(&self.storage, Utc::now(), self.sweep_delay)?;
        if removed > 0 {
            info!("Sweep: removed {} expired entries", removed);
        }
        Ok(removed)
    }

    /// Number of entries this store is tracking for expiration.
    pub fn tracked_entries(&self) -> usize {
        self.lock().len()
    }

    pub fn cache_dir(&self) -> &Path {
        self.storage.dir()
    }

    /// The configured grace period.
    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// How long past expiration an entry is kept before sweeping.
    pub fn sweep_delay(&self) -> Duration {
        self.sweep_delay
    }
}
