//! Expiration Index Module
//!
//! Tracks when each written entry goes stale and sweeps the ones past due.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::cache::storage::EntryStorage;
use crate::error::Result;

// == Expiration Index ==
/// Maps digest to expiration instant for the entries one store has written.
#[derive(Debug, Default)]
pub struct ExpirationIndex {
    records: HashMap<String, DateTime<Utc>>,
}

impl ExpirationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, digest: String, expires_at: DateTime<Utc>) {
        self.records.insert(digest, expires_at);
    }

    pub fn remove(&mut self, digest: &str) -> Option<DateTime<Utc>> {
        self.records.remove(digest)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Digests whose expiration plus `grace` is strictly before `now`.
    ///
    /// Compared as `expires_at < now - grace` so far-future instants such as
    /// `DateTime::<Utc>::MAX_UTC` never overflow. When `now - grace` is out of
    /// range nothing is due.
    pub fn due(&self, now: DateTime<Utc>, grace: Duration) -> Vec<String> {
        let Some(cutoff) = now.checked_sub_signed(grace) else {
            return Vec::new();
        };
        self.records
            .iter()
            .filter(|(_, expires_at)| **expires_at < cutoff)
            .map(|(digest, _)| digest.clone())
            .collect()
    }

    // == Sweep ==
    /// Deletes the files of all due entries and drops them from the index.
    ///
    /// Files that are already gone are skipped. Stops at the first I/O error,
    /// leaving the failed entry and the rest in the index for the next pass.
    ///
    /// Returns the number of entries removed from the index.
    pub fn sweep(&mut self, storage: &EntryStorage, now: DateTime<Utc>, grace: Duration) -> Result<usize> {
        let due = self.due(now, grace);
        let count = due.len();

        for digest in due {
            let deleted = storage.delete(&digest)?;
            debug!(digest = %digest, deleted, "Swept expired entry");
            self.records.remove(&digest);
        }

        Ok(count)
    }
}
