use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::data_models::JobSummary;

/// Shared, read-only snapshot of a search result.
pub type JobList = Arc<[JobSummary]>;

struct CacheEntry {
    jobs: JobList,
    inserted_at: DateTime<Utc>,
}

/// In-memory search result cache with a fixed time-to-live.
///
/// Entries are replaced whole and never edited in place. Concurrent misses on
/// the same key may both fetch and both `put`; the last write wins.
pub struct ResultCache {
    entries: DashMap<String, CacheEntry>,
    ttl: chrono::Duration,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
        }
    }

    pub fn get(&self, key: &str) -> Option<JobList> {
        self.get_at(key, Utc::now())
    }

    pub fn put(&self, key: impl Into<String>, jobs: JobList) {
        self.put_at(key.into(), jobs, Utc::now());
    }

    /// Drop every entry older than the TTL.
    pub fn clear_expired(&self) {
        let now = Utc::now();
        self.entries
            .retain(|_, entry| !self.is_expired(entry.inserted_at, now));
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    fn is_expired(&self, inserted_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(inserted_at) > self.ttl
    }

    fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<JobList> {
        let expired = {
            let entry = self.entries.get(key)?;
            if !self.is_expired(entry.inserted_at, now) {
                return Some(Arc::clone(&entry.jobs));
            }
            entry.inserted_at
        };
        // the read guard must be gone before removing, or the shard deadlocks
        self.entries
            .remove_if(key, |_, entry| entry.inserted_at == expired);
        None
    }

    fn put_at(&self, key: String, jobs: JobList, inserted_at: DateTime<Utc>) {
        self.entries.insert(key, CacheEntry { jobs, inserted_at });
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(3600))
    }
}
