use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::store::KeyValueStore;
use crate::update::UpdateDescriptor;

/// Cached fetch result: the descriptor plus when it was fetched.
///
/// Expiry itself is enforced by the backing store's TTL; `fetched_at` is
/// kept for status display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The descriptor produced by the fetch.
    pub descriptor: UpdateDescriptor,
    /// UTC timestamp of the fetch that produced this entry.
    pub fetched_at: DateTime<Utc>,
}

/// Time-bounded cache of the last-fetched [`UpdateDescriptor`].
///
/// One entry exists per (owner, repository) pair, keyed by a digest of the
/// pair so arbitrary repository names stay safe as store keys. The cache
/// is the primary defense against GitHub API rate limits: between TTL
/// expiries (default six hours) no network fetch happens at all unless a
/// manual check forces one.
///
/// Thread safety is whatever the backing store guarantees - concurrent
/// duplicate fetches are tolerated (last write wins), not prevented.
pub struct UpdateCache {
    store: Arc<dyn KeyValueStore>,
    ttl: chrono::Duration,
}

impl UpdateCache {
    /// Creates a cache over `store` with the given entry lifetime.
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: chrono::Duration) -> Self {
        Self { store, ttl }
    }

    /// Store key for an (owner, repository) pair.
    pub fn key(owner: &str, repo: &str) -> String {
        let digest = Sha256::digest(format!("{owner}/{repo}").as_bytes());
        format!("update-cache:{}", &hex::encode(digest)[..16])
    }

    /// Returns the live cache entry, or `None` on miss or expiry.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(entry) => {
                debug!("Update cache hit for {}", key);
                Some(entry)
            }
            Err(err) => {
                // An unreadable entry (e.g., written by an older build) is
                // treated as a miss and dropped.
                warn!("Dropping unreadable cache entry {}: {}", key, err);
                self.store.remove(key);
                None
            }
        }
    }

    /// Overwrites the entry for `key` with a freshly fetched descriptor.
    pub fn put(&self, key: &str, descriptor: &UpdateDescriptor) {
        let entry = CacheEntry {
            descriptor: descriptor.clone(),
            fetched_at: Utc::now(),
        };
        match serde_json::to_string(&entry) {
            Ok(raw) => self.store.set(key, &raw, Some(self.ttl)),
            Err(err) => warn!("Failed to serialize cache entry: {}", err),
        }
    }

    /// Removes the entry for `key`, forcing the next check to fetch.
    pub fn invalidate(&self, key: &str) {
        debug!("Invalidating update cache entry {}", key);
        self.store.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn descriptor(version: &str) -> UpdateDescriptor {
        UpdateDescriptor {
            version: version.to_string(),
            download_url: format!("https://example.com/{version}.zip"),
            changelog: String::new(),
            published_at: None,
            requires: None,
            tested: None,
        }
    }

    #[test]
    fn test_key_is_stable_and_distinct() {
        let a = UpdateCache::key("owner", "repo");
        assert_eq!(a, UpdateCache::key("owner", "repo"));
        assert_ne!(a, UpdateCache::key("owner", "other"));
        assert!(a.starts_with("update-cache:"));
    }

    #[test]
    fn test_round_trip_before_ttl() {
        let cache = UpdateCache::new(Arc::new(MemoryStore::new()), chrono::Duration::hours(6));
        let key = UpdateCache::key("o", "r");

        assert!(cache.get(&key).is_none());
        cache.put(&key, &descriptor("1.2.3"));
        assert_eq!(cache.get(&key).unwrap().descriptor, descriptor("1.2.3"));
    }

    #[test]
    fn test_miss_after_ttl() {
        let cache = UpdateCache::new(Arc::new(MemoryStore::new()), chrono::Duration::seconds(-1));
        let key = UpdateCache::key("o", "r");
        cache.put(&key, &descriptor("1.2.3"));
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_put_overwrites_not_merges() {
        let cache = UpdateCache::new(Arc::new(MemoryStore::new()), chrono::Duration::hours(6));
        let key = UpdateCache::key("o", "r");
        cache.put(&key, &descriptor("1.0.0"));
        cache.put(&key, &descriptor("2.0.0"));
        assert_eq!(cache.get(&key).unwrap().descriptor.version, "2.0.0");
    }

    #[test]
    fn test_invalidate_removes_entry() {
        let cache = UpdateCache::new(Arc::new(MemoryStore::new()), chrono::Duration::hours(6));
        let key = UpdateCache::key("o", "r");
        cache.put(&key, &descriptor("1.0.0"));
        cache.invalidate(&key);
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_unreadable_entry_reads_as_miss() {
        let store = Arc::new(MemoryStore::new());
        let cache = UpdateCache::new(store.clone(), chrono::Duration::hours(6));
        let key = UpdateCache::key("o", "r");
        store.set(&key, "not json", None);

        assert!(cache.get(&key).is_none());
        // The bad entry is gone afterwards.
        assert!(store.get(&key).is_none());
    }
}
