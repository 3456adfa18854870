//! Persisted key-value storage with TTL semantics.
//!
//! The update engine never owns its persistence: flags and cached release
//! information live in the host's shared key-value store, which provides
//! last-write-wins semantics and entry expiry. [`KeyValueStore`] models that
//! contract as an injected dependency so every component above it can be
//! unit tested against an in-memory fake.
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryStore`] - in-process map, used by tests and by embedding hosts
//!   that bring their own persistence
//! - [`FileStore`] - a single JSON file written atomically, so the `ghup`
//!   CLI behaves like a real host across process boundaries (the cache and
//!   the reactivation flags must survive an update that replaces the
//!   running code)
//!
//! Expired entries read as absent. Writes never fail the caller: a store
//! that cannot persist degrades to "no data", which every consumer in this
//! crate already tolerates.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::utils::fs::atomic_write;

/// A single stored value with optional expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreEntry {
    value: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

impl StoreEntry {
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => Utc::now() >= at,
            None => false,
        }
    }
}

/// Host-provided persisted key-value store with TTL semantics.
///
/// Implementations must behave last-write-wins under concurrent access;
/// the engine tolerates racing writers (worst case is a redundant fetch or
/// a redundant, idempotent reactivation attempt).
pub trait KeyValueStore: Send + Sync {
    /// Returns the live value for `key`, or `None` when absent or expired.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, expiring after `ttl` when given.
    ///
    /// Overwrites any previous value. Persistence failures are logged by
    /// the implementation, never surfaced.
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>);

    /// Removes `key` if present.
    fn remove(&self, key: &str);
}

/// In-memory [`KeyValueStore`] implementation.
///
/// Deterministic and dependency-free; the default store for unit tests and
/// for hosts that adapt their own persistence behind the trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, StoreEntry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        if matches!(entries.get(key), Some(entry) if entry.is_expired()) {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) {
        let entry = StoreEntry {
            value: value.to_string(),
            expires_at: ttl.map(|d| Utc::now() + d),
        };
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_string(), entry);
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .remove(key);
    }
}

/// File-backed [`KeyValueStore`] holding all entries in one JSON document.
///
/// Each operation reloads the file, applies the change, and writes the
/// whole document back atomically (write-then-rename). That is slow for a
/// busy store but this one holds a handful of small flags and one cached
/// descriptor, and the reload is what makes flags written before a binary
/// swap visible to the process that runs afterwards.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store persisting to `path`.
    ///
    /// The file and its parent directory are created lazily on first write.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn load(&self) -> HashMap<String, StoreEntry> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(err) => {
                warn!("Failed to read store file {}: {}", self.path.display(), err);
                return HashMap::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(err) => {
                // A corrupt store is discarded rather than wedging every
                // consumer; the next write rebuilds it.
                warn!(
                    "Discarding corrupt store file {}: {}",
                    self.path.display(),
                    err
                );
                HashMap::new()
            }
        }
    }

    fn save(&self, entries: &HashMap<String, StoreEntry>) {
        let content = match serde_json::to_vec_pretty(entries) {
            Ok(content) => content,
            Err(err) => {
                warn!("Failed to serialize store: {}", err);
                return;
            }
        };
        if let Err(err) = atomic_write(&self.path, &content) {
            warn!(
                "Failed to persist store file {}: {}",
                self.path.display(),
                err
            );
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.load();
        if matches!(entries.get(key), Some(entry) if entry.is_expired()) {
            debug!("Store entry '{}' expired", key);
            entries.remove(key);
            self.save(&entries);
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) {
        let mut entries = self.load();
        entries.insert(
            key.to_string(),
            StoreEntry {
                value: value.to_string(),
                expires_at: ttl.map(|d| Utc::now() + d),
            },
        );
        self.save(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.load();
        if entries.remove(key).is_some() {
            self.save(&entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        store.set("key", "value", None);
        assert_eq!(store.get("key").as_deref(), Some("value"));

        store.remove("key");
        assert_eq!(store.get("key"), None);
    }

    #[test]
    fn test_memory_store_ttl_expiry() {
        let store = MemoryStore::new();
        store.set("fresh", "1", Some(Duration::hours(1)));
        store.set("stale", "1", Some(Duration::seconds(-1)));

        assert_eq!(store.get("fresh").as_deref(), Some("1"));
        assert_eq!(store.get("stale"), None);
    }

    #[test]
    fn test_memory_store_last_write_wins() {
        let store = MemoryStore::new();
        store.set("key", "first", None);
        store.set("key", "second", None);
        assert_eq!(store.get("key").as_deref(), Some("second"));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store.json");

        let store = FileStore::new(path.clone());
        store.set("flag", "true", Some(Duration::minutes(5)));
        drop(store);

        let reopened = FileStore::new(path);
        assert_eq!(reopened.get("flag").as_deref(), Some("true"));
    }

    #[test]
    fn test_file_store_missing_file_reads_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("absent.json"));
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn test_file_store_discards_corrupt_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = FileStore::new(path);
        assert_eq!(store.get("key"), None);

        // The store recovers on the next write.
        store.set("key", "value", None);
        assert_eq!(store.get("key").as_deref(), Some("value"));
    }

    #[test]
    fn test_file_store_expired_entry_is_removed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store.json");
        let store = FileStore::new(path.clone());
        store.set("stale", "1", Some(Duration::seconds(-1)));

        assert_eq!(store.get("stale"), None);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
    }
}
