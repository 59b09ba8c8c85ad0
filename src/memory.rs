//! In-memory storage backend.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::trace;

use crate::error::Result;
use crate::store::KeyValueStore;
use crate::value::Value;

/// In-memory storage backend.
///
/// Entries live in a per-script-id map behind a single reader/writer lock:
/// `get` and `exists` take the read lock and proceed concurrently, while
/// `set`, `remove`, and `remove_all` take the write lock for the duration
/// of their mutation. Grouping entries by script id makes `remove_all` a
/// single bucket drop, atomic with respect to every other operation.
///
/// Nothing touches disk — dropping the store discards all data.
///
/// # Example
///
/// ```
/// use scoped_kv::{KeyValueStore, MemoryStore, Value};
///
/// let store = MemoryStore::new();
/// store.set(7, "count", Value::Int(3)).unwrap();
/// assert!(store.exists(7, "count").unwrap());
/// assert_eq!(store.remove_all(7).unwrap(), 1);
/// ```
pub struct MemoryStore {
    /// script_id -> (key -> value)
    buckets: RwLock<HashMap<i32, HashMap<String, Value>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
        }
    }

    /// Total number of entries across all script ids.
    pub fn len(&self) -> usize {
        self.buckets.read().values().map(HashMap::len).sum()
    }

    /// Whether the store holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.buckets.read().values().all(HashMap::is_empty)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&self, script_id: i32, key: &str, value: Value) -> Result<()> {
        self.buckets
            .write()
            .entry(script_id)
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn get(&self, script_id: i32, key: &str) -> Result<Option<Value>> {
        Ok(self
            .buckets
            .read()
            .get(&script_id)
            .and_then(|bucket| bucket.get(key).cloned()))
    }

    fn exists(&self, script_id: i32, key: &str) -> Result<bool> {
        Ok(self
            .buckets
            .read()
            .get(&script_id)
            .is_some_and(|bucket| bucket.contains_key(key)))
    }

    fn remove(&self, script_id: i32, key: &str) -> Result<bool> {
        let mut buckets = self.buckets.write();
        let removed = buckets
            .get_mut(&script_id)
            .and_then(|bucket| bucket.remove(key))
            .is_some();
        // Drop the bucket once its last entry is gone so abandoned script
        // ids do not accumulate.
        if removed && buckets.get(&script_id).is_some_and(HashMap::is_empty) {
            buckets.remove(&script_id);
        }
        Ok(removed)
    }

    fn remove_all(&self, script_id: i32) -> Result<usize> {
        let removed = self
            .buckets
            .write()
            .remove(&script_id)
            .map(|bucket| bucket.len())
            .unwrap_or(0);
        trace!(script_id, removed, "remove_all");
        Ok(removed)
    }
}
