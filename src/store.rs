//! The storage-backend contract.

use crate::error::Result;
use crate::value::Value;

/// Contract implemented by every storage backend.
///
/// Five operations, each scoped by a caller-supplied script id. Entries in
/// different script ids are fully isolated: no operation observes or mutates
/// entries belonging to another id, and the full `i32` range (including
/// negative and extreme ids) behaves identically.
///
/// All methods take `&self` and implementations are internally synchronized,
/// so a store can be shared across threads as `Arc<dyn KeyValueStore>`
/// without external locking. Each operation is atomic with respect to other
/// callers of the same instance.
///
/// # Example
///
/// ```
/// use scoped_kv::{KeyValueStore, MemoryStore, Value};
///
/// let store = MemoryStore::new();
/// store.set(1, "greeting", Value::from("hello")).unwrap();
/// assert_eq!(store.get(1, "greeting").unwrap(), Some(Value::from("hello")));
/// assert!(store.remove(1, "greeting").unwrap());
/// assert_eq!(store.get(1, "greeting").unwrap(), None);
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Insert or replace the entry at `(script_id, key)`.
    ///
    /// Overwriting may change the value's kind; the prior kind is discarded.
    /// Empty keys and empty string values are valid and distinct from
    /// absence.
    fn set(&self, script_id: i32, key: &str, value: Value) -> Result<()>;

    /// Look up the value at `(script_id, key)`.
    ///
    /// Returns `None` if the key is absent — never an error.
    fn get(&self, script_id: i32, key: &str) -> Result<Option<Value>>;

    /// Check whether `(script_id, key)` has an entry.
    ///
    /// Semantically `get(..).is_some()`; backends override this with a
    /// cheaper probe that skips payload materialization.
    fn exists(&self, script_id: i32, key: &str) -> Result<bool> {
        Ok(self.get(script_id, key)?.is_some())
    }

    /// Remove the entry at `(script_id, key)`.
    ///
    /// Returns `true` if an entry was deleted, `false` if the key was
    /// absent. Idempotent: a second call returns `false`.
    fn remove(&self, script_id: i32, key: &str) -> Result<bool>;

    /// Remove every entry belonging to `script_id`.
    ///
    /// Returns the number of entries deleted (0 if there were none).
    /// Entries of other script ids are untouched.
    fn remove_all(&self, script_id: i32) -> Result<usize>;
}
