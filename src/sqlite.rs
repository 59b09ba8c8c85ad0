//! SQLite storage backend using rusqlite.
//!
//! One file, one table, WAL journaling for concurrent-friendly writes.
//! Values are persisted as text plus a one-character type tag (see
//! [`Value::encode`]).

use std::path::Path;
use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, trace};

use crate::error::{Result, StoreError};
use crate::store::KeyValueStore;
use crate::value::Value;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS key_value_store (
        script_id INTEGER NOT NULL,
        key       TEXT    NOT NULL,
        value     TEXT    NOT NULL,
        type      CHAR(1) NOT NULL,
        PRIMARY KEY (script_id, key)
    );
    CREATE INDEX IF NOT EXISTS idx_script_id ON key_value_store(script_id);
";

const SQL_SET: &str = "INSERT OR REPLACE INTO key_value_store \
                       (script_id, key, value, type) VALUES (?1, ?2, ?3, ?4)";
const SQL_GET: &str = "SELECT value, type FROM key_value_store \
                       WHERE script_id = ?1 AND key = ?2";
const SQL_EXISTS: &str = "SELECT 1 FROM key_value_store \
                          WHERE script_id = ?1 AND key = ?2 LIMIT 1";
const SQL_REMOVE: &str = "DELETE FROM key_value_store \
                          WHERE script_id = ?1 AND key = ?2";
const SQL_REMOVE_ALL: &str = "DELETE FROM key_value_store WHERE script_id = ?1";

const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Durable storage backend on a single SQLite file.
///
/// The connection is wrapped in a `Mutex` because SQLite forbids concurrent
/// use of one connection object; every operation holds the lock for its full
/// duration. Independent instances opened on the same file coordinate
/// through SQLite's own WAL locking, not through this layer — a writer may
/// wait on another connection's in-flight transaction up to the busy
/// timeout, after which the operation fails with a [`StoreError`].
///
/// Each operation runs a statement from the connection's prepared-statement
/// cache: compiled once, reset and re-bound on every call, never re-parsed.
/// The five statements are primed at construction so preparation failures
/// fail `open` rather than the first operation.
///
/// # Example
///
/// ```no_run
/// use scoped_kv::{KeyValueStore, SqliteStore, Value};
///
/// let store = SqliteStore::open("scripts.db").unwrap();
/// store.set(1, "threshold", Value::Double(0.75)).unwrap();
/// ```
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`.
    ///
    /// A missing file is created along with the schema; an existing file is
    /// reopened with its data intact. Fails if the path cannot be created or
    /// written, is not a SQLite database, or if enabling WAL mode, creating
    /// the schema, or preparing the operation statements fails. On failure
    /// no instance is returned.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            StoreError::new(format!("failed to open database {}: {e}", path.display()))
        })?;
        let store = Self::init(conn)?;
        debug!(path = %path.display(), "opened sqlite store");
        Ok(store)
    }

    /// Open a private in-memory database. Useful for tests; data is
    /// discarded on drop.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::new(format!("failed to open in-memory database: {e}")))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        // journal_mode is a query-style pragma: it returns the mode that is
        // actually in effect (in-memory databases report "memory").
        let mode: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .map_err(|e| StoreError::new(format!("failed to enable WAL mode: {e}")))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| StoreError::new(format!("failed to set busy timeout: {e}")))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError::new(format!("failed to create schema: {e}")))?;

        for sql in [SQL_SET, SQL_GET, SQL_EXISTS, SQL_REMOVE, SQL_REMOVE_ALL] {
            conn.prepare_cached(sql)
                .map_err(|e| StoreError::new(format!("failed to prepare statement: {e}")))?;
        }

        debug!(journal_mode = %mode, "sqlite store initialized");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn set(&self, script_id: i32, key: &str, value: Value) -> Result<()> {
        let (text, tag) = value.encode();
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(SQL_SET)
            .map_err(|e| StoreError::new(format!("set: statement unavailable: {e}")))?;
        stmt.execute(params![script_id, key, text, tag.to_string()])
            .map_err(|e| StoreError::new(format!("set failed: {e}")))?;
        Ok(())
    }

    fn get(&self, script_id: i32, key: &str) -> Result<Option<Value>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(SQL_GET)
            .map_err(|e| StoreError::new(format!("get: statement unavailable: {e}")))?;
        let row = stmt
            .query_row(params![script_id, key], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .optional()
            .map_err(|e| StoreError::new(format!("get failed: {e}")))?;

        match row {
            Some((text, tag_text)) => {
                let tag = tag_text
                    .chars()
                    .next()
                    .ok_or_else(|| StoreError::new("stored row has an empty type tag"))?;
                // A row that no longer parses for its tag is corruption,
                // surfaced as an error rather than a silent None.
                Value::decode(tag, &text).map(Some)
            }
            None => Ok(None),
        }
    }

    fn exists(&self, script_id: i32, key: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(SQL_EXISTS)
            .map_err(|e| StoreError::new(format!("exists: statement unavailable: {e}")))?;
        let found = stmt
            .query_row(params![script_id, key], |_| Ok(()))
            .optional()
            .map_err(|e| StoreError::new(format!("exists failed: {e}")))?;
        Ok(found.is_some())
    }

    fn remove(&self, script_id: i32, key: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(SQL_REMOVE)
            .map_err(|e| StoreError::new(format!("remove: statement unavailable: {e}")))?;
        let changed = stmt
            .execute(params![script_id, key])
            .map_err(|e| StoreError::new(format!("remove failed: {e}")))?;
        Ok(changed > 0)
    }

    fn remove_all(&self, script_id: i32) -> Result<usize> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(SQL_REMOVE_ALL)
            .map_err(|e| StoreError::new(format!("remove_all: statement unavailable: {e}")))?;
        // The engine's affected-row count is the authoritative result.
        let removed = stmt
            .execute(params![script_id])
            .map_err(|e| StoreError::new(format!("remove_all failed: {e}")))?;
        trace!(script_id, removed, "remove_all");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn set_get_remove() {
        let store = test_store();

        store.set(1, "k1", Value::from("hello")).unwrap();
        assert_eq!(store.get(1, "k1").unwrap(), Some(Value::from("hello")));

        store.set(1, "k1", Value::from("world")).unwrap();
        assert_eq!(store.get(1, "k1").unwrap(), Some(Value::from("world")));

        assert!(store.remove(1, "k1").unwrap());
        assert_eq!(store.get(1, "k1").unwrap(), None);
        assert!(!store.remove(1, "k1").unwrap());
    }

    #[test]
    fn round_trip_all_kinds() {
        let store = test_store();
        let values = [
            Value::Str("plain".to_string()),
            Value::Str(String::new()),
            Value::Str("unicode: ñ, 中文, 🚀, \u{1} control".to_string()),
            Value::Int(i32::MIN),
            Value::Int(i32::MAX),
            Value::Double(f64::MIN),
            Value::Double(f64::MAX),
            Value::Double(0.1),
            Value::Bool(true),
            Value::Bool(false),
        ];

        for (i, value) in values.iter().enumerate() {
            let key = format!("k{i}");
            store.set(9, &key, value.clone()).unwrap();
            assert_eq!(store.get(9, &key).unwrap().as_ref(), Some(value));
        }
    }

    #[test]
    fn empty_key_is_valid() {
        let store = test_store();
        store.set(1, "", Value::Int(5)).unwrap();
        assert!(store.exists(1, "").unwrap());
        assert_eq!(store.get(1, "").unwrap(), Some(Value::Int(5)));
        assert!(store.remove(1, "").unwrap());
    }

    #[test]
    fn overwrite_changes_kind() {
        let store = test_store();
        store.set(1, "k", Value::from("x")).unwrap();
        store.set(1, "k", Value::Int(42)).unwrap();
        assert_eq!(store.get(1, "k").unwrap(), Some(Value::Int(42)));
    }

    #[test]
    fn script_id_isolation_including_extremes() {
        let store = test_store();
        for id in [i32::MIN, -7, 0, 7, i32::MAX] {
            store.set(id, "k", Value::Int(id)).unwrap();
        }
        for id in [i32::MIN, -7, 0, 7, i32::MAX] {
            assert_eq!(store.get(id, "k").unwrap(), Some(Value::Int(id)));
        }
    }

    #[test]
    fn remove_all_counts_and_isolates() {
        let store = test_store();
        for i in 0..4 {
            store.set(1, &format!("k{i}"), Value::Int(i)).unwrap();
        }
        store.set(2, "keep", Value::Bool(true)).unwrap();

        assert_eq!(store.remove_all(1).unwrap(), 4);
        assert_eq!(store.remove_all(1).unwrap(), 0);
        assert_eq!(store.get(2, "keep").unwrap(), Some(Value::Bool(true)));
    }

    #[test]
    fn exists_without_get() {
        let store = test_store();
        assert!(!store.exists(3, "k").unwrap());
        store.set(3, "k", Value::Double(1.5)).unwrap();
        assert!(store.exists(3, "k").unwrap());
    }

    #[test]
    fn corrupt_int_row_is_an_error_not_none() {
        let store = test_store();
        store
            .conn
            .lock()
            .execute(
                "INSERT INTO key_value_store (script_id, key, value, type) \
                 VALUES (1, 'bad', 'not-a-number', 'i')",
                [],
            )
            .unwrap();

        assert!(store.get(1, "bad").is_err());
        // The instance stays usable after an operation failure.
        store.set(1, "good", Value::Int(1)).unwrap();
        assert_eq!(store.get(1, "good").unwrap(), Some(Value::Int(1)));
    }

    #[test]
    fn unknown_tag_row_is_an_error() {
        let store = test_store();
        store
            .conn
            .lock()
            .execute(
                "INSERT INTO key_value_store (script_id, key, value, type) \
                 VALUES (1, 'odd', 'payload', 'z')",
                [],
            )
            .unwrap();

        assert!(store.get(1, "odd").is_err());
    }

    #[test]
    fn wal_mode_enabled_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("wal.db")).unwrap();
        let mode: String = store
            .conn
            .lock()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
    }

    #[test]
    fn open_rejects_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing_parent = dir.path().join("no-such-dir").join("kv.db");
        assert!(SqliteStore::open(missing_parent).is_err());
    }

    #[test]
    fn open_rejects_non_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, b"this is not a sqlite file, padded well past the header")
            .unwrap();
        assert!(SqliteStore::open(&path).is_err());
    }
}
