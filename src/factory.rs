//! Backend selection and construction.

#[cfg(feature = "sqlite")]
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::memory::MemoryStore;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteStore;
use crate::store::KeyValueStore;

/// Backend selection for [`open`].
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// In-memory backend. Always available, zero configuration.
    Memory,
    /// SQLite file backend at the given path.
    #[cfg(feature = "sqlite")]
    Sqlite {
        /// Database file path; created if it does not exist.
        path: PathBuf,
    },
}

/// Construct the backend selected by `config`.
///
/// The factory does construction only — path legality is the backend
/// constructor's concern, so an invalid path fails there, not here.
///
/// # Example
///
/// ```
/// use scoped_kv::{open, StoreConfig, Value};
///
/// let store = open(StoreConfig::Memory).unwrap();
/// store.set(1, "k", Value::Int(1)).unwrap();
/// ```
pub fn open(config: StoreConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config {
        StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
        #[cfg(feature = "sqlite")]
        StoreConfig::Sqlite { path } => Ok(Arc::new(SqliteStore::open(path)?)),
    }
}
