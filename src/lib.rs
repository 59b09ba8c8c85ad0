//! # scoped-kv
//!
//! A small, thread-safe key-value store partitioned by a caller-supplied
//! script id, with interchangeable storage backends.
//!
//! Values are typed scalars — string, 32-bit integer, 64-bit double, or
//! boolean — stored under string keys. Every operation is scoped to one
//! script id, and ids are fully isolated from each other: a lookup or
//! removal addressed to one id never observes another id's entries.
//!
//! ## Quick Start
//!
//! ```
//! use scoped_kv::{KeyValueStore, MemoryStore, Value};
//!
//! let store = MemoryStore::new();
//! store.set(1, "retries", Value::Int(3)).unwrap();
//!
//! assert_eq!(store.get(1, "retries").unwrap(), Some(Value::Int(3)));
//! assert_eq!(store.get(2, "retries").unwrap(), None); // other ids isolated
//! ```
//!
//! ## Backends
//!
//! | Backend | Feature flag | Use case |
//! |---------|-------------|----------|
//! | [`MemoryStore`] | *(always available)* | Testing, ephemeral state |
//! | `SqliteStore` | `sqlite` *(default)* | Durable single-file storage |
//!
//! Both implement the [`KeyValueStore`] trait and can be constructed
//! through [`open`] with a [`StoreConfig`]. Stores are internally
//! synchronized: share one instance across threads as
//! `Arc<dyn KeyValueStore>` with no external locking.
//!
//! The SQLite backend persists each value as text plus a one-character type
//! tag and opens its file in WAL mode; see [`Value`] for the codec.
//!
//! This crate emits [`tracing`] events at debug/trace level; installing a
//! subscriber is the embedding application's responsibility.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod factory;
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;
mod store;
mod value;

pub use error::{Result, StoreError};
pub use factory::{open, StoreConfig};
pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
pub use store::KeyValueStore;
pub use value::Value;
