//! Error type shared by every backend.

use thiserror::Error;

/// Error type for all key-value store operations.
///
/// Every failure origin — opening the durable backend, executing a
/// statement, decoding a stored value — surfaces as this one kind carrying
/// a human-readable message. Backend-specific error types (such as
/// `rusqlite::Error`) never cross the crate boundary.
///
/// "Not found" is never an error: lookups return `Option`, removals return
/// `bool` or a count.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable message describing the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
