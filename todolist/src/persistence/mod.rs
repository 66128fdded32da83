//! Key-value persistence for the task collection.
//!
//! Defines the [`PersistenceAdapter`] trait the store loads from and saves
//! to, plus two implementations:
//! - [`InMemoryStorage`]: shared in-memory slots for tests and scratch use
//! - [`FileStorage`]: one JSON file per key inside a data directory

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::InMemoryStorage;

use std::path::PathBuf;

/// Errors that can occur when reading or writing a persistence slot.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The underlying storage could not be read or written.
    #[error("storage I/O failed at {path}: {source}")]
    Io {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The key cannot be mapped to a storage location.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The stored bytes are not valid UTF-8. They were copied verbatim to
    /// `backup_key` before this error was returned.
    #[error("stored value at {path} is not valid UTF-8; raw bytes copied to '{backup_key}'")]
    NotUtf8 {
        /// Path of the unreadable slot.
        path: PathBuf,
        /// Slot now holding the original bytes.
        backup_key: String,
    },

    /// The storage backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Suffix of the slot that receives an unparsable payload found at startup.
pub const CORRUPT_BACKUP_SUFFIX: &str = ".corrupt";

/// Upper bound on backup slots tried for one key.
pub const MAX_BACKUPS: usize = 100;

/// Key of the `n`th backup slot for `key`: `<key>.corrupt`, then
/// `<key>.corrupt-1`, `<key>.corrupt-2` and so on.
#[must_use]
pub fn backup_key(key: &str, n: usize) -> String {
    if n == 0 {
        format!("{key}{CORRUPT_BACKUP_SUFFIX}")
    } else {
        format!("{key}{CORRUPT_BACKUP_SUFFIX}-{n}")
    }
}

/// A string key-value store holding serialized values.
///
/// `save` overwrites the whole value for a key; there are no partial
/// updates. Implementations are synchronous.
pub trait PersistenceAdapter {
    /// Return the value previously stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the value could not be written.
    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Whether a value is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the backend cannot be queried.
    fn contains(&self, key: &str) -> Result<bool, PersistenceError> {
        Ok(self.load(key)?.is_some())
    }
}
