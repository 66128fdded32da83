//! In-memory implementation of [`PersistenceAdapter`].

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{PersistenceAdapter, PersistenceError};

#[derive(Debug, Default)]
struct Slots {
    values: HashMap<String, String>,
    writes: usize,
    fail_saves: bool,
}

/// In-memory key-value slots.
///
/// Cloning returns another handle onto the same slots, so a test can hand
/// one clone to a store and inspect what was written through the other.
/// Nothing survives process exit.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    slots: Arc<Mutex<Slots>>,
}

impl InMemoryStorage {
    /// Create new, empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage with a value already present under `key`.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .slots
            .lock()
            .values
            .insert(key.to_string(), value.to_string());
        storage
    }

    /// Current value under `key`, bypassing the adapter interface.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.slots.lock().values.get(key).cloned()
    }

    /// Number of successful saves performed through any handle.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.slots.lock().writes
    }

    /// Make every subsequent save fail with [`PersistenceError::Unavailable`].
    pub fn set_fail_saves(&self, fail: bool) {
        self.slots.lock().fail_saves = fail;
    }
}

impl PersistenceAdapter for InMemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut slots = self.slots.lock();
        if slots.fail_saves {
            return Err(PersistenceError::Unavailable(
                "in-memory storage is refusing writes".to_string(),
            ));
        }
        slots.values.insert(key.to_string(), value.to_string());
        slots.writes += 1;
        drop(slots);
        Ok(())
    }
}
