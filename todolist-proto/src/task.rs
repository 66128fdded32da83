//! Task types for the `todolist` store.
//!
//! A [`Task`] is a named to-do entry identified by an integer [`TaskId`].
//! The serde representation is the persisted slot format: `id` is a plain
//! JSON integer and the completion flag is stored as `isCompleted`.

use serde::{Deserialize, Serialize};

/// Unique identifier for a task.
///
/// Ids are plain integers so that the persisted format stays
/// `{"id": 1700000000000, ...}`. They are assigned once at creation and
/// never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a `TaskId` from a raw integer value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// Task name, non-empty and unique within a list.
    pub name: String,
    /// Whether the task has been completed.
    #[serde(rename = "isCompleted")]
    pub completed: bool,
}

impl Task {
    /// Creates a new, not yet completed task.
    #[must_use]
    pub fn new(id: TaskId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            completed: false,
        }
    }
}
