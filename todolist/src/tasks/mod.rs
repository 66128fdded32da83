//! The to-do list store and its validation rules.
//!
//! [`TaskListStore`] owns the ordered task collection together with the
//! draft name and the pending edit/delete selections. Every successful
//! mutation is written through a [`PersistenceAdapter`](crate::persistence::PersistenceAdapter)
//! before it becomes visible in memory.

pub mod ids;
pub mod store;

pub use ids::IdGenerator;
pub use store::{CompletionSummary, LoadWarning, TaskListStore};

use thiserror::Error;
use todolist_proto::codec::CodecError;

use crate::persistence::PersistenceError;

/// Reasons a draft name cannot be committed as a task name.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Task name cannot be empty.
    #[error("task name cannot be empty")]
    EmptyName,
    /// Another task already has this name.
    #[error("a task with this name already exists")]
    DuplicateName,
}

/// Errors returned by mutating store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The draft name was rejected; also recorded as the store's last error.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The updated list could not be written; in-memory state is unchanged.
    #[error("failed to save task list: {0}")]
    Persistence(#[from] PersistenceError),
    /// The updated list could not be encoded.
    #[error("failed to encode task list: {0}")]
    Codec(#[from] CodecError),
    /// No task id greater than the existing ones is left.
    #[error("task id space exhausted")]
    IdSpaceExhausted,
}
