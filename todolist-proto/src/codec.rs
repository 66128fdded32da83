//! Encoding and decoding of the persisted task collection.
//!
//! The slot payload is a JSON array of task objects in list order:
//!
//! ```json
//! [{"id": 1700000000000, "name": "Buy milk", "isCompleted": false}]
//! ```
//!
//! There is no version field. [`decode`] also rejects payloads that parse
//! but would break list invariants (empty or repeated names, repeated ids).

use std::collections::HashSet;

use crate::task::Task;

/// Storage key under which the task collection is kept by default.
pub const DEFAULT_STORAGE_KEY: &str = "tasks";

/// Error type for codec encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Payload parsed but violates task list invariants.
    #[error("invalid task data: {0}")]
    InvalidData(String),
}

/// Encodes a task collection into its persisted JSON form.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the tasks cannot be serialized.
pub fn encode(tasks: &[Task]) -> Result<String, CodecError> {
    serde_json::to_string(tasks).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Decodes a persisted JSON payload into a task collection.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the payload is not a JSON array of
/// task objects, or `CodecError::InvalidData` if a name is empty or an id or
/// name appears more than once.
pub fn decode(payload: &str) -> Result<Vec<Task>, CodecError> {
    let tasks: Vec<Task> =
        serde_json::from_str(payload).map_err(|e| CodecError::Serialization(e.to_string()))?;
    validate(&tasks)?;
    Ok(tasks)
}

fn validate(tasks: &[Task]) -> Result<(), CodecError> {
    let mut ids = HashSet::with_capacity(tasks.len());
    let mut names = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if task.name.is_empty() {
            return Err(CodecError::InvalidData(format!(
                "task {} has an empty name",
                task.id
            )));
        }
        if !ids.insert(task.id) {
            return Err(CodecError::InvalidData(format!(
                "duplicate task id {}",
                task.id
            )));
        }
        if !names.insert(task.name.as_str()) {
            return Err(CodecError::InvalidData(format!(
                "duplicate task name {:?}",
                task.name
            )));
        }
    }
    Ok(())
}
