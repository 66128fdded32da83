//! Task list store: CRUD operations, edit/delete selections and persistence.
//!
//! `TaskListStore` is the single owner of the task collection. Callers
//! (the terminal UI, tests) read its state and invoke operations; they never
//! mutate tasks directly.

use std::fmt;

use todolist_proto::codec::{self, DEFAULT_STORAGE_KEY};
use todolist_proto::task::{Task, TaskId};

use super::ids::IdGenerator;
use super::{StoreError, ValidationError};
use crate::persistence::{MAX_BACKUPS, PersistenceAdapter, PersistenceError, backup_key};

/// Something went wrong while loading the stored list at startup.
///
/// The store still starts (with an empty list); the presentation layer may
/// show this to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The persistence slot could not be read.
    ReadFailed {
        /// Description of the error.
        reason: String,
    },
    /// The stored payload could not be decoded.
    Corrupt {
        /// Description of the decode error.
        reason: String,
        /// Slot the raw payload was copied to, if the copy succeeded.
        backup_key: Option<String>,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed { reason } => {
                write!(f, "could not read saved tasks ({reason}); starting empty")
            }
            Self::Corrupt {
                reason,
                backup_key: Some(backup),
            } => write!(
                f,
                "saved tasks were unreadable ({reason}); copied to '{backup}' and starting empty"
            ),
            Self::Corrupt {
                reason,
                backup_key: None,
            } => write!(f, "saved tasks were unreadable ({reason}); starting empty"),
        }
    }
}

/// Completed vs. total task counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionSummary {
    /// Number of completed tasks.
    pub completed: usize,
    /// Number of tasks in the list.
    pub total: usize,
}

impl CompletionSummary {
    /// True when the list is non-empty and every task is completed.
    #[must_use]
    pub const fn is_all_done(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Owns the task collection and mirrors it to a persistence slot.
pub struct TaskListStore<P: PersistenceAdapter> {
    /// Tasks in insertion order.
    tasks: Vec<Task>,
    /// Text staged for creating a task or renaming the edit target.
    draft_name: String,
    /// Task currently being renamed.
    edit_target: Option<TaskId>,
    /// Task awaiting delete confirmation.
    delete_target: Option<TaskId>,
    /// Most recent validation failure, cleared on draft change or success.
    last_error: Option<ValidationError>,
    load_warning: Option<LoadWarning>,
    ids: IdGenerator,
    adapter: P,
    key: String,
}

impl<P: PersistenceAdapter> TaskListStore<P> {
    /// Creates a store backed by `adapter` under [`DEFAULT_STORAGE_KEY`].
    ///
    /// See [`with_key`](Self::with_key).
    pub fn new(adapter: P) -> Self {
        Self::with_key(adapter, DEFAULT_STORAGE_KEY)
    }

    /// Creates a store, loading the task list stored under `key`.
    ///
    /// A missing slot yields an empty list. A slot that cannot be read or
    /// decoded also yields an empty list; the problem is logged and kept in
    /// [`load_warning`](Self::load_warning), and an undecodable payload is
    /// copied to the first free backup slot (`<key>.corrupt`, then
    /// `<key>.corrupt-1`, ...) first so it is not lost on the next save.
    pub fn with_key(adapter: P, key: impl Into<String>) -> Self {
        let key = key.into();
        let (tasks, load_warning) = Self::load_tasks(&adapter, &key);
        let ids = IdGenerator::after(tasks.iter().map(|t| t.id).max());

        tracing::info!(key = %key, count = tasks.len(), "task list loaded");

        Self {
            tasks,
            draft_name: String::new(),
            edit_target: None,
            delete_target: None,
            last_error: None,
            load_warning,
            ids,
            adapter,
            key,
        }
    }

    fn load_tasks(adapter: &P, key: &str) -> (Vec<Task>, Option<LoadWarning>) {
        let payload = match adapter.load(key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return (Vec::new(), None),
            Err(PersistenceError::NotUtf8 { backup_key, .. }) => {
                tracing::warn!(key, backup = %backup_key, "stored task list is not UTF-8, starting empty");
                return (
                    Vec::new(),
                    Some(LoadWarning::Corrupt {
                        reason: "not valid UTF-8".to_string(),
                        backup_key: Some(backup_key),
                    }),
                );
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "could not read task list, starting empty");
                return (
                    Vec::new(),
                    Some(LoadWarning::ReadFailed {
                        reason: err.to_string(),
                    }),
                );
            }
        };

        match codec::decode(&payload) {
            Ok(tasks) => (tasks, None),
            Err(err) => {
                let backup_key = match Self::back_up(adapter, key, &payload) {
                    Ok(backup_key) => Some(backup_key),
                    Err(save_err) => {
                        tracing::warn!(
                            key,
                            error = %save_err,
                            "could not back up unreadable task list"
                        );
                        None
                    }
                };
                tracing::warn!(
                    key,
                    error = %err,
                    backup = backup_key.as_deref().unwrap_or("-"),
                    "stored task list is unreadable, starting empty"
                );
                (
                    Vec::new(),
                    Some(LoadWarning::Corrupt {
                        reason: err.to_string(),
                        backup_key,
                    }),
                )
            }
        }
    }

    /// Save `payload` under the first backup key for `key` that holds nothing.
    fn back_up(adapter: &P, key: &str, payload: &str) -> Result<String, PersistenceError> {
        for n in 0..MAX_BACKUPS {
            let candidate = backup_key(key, n);
            if !adapter.contains(&candidate)? {
                adapter.save(&candidate, payload)?;
                return Ok(candidate);
            }
        }
        Err(PersistenceError::Unavailable(format!(
            "all {MAX_BACKUPS} backup slots for {key:?} are taken"
        )))
    }

    // --- read access ---

    /// Tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Current draft text.
    #[must_use]
    pub fn draft_name(&self) -> &str {
        &self.draft_name
    }

    /// Most recent validation failure, if not yet cleared.
    #[must_use]
    pub const fn last_error(&self) -> Option<ValidationError> {
        self.last_error
    }

    /// Task currently being renamed.
    #[must_use]
    pub const fn pending_edit(&self) -> Option<TaskId> {
        self.edit_target
    }

    /// Task awaiting delete confirmation.
    #[must_use]
    pub const fn pending_delete(&self) -> Option<TaskId> {
        self.delete_target
    }

    /// Whether a rename is in progress.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.edit_target.is_some()
    }

    /// Whether a delete is waiting for confirmation.
    #[must_use]
    pub const fn is_confirming_delete(&self) -> bool {
        self.delete_target.is_some()
    }

    /// Problem encountered while loading at startup, if any.
    #[must_use]
    pub const fn load_warning(&self) -> Option<&LoadWarning> {
        self.load_warning.as_ref()
    }

    /// Completed vs. total counts.
    #[must_use]
    pub fn summary(&self) -> CompletionSummary {
        CompletionSummary {
            completed: self.tasks.iter().filter(|t| t.completed).count(),
            total: self.tasks.len(),
        }
    }

    /// Key of the persistence slot.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    // --- draft ---

    /// Replaces the draft text and clears the last error.
    pub fn set_draft_name(&mut self, text: impl Into<String>) {
        self.draft_name = text.into();
        self.last_error = None;
    }

    // --- create / toggle ---

    /// Creates a task named after the current draft and appends it.
    ///
    /// On success the draft and last error are cleared and the updated list
    /// is saved.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] (and records it as the last error)
    /// if the draft is empty or already used by a task. Returns a
    /// persistence or codec error if the updated list could not be saved, in
    /// which case nothing changes.
    pub fn add_task(&mut self) -> Result<TaskId, StoreError> {
        let name = self.draft_name.clone();
        self.check_name(&name, None)?;

        let id = self.ids.next_id().ok_or(StoreError::IdSpaceExhausted)?;
        let mut updated = self.tasks.clone();
        updated.push(Task::new(id, name));
        self.commit(updated)?;

        self.draft_name.clear();
        self.last_error = None;
        tracing::info!(task_id = %id, "task added");
        Ok(id)
    }

    /// Flips the completion flag of the task with `id`.
    ///
    /// Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns a persistence or codec error if the updated list could not be
    /// saved, in which case nothing changes.
    pub fn toggle_completion(&mut self, id: TaskId) -> Result<(), StoreError> {
        let Some(index) = self.position(id) else {
            tracing::debug!(task_id = %id, "toggle ignored, no such task");
            return Ok(());
        };

        let mut updated = self.tasks.clone();
        updated[index].completed = !updated[index].completed;
        let completed = updated[index].completed;
        self.commit(updated)?;

        self.last_error = None;
        tracing::info!(task_id = %id, completed, "task toggled");
        Ok(())
    }

    // --- edit flow ---

    /// Starts renaming the task with `id`, loading its name into the draft.
    ///
    /// Unknown ids are ignored.
    pub fn open_edit(&mut self, id: TaskId) {
        let Some(name) = self.task(id).map(|t| t.name.clone()) else {
            tracing::debug!(task_id = %id, "edit ignored, no such task");
            return;
        };
        self.edit_target = Some(id);
        self.set_draft_name(name);
    }

    /// Abandons the rename in progress, discarding the draft.
    pub fn close_edit(&mut self) {
        self.edit_target = None;
        self.set_draft_name(String::new());
    }

    /// Renames the edit target to the current draft.
    ///
    /// Does nothing when no rename is in progress. The target's own current
    /// name is allowed, so confirming an unchanged name succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] (and records it as the last error)
    /// if the draft is empty or used by a different task; the rename stays
    /// open so it can be retried. Returns a persistence or codec error if the
    /// updated list could not be saved.
    pub fn confirm_edit(&mut self) -> Result<(), StoreError> {
        let Some(target) = self.edit_target else {
            tracing::debug!("confirm_edit ignored, no edit in progress");
            return Ok(());
        };

        let name = self.draft_name.clone();
        self.check_name(&name, Some(target))?;

        let Some(index) = self.position(target) else {
            self.close_edit();
            return Ok(());
        };
        let mut updated = self.tasks.clone();
        updated[index].name = name;
        self.commit(updated)?;

        self.edit_target = None;
        self.draft_name.clear();
        self.last_error = None;
        tracing::info!(task_id = %target, "task renamed");
        Ok(())
    }

    // --- delete flow ---

    /// Selects the task with `id` for deletion, pending confirmation.
    pub const fn open_confirm_delete(&mut self, id: TaskId) {
        self.delete_target = Some(id);
    }

    /// Cancels the pending deletion.
    pub const fn close_confirm_delete(&mut self) {
        self.delete_target = None;
    }

    /// Deletes the task selected by [`open_confirm_delete`](Self::open_confirm_delete).
    ///
    /// Does nothing when no deletion is pending. If the selected task no
    /// longer exists the selection is simply cleared.
    ///
    /// # Errors
    ///
    /// Returns a persistence or codec error if the updated list could not be
    /// saved; the selection is kept so the deletion can be retried.
    pub fn confirm_delete(&mut self) -> Result<(), StoreError> {
        let Some(target) = self.delete_target else {
            tracing::debug!("confirm_delete ignored, nothing selected");
            return Ok(());
        };
        self.remove_task(target)?;
        self.delete_target = None;
        Ok(())
    }

    /// Deletes the task with `id` without going through the confirmation
    /// selection, for callers that confirm on their own.
    ///
    /// A pending delete or edit of the same task is cleared.
    ///
    /// # Errors
    ///
    /// Returns a persistence or codec error if the updated list could not be
    /// saved, in which case nothing changes.
    pub fn delete_task_immediate(&mut self, id: TaskId) -> Result<(), StoreError> {
        self.remove_task(id)?;
        if self.delete_target == Some(id) {
            self.delete_target = None;
        }
        Ok(())
    }

    // --- internals ---

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Checks `name` against the list; `exempt` is the task being renamed,
    /// whose own name does not count as a duplicate. `None` means create.
    fn validate_name(&self, name: &str, exempt: Option<TaskId>) -> Result<(), ValidationError> {
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self
            .tasks
            .iter()
            .any(|t| t.name == name && Some(t.id) != exempt)
        {
            return Err(ValidationError::DuplicateName);
        }
        Ok(())
    }

    /// Like [`validate_name`](Self::validate_name), recording a failure as
    /// the last error.
    fn check_name(&mut self, name: &str, exempt: Option<TaskId>) -> Result<(), StoreError> {
        self.validate_name(name, exempt).map_err(|err| {
            tracing::debug!(error = %err, "name rejected");
            self.last_error = Some(err);
            StoreError::from(err)
        })
    }

    fn remove_task(&mut self, id: TaskId) -> Result<(), StoreError> {
        if self.position(id).is_none() {
            tracing::debug!(task_id = %id, "delete ignored, no such task");
            return Ok(());
        }

        let updated = self.tasks.iter().filter(|t| t.id != id).cloned().collect();
        self.commit(updated)?;

        if self.edit_target == Some(id) {
            self.close_edit();
        }
        self.last_error = None;
        tracing::info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Saves `updated` as the whole list, then makes it the in-memory list.
    fn commit(&mut self, updated: Vec<Task>) -> Result<(), StoreError> {
        let payload = codec::encode(&updated)?;
        if let Err(err) = self.adapter.save(&self.key, &payload) {
            tracing::warn!(key = %self.key, error = %err, "task list save failed");
            return Err(err.into());
        }
        self.tasks = updated;
        Ok(())
    }
}
