//! Application state and key handling for the terminal front end.
//!
//! `App` wraps a [`TaskListStore`] and translates key presses into store
//! operations. It keeps only view state (focus, selection, notices); the
//! task list itself is always read from the store.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use todolist_proto::task::TaskId;

use crate::persistence::PersistenceAdapter;
use crate::tasks::{StoreError, TaskListStore};

/// Which panel receives key presses when no dialog is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The new-task input box (default).
    Input,
    /// The task list.
    List,
}

/// Which dialog, if any, is on top of the main view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    /// Renaming a task.
    Edit,
    /// Confirming a deletion.
    ConfirmDelete,
}

/// Main application state.
pub struct App<P: PersistenceAdapter> {
    /// The task store driven by this UI.
    pub store: TaskListStore<P>,
    /// Which panel is focused.
    pub focus: Focus,
    /// Selected row in the task list.
    pub selected: usize,
    /// Problem found while loading at startup; stays until dismissed.
    pub load_notice: Option<String>,
    /// Notice from the last failed store operation.
    pub notice: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl<P: PersistenceAdapter> App<P> {
    /// Create the app around a loaded store.
    ///
    /// A startup load warning becomes the load notice.
    #[must_use]
    pub fn new(store: TaskListStore<P>) -> Self {
        let load_notice = store.load_warning().map(ToString::to_string);
        Self {
            store,
            focus: Focus::Input,
            selected: 0,
            load_notice,
            notice: None,
            should_quit: false,
        }
    }

    /// The dialog currently open, if any.
    #[must_use]
    pub const fn dialog(&self) -> Option<Dialog> {
        if self.store.is_confirming_delete() {
            Some(Dialog::ConfirmDelete)
        } else if self.store.is_editing() {
            Some(Dialog::Edit)
        } else {
            None
        }
    }

    /// Id of the task under the list cursor.
    #[must_use]
    pub fn selected_id(&self) -> Option<TaskId> {
        self.store.tasks().get(self.selected).map(|t| t.id)
    }

    /// Handle a key event.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.dialog() {
            Some(Dialog::ConfirmDelete) => self.handle_confirm_key(key),
            Some(Dialog::Edit) => self.handle_edit_key(key),
            None => match key.code {
                KeyCode::Esc => self.should_quit = true,
                KeyCode::Tab | KeyCode::BackTab => self.toggle_focus(),
                _ => match self.focus {
                    Focus::Input => self.handle_input_key(key),
                    Focus::List => self.handle_list_key(key),
                },
            },
        }
    }

    /// Handle key event when the input box is focused.
    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let result = self.store.add_task();
                if self.report(result).is_some() {
                    self.selected = self.store.tasks().len().saturating_sub(1);
                }
            }
            KeyCode::Char(c) => self.push_draft_char(c),
            KeyCode::Backspace => self.pop_draft_char(),
            _ => {}
        }
    }

    /// Handle key event when the task list is focused.
    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    let result = self.store.toggle_completion(id);
                    self.report(result);
                }
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    self.store.open_edit(id);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.store.open_confirm_delete(id);
                }
            }
            KeyCode::Char('x') => self.load_notice = None,
            _ => {}
        }
    }

    /// Handle key event while the rename dialog is open.
    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let result = self.store.confirm_edit();
                self.report(result);
            }
            KeyCode::Esc => self.store.close_edit(),
            KeyCode::Char(c) => self.push_draft_char(c),
            KeyCode::Backspace => self.pop_draft_char(),
            _ => {}
        }
    }

    /// Handle key event while the delete confirmation is open.
    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
                let result = self.store.confirm_delete();
                if self.report(result).is_some() {
                    self.clamp_selection();
                }
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => self.store.close_confirm_delete(),
            _ => {}
        }
    }

    /// Surface a store result to the user.
    ///
    /// Validation failures are already recorded by the store and shown
    /// next to the input; storage failures become the status bar notice
    /// until the next successful operation. The load notice is left alone.
    fn report<T>(&mut self, result: Result<T, StoreError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.notice = None;
                Some(value)
            }
            Err(StoreError::Validation(_)) => None,
            Err(err) => {
                tracing::error!(error = %err, "store operation failed");
                self.notice = Some(err.to_string());
                None
            }
        }
    }

    fn push_draft_char(&mut self, c: char) {
        let mut draft = self.store.draft_name().to_string();
        draft.push(c);
        self.store.set_draft_name(draft);
    }

    fn pop_draft_char(&mut self) {
        let mut draft = self.store.draft_name().to_string();
        if draft.pop().is_some() {
            self.store.set_draft_name(draft);
        }
    }

    const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::List,
            Focus::List => Focus::Input,
        };
    }

    const fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.store.tasks().len() {
            self.selected += 1;
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = self
            .selected
            .min(self.store.tasks().len().saturating_sub(1));
    }
}
