//! Intent coordination between a UI and the todo collection.
//!
//! # Responsibility
//! - Turn add/edit/delete intents into `TodoList` calls.
//! - Block on a single dialog decision before edits and deletes.
//! - Re-render on every applied change; report everything else inline.
//!
//! # Invariants
//! - Cancelled dialogs produce no mutation and no storage write.
//! - No outcome is fatal; the view always ends in a rendered state.

use crate::model::todo::{TodoId, TodoItem, TodoPatch};
use crate::presenter::summary::{
    delete_confirmation_prompt, MessageKind, ADDED_MESSAGE, DELETED_MESSAGE, UPDATED_MESSAGE,
};
use crate::service::todo_list::{TodoError, TodoList};
use crate::storage::kv::KeyValueStore;
use log::{debug, info};

/// Rendering side of the presentation boundary.
pub trait TodoView {
    /// Redraws the full list and counter from a snapshot.
    fn render(&mut self, todos: &[TodoItem]);
    /// Shows a transient inline message.
    fn show_message(&mut self, message: &str, kind: MessageKind);
}

/// Modal decisions requested from the user. Both calls block until decided.
pub trait TodoDialogs {
    /// Returns the edited fields, or `None` when the user cancels.
    fn edit(&mut self, item: &TodoItem) -> Option<TodoPatch>;
    /// Returns `true` only when the user confirms deleting `name`.
    fn confirm_delete(&mut self, prompt: &str) -> bool;
}

/// Result of one user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    Applied(TodoItem),
    Cancelled,
    Rejected(TodoError),
}

/// Wires a `TodoList` to a view and dialog provider.
pub struct TodoController<S: KeyValueStore, V: TodoView, D: TodoDialogs> {
    list: TodoList<S>,
    view: V,
    dialogs: D,
}

impl<S: KeyValueStore, V: TodoView, D: TodoDialogs> TodoController<S, V, D> {
    pub fn new(list: TodoList<S>, view: V, dialogs: D) -> Self {
        Self {
            list,
            view,
            dialogs,
        }
    }

    /// Loads stored items and draws the initial list.
    pub fn start(&mut self) {
        self.list.initialize();
        self.view.render(self.list.items());
        info!(
            "event=controller_start module=presenter status=ok count={}",
            self.list.count()
        );
    }

    /// Handles the add form submission.
    pub fn submit_new(&mut self, name: &str, priority: &str, due_date: &str) -> IntentOutcome {
        match self.list.add(name, priority, due_date) {
            Ok(item) => self.applied(item, ADDED_MESSAGE),
            Err(err) => self.rejected(err),
        }
    }

    /// Opens the edit dialog for `id` and applies the submitted fields.
    pub fn request_edit(&mut self, id: TodoId) -> IntentOutcome {
        let Some(current) = self.list.get(id).cloned() else {
            return self.rejected(TodoError::NotFound(id));
        };

        let Some(patch) = self.dialogs.edit(&current) else {
            debug!("event=todo_edit module=presenter status=cancelled id={id}");
            return IntentOutcome::Cancelled;
        };

        match self.list.update(id, &patch) {
            Ok(item) => self.applied(item, UPDATED_MESSAGE),
            Err(err) => self.rejected(err),
        }
    }

    /// Asks for confirmation and removes `id` when confirmed.
    pub fn request_delete(&mut self, id: TodoId) -> IntentOutcome {
        let Some(current) = self.list.get(id) else {
            return self.rejected(TodoError::NotFound(id));
        };

        let prompt = delete_confirmation_prompt(&current.name);
        if !self.dialogs.confirm_delete(&prompt) {
            debug!("event=todo_delete module=presenter status=cancelled id={id}");
            return IntentOutcome::Cancelled;
        }

        match self.list.remove(id) {
            Ok(item) => self.applied(item, DELETED_MESSAGE),
            Err(err) => self.rejected(err),
        }
    }

    pub fn list(&self) -> &TodoList<S> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut TodoList<S> {
        &mut self.list
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_parts(self) -> (TodoList<S>, V, D) {
        (self.list, self.view, self.dialogs)
    }

    fn applied(&mut self, item: TodoItem, message: &str) -> IntentOutcome {
        self.view.render(self.list.items());
        self.view.show_message(message, MessageKind::Success);
        if let Some(err) = self.list.last_persist_error() {
            let warning = format!("Changes could not be saved: {err}");
            self.view.show_message(&warning, MessageKind::Error);
        }
        IntentOutcome::Applied(item)
    }

    fn rejected(&mut self, err: TodoError) -> IntentOutcome {
        self.view.show_message(&err.to_string(), MessageKind::Error);
        IntentOutcome::Rejected(err)
    }
}
