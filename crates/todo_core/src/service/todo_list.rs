//! Todo collection manager.
//!
//! # Responsibility
//! - Hold the ordered todo list for the session.
//! - Apply add/update/remove intents and persist after every mutation.
//!
//! # Invariants
//! - Insertion order is display order; updates keep an item's position.
//! - Items are addressed by id only, never by index or name.
//! - A rejected operation leaves both memory and storage untouched.
//! - Persistence failures never undo an in-memory mutation.

use crate::model::id::{reserve_ids_through, IdsExhausted};
use crate::model::todo::{TodoId, TodoItem, TodoPatch, TodoValidationError};
use crate::storage::kv::KeyValueStore;
use crate::storage::todo_storage::TodoStorage;
use crate::storage::StorageResult;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TodoResult<T> = Result<T, TodoError>;

/// Rejected collection operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    Validation(TodoValidationError),
    NotFound(TodoId),
    /// The id allocator cannot hand out a fresh id.
    IdsExhausted,
}

impl Display for TodoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::IdsExhausted => write!(f, "{IdsExhausted}"),
        }
    }
}

impl Error for TodoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::IdsExhausted => None,
        }
    }
}

impl From<TodoValidationError> for TodoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<IdsExhausted> for TodoError {
    fn from(_: IdsExhausted) -> Self {
        Self::IdsExhausted
    }
}

/// Session-scoped owner of the todo collection.
pub struct TodoList<S: KeyValueStore> {
    storage: TodoStorage<S>,
    todos: Vec<TodoItem>,
    last_persist_error: Option<String>,
}

impl<S: KeyValueStore> TodoList<S> {
    /// Creates an empty manager. Call `initialize` to load stored items.
    pub fn new(storage: TodoStorage<S>) -> Self {
        Self {
            storage,
            todos: Vec::new(),
            last_persist_error: None,
        }
    }

    /// Replaces the in-memory list with the stored one.
    ///
    /// Also moves the id allocator past every loaded id.
    pub fn initialize(&mut self) -> &[TodoItem] {
        self.todos = self.storage.load();
        if let Some(max_id) = self.todos.iter().map(|item| item.id().value()).max() {
            reserve_ids_through(max_id);
        }
        info!(
            "event=todo_list_init module=service status=ok count={}",
            self.todos.len()
        );
        &self.todos
    }

    /// Creates, validates and appends a new item.
    ///
    /// # Errors
    /// - `Validation` with the first failing rule; nothing is stored.
    /// - `IdsExhausted` when no fresh id is left; nothing is stored.
    pub fn add(
        &mut self,
        name: impl AsRef<str>,
        priority: impl Into<String>,
        due_date: impl Into<String>,
    ) -> TodoResult<TodoItem> {
        let item = TodoItem::create(name, priority, due_date).map_err(|err| {
            warn!("event=todo_add module=service status=rejected reason={err}");
            TodoError::from(err)
        })?;
        if let Err(err) = item.validate() {
            warn!("event=todo_add module=service status=rejected reason={err:?}");
            return Err(err.into());
        }

        self.todos.push(item.clone());
        self.persist();
        info!(
            "event=todo_add module=service status=ok id={} count={}",
            item.id(),
            self.todos.len()
        );
        Ok(item)
    }

    /// Merges `patch` into the item with `id` and replaces it in place.
    ///
    /// # Errors
    /// - `NotFound` when no item has `id`.
    /// - `Validation` when the merged item is invalid; state is unchanged.
    pub fn update(&mut self, id: TodoId, patch: &TodoPatch) -> TodoResult<TodoItem> {
        let index = self.position(id)?;
        let updated = patch.apply_to(&self.todos[index]);
        if let Err(err) = updated.validate() {
            warn!("event=todo_update module=service status=rejected id={id} reason={err:?}");
            return Err(err.into());
        }

        self.todos[index] = updated.clone();
        self.persist();
        info!("event=todo_update module=service status=ok id={id}");
        Ok(updated)
    }

    /// Removes the item with `id`, preserving the order of the rest.
    ///
    /// # Errors
    /// - `NotFound` when no item has `id`.
    pub fn remove(&mut self, id: TodoId) -> TodoResult<TodoItem> {
        let index = self.position(id)?;
        let removed = self.todos.remove(index);
        self.persist();
        info!(
            "event=todo_remove module=service status=ok id={id} count={}",
            self.todos.len()
        );
        Ok(removed)
    }

    /// Drops every item from memory and storage.
    pub fn reset(&mut self) -> StorageResult<()> {
        self.todos.clear();
        self.storage.clear()
    }

    pub fn count(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Current snapshot in display order.
    pub fn items(&self) -> &[TodoItem] {
        &self.todos
    }

    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|item| item.id() == id)
    }

    /// Message of the most recent failed write, cleared by the next success.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    pub fn storage(&self) -> &TodoStorage<S> {
        &self.storage
    }

    fn position(&self, id: TodoId) -> TodoResult<usize> {
        self.todos
            .iter()
            .position(|item| item.id() == id)
            .ok_or(TodoError::NotFound(id))
    }

    fn persist(&mut self) {
        // In-memory state stays authoritative when the write fails.
        match self.storage.save(&self.todos) {
            Ok(()) => self.last_persist_error = None,
            Err(err) => self.last_persist_error = Some(err.to_string()),
        }
    }
}
