//! Todo collection persistence adapter.
//!
//! # Responsibility
//! - Serialize the full ordered todo list to one fixed key and read it back.
//! - Turn unreadable persisted state into an empty list plus a log event.
//!
//! # Invariants
//! - `save` always writes the whole collection; there is no diffing.
//! - `load` never fails: absent -> empty, corrupted -> empty.
//! - A stored list is accepted only if every item validates and all ids are
//!   unique; otherwise it is discarded wholesale.

use crate::model::todo::TodoItem;
use crate::storage::kv::KeyValueStore;
use crate::storage::{StorageError, StorageResult};
use log::{error, info};
use std::collections::HashSet;

/// Storage key holding the serialized todo array.
pub const STORAGE_KEY: &str = "simple-todo-app-todos";

/// Reads and writes the todo collection through a `KeyValueStore`.
pub struct TodoStorage<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TodoStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Overwrites the stored collection with `todos`.
    ///
    /// # Errors
    /// - `Serialize` / `Db` on failure. The failure is also logged; callers
    ///   keep their in-memory state either way.
    pub fn save(&self, todos: &[TodoItem]) -> StorageResult<()> {
        let result = serde_json::to_string(todos)
            .map_err(StorageError::Serialize)
            .and_then(|json| self.store.set_item(STORAGE_KEY, &json));

        match &result {
            Ok(()) => info!(
                "event=todos_save module=storage status=ok count={}",
                todos.len()
            ),
            Err(err) => error!(
                "event=todos_save module=storage status=error count={} error={}",
                todos.len(),
                err
            ),
        }
        result
    }

    /// Loads the stored collection, falling back to an empty list.
    pub fn load(&self) -> Vec<TodoItem> {
        match self.try_load() {
            Ok(todos) => {
                info!(
                    "event=todos_load module=storage status=ok count={}",
                    todos.len()
                );
                todos
            }
            Err(err) => {
                error!("event=todos_load module=storage status=error error={err}");
                Vec::new()
            }
        }
    }

    /// Same read as `load`, with the failure surfaced.
    ///
    /// # Errors
    /// - `Db` when the underlying store cannot be read.
    /// - `Corrupted` when the blob is not a valid todo array.
    pub fn try_load(&self) -> StorageResult<Vec<TodoItem>> {
        let raw = match self.store.get_item(STORAGE_KEY)? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(Vec::new()),
        };

        let todos: Vec<TodoItem> = serde_json::from_str(&raw)
            .map_err(|err| StorageError::Corrupted(format!("unexpected shape: {err}")))?;
        check_collection(&todos)?;
        Ok(todos)
    }

    /// Removes the stored collection entirely.
    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove_item(STORAGE_KEY)?;
        info!("event=todos_clear module=storage status=ok");
        Ok(())
    }
}

fn check_collection(todos: &[TodoItem]) -> StorageResult<()> {
    let mut seen = HashSet::with_capacity(todos.len());
    for item in todos {
        item.validate().map_err(|err| {
            StorageError::Corrupted(format!("item {} is invalid: {err}", item.id()))
        })?;
        if !seen.insert(item.id()) {
            return Err(StorageError::Corrupted(format!(
                "duplicate id {}",
                item.id()
            )));
        }
    }
    Ok(())
}
