//! Core domain logic for the simple todo app.
//! This crate is the single source of truth for todo invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod presenter;
pub mod service;
pub mod storage;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::id::{next_todo_id, IdsExhausted};
pub use model::todo::{current_date, Priority, TodoId, TodoItem, TodoPatch, TodoValidationError};
pub use presenter::controller::{IntentOutcome, TodoController, TodoDialogs, TodoView};
pub use presenter::summary::{
    count_label, delete_confirmation_prompt, format_due_date, priority_options, summarize,
    MessageKind, TodoSummary, EMPTY_STATE_MESSAGE,
};
pub use service::todo_list::{TodoError, TodoList, TodoResult};
pub use storage::kv::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use storage::todo_storage::{TodoStorage, STORAGE_KEY};
pub use storage::{StorageError, StorageResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
