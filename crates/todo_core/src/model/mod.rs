//! Todo domain model.
//!
//! # Responsibility
//! - Define the todo record, its priority levels and validation rules.
//! - Allocate process-unique identifiers.
//!
//! # Invariants
//! - Every todo is identified by a `TodoId` that is never reused.
//! - Only items passing `TodoItem::validate()` are admitted to a collection.

pub mod id;
pub mod todo;
