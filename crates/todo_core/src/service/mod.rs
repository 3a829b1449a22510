//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory todo collection and its mutation rules.
//! - Keep presentation layers decoupled from storage details.

pub mod todo_list;
