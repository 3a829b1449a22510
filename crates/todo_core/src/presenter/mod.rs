//! Presentation boundary contract.
//!
//! # Responsibility
//! - Derive display-ready summaries and labels from todo items.
//! - Define the view/dialog capabilities a UI must provide.
//! - Coordinate user intents between a UI and the `TodoList`.
//!
//! # Invariants
//! - Core logic never touches a concrete UI; UIs implement `TodoView` and
//!   `TodoDialogs`.
//! - A cancelled dialog causes no state change and no storage write.

pub mod controller;
pub mod summary;
