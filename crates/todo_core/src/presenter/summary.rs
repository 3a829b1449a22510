//! Display helpers for rendered todo lists.

use crate::model::todo::{Priority, TodoId, TodoItem};
use chrono::NaiveDate;

/// Placeholder shown instead of the list when there are no items.
pub const EMPTY_STATE_MESSAGE: &str = "No todos yet! Add your first todo item above.";
pub const ADDED_MESSAGE: &str = "Todo added successfully!";
pub const UPDATED_MESSAGE: &str = "Todo updated successfully!";
pub const DELETED_MESSAGE: &str = "Todo deleted successfully!";

/// Kind of a transient inline message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Counter text. Singular only for exactly one item.
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 todo item".to_string()
    } else {
        format!("{count} todo items")
    }
}

/// Question asked before a delete is applied.
pub fn delete_confirmation_prompt(name: &str) -> String {
    format!("Are you sure you want to delete \"{name}\"?\n\nThis action cannot be undone.")
}

/// `YYYY-MM-DD` -> `Dec 31, 2025`. Unparseable input is returned as-is.
pub fn format_due_date(due_date: &str) -> String {
    match NaiveDate::parse_from_str(due_date.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => due_date.to_string(),
    }
}

/// One rendered row of the todo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoSummary {
    pub id: TodoId,
    pub name: String,
    /// e.g. `High Priority`.
    pub priority_label: String,
    /// e.g. `priority-high`.
    pub priority_class: String,
    /// e.g. `Dec 31, 2025`.
    pub due_date: String,
}

impl TodoSummary {
    pub fn from_item(item: &TodoItem) -> Self {
        let (label, class) = match item.priority_level() {
            Some(level) => (level.label().to_string(), level.css_class()),
            None => (capitalize(&item.priority), format!("priority-{}", item.priority)),
        };
        Self {
            id: item.id(),
            name: item.name.clone(),
            priority_label: format!("{label} Priority"),
            priority_class: class,
            due_date: format_due_date(&item.due_date),
        }
    }
}

/// Summaries for a whole snapshot, in display order.
pub fn summarize(todos: &[TodoItem]) -> Vec<TodoSummary> {
    todos.iter().map(TodoSummary::from_item).collect()
}

/// Choices offered by priority pickers, in display order.
pub fn priority_options() -> [(Priority, &'static str); 3] {
    Priority::ALL.map(|level| (level, level.label()))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{capitalize, format_due_date, priority_options};
    use crate::model::todo::Priority;

    #[test]
    fn due_date_formats_without_padding() {
        assert_eq!(format_due_date("2025-12-31"), "Dec 31, 2025");
        assert_eq!(format_due_date("2026-03-05"), "Mar 5, 2026");
        assert_eq!(format_due_date("soon"), "soon");
    }

    #[test]
    fn capitalize_handles_empty_and_unicode() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("élan"), "Élan");
    }

    #[test]
    fn priority_options_follow_form_order() {
        let options = priority_options();
        assert_eq!(options[0], (Priority::High, "High"));
        assert_eq!(options[2], (Priority::Low, "Low"));
    }
}
