//! Todo item domain model.
//!
//! # Responsibility
//! - Define the canonical todo record and its persisted wire shape.
//! - Build new items (`TodoItem::create`) and check them (`validate`).
//! - Merge partial edits (`TodoPatch`) without touching identity fields.
//!
//! # Invariants
//! - `id` and `created_at` are assigned once and never rewritten.
//! - Construction never rejects field values; validity is a separate,
//!   explicit check. The only construction failure is an exhausted id space.
//! - `created_at` carries millisecond precision, the resolution of the
//!   persisted form.
//! - Validation short-circuits on the first failing rule, in the order
//!   name -> priority -> due date.

use crate::model::id::{next_todo_id, IdsExhausted};
use chrono::{DateTime, Local, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Stable numeric identifier of a todo item.
///
/// Serialized as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for TodoId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allowed priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    /// Preselected value of the add form.
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Wire value (`high|medium|low`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Capitalized display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Style hook used by list renderers.
    pub fn css_class(self) -> String {
        format!("priority-{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TodoValidationError;

    /// Exact, case-sensitive match against the wire values.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(TodoValidationError::InvalidPriority),
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failure for a todo item. `Display` is the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoValidationError {
    MissingName,
    InvalidPriority,
    MissingDueDate,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => f.write_str("Todo name is required"),
            Self::InvalidPriority => f.write_str("Priority must be high, medium, or low"),
            Self::MissingDueDate => f.write_str("Due date is required"),
        }
    }
}

impl Error for TodoValidationError {}

/// One user task.
///
/// `priority` and `due_date` hold the raw submitted text so that any form
/// input can be represented; `validate()` decides whether it is admissible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    id: TodoId,
    pub name: String,
    /// One of `high|medium|low` once validated.
    pub priority: String,
    /// Calendar date in `YYYY-MM-DD` form. Presence is required, range is not.
    pub due_date: String,
    /// Advisory only; list order is insertion order.
    #[serde(with = "iso_millis")]
    created_at: DateTime<Utc>,
}

impl TodoItem {
    /// Builds a new item with a fresh id and creation stamp.
    ///
    /// # Invariants
    /// - `name` is trimmed.
    /// - No validation happens here; call `validate()` before admitting it.
    ///
    /// # Errors
    /// - `IdsExhausted` when the process-wide allocator has no id left.
    pub fn create(
        name: impl AsRef<str>,
        priority: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Result<Self, IdsExhausted> {
        Ok(Self::from_parts(
            TodoId(next_todo_id()?),
            name.as_ref().trim(),
            priority,
            due_date,
            Utc::now(),
        ))
    }

    /// Rebuilds an item from already-known parts (import paths and tests).
    ///
    /// Performs no trimming and no validation. `created_at` is truncated to
    /// milliseconds.
    pub fn from_parts(
        id: TodoId,
        name: impl Into<String>,
        priority: impl Into<String>,
        due_date: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            priority: priority.into(),
            due_date: due_date.into(),
            created_at: created_at.trunc_subsecs(3),
        }
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Typed priority, or `None` when the raw value is not an allowed level.
    pub fn priority_level(&self) -> Option<Priority> {
        self.priority.parse().ok()
    }

    /// Checks the item against the admission rules.
    ///
    /// # Errors
    /// - `MissingName` when the name is empty or whitespace-only.
    /// - `InvalidPriority` when priority is not `high|medium|low`.
    /// - `MissingDueDate` when the due date is empty. Any other text,
    ///   whitespace included, counts as present.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.name.trim().is_empty() {
            return Err(TodoValidationError::MissingName);
        }
        self.priority.parse::<Priority>()?;
        if self.due_date.is_empty() {
            return Err(TodoValidationError::MissingDueDate);
        }
        Ok(())
    }
}

/// Partial edit of a todo item. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub name: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.priority.is_none() && self.due_date.is_none()
    }

    /// Returns `item` with this patch merged in.
    ///
    /// A provided name is trimmed; `id` and `created_at` are carried over.
    pub fn apply_to(&self, item: &TodoItem) -> TodoItem {
        let mut merged = item.clone();
        if let Some(name) = &self.name {
            merged.name = name.trim().to_string();
        }
        if let Some(priority) = &self.priority {
            merged.priority = priority.clone();
        }
        if let Some(due_date) = &self.due_date {
            merged.due_date = due_date.clone();
        }
        merged
    }
}

/// Today's local date as `YYYY-MM-DD`, the default due date for new items.
pub fn current_date() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|value| value.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{current_date, Priority, TodoId, TodoItem, TodoPatch, TodoValidationError};
    use chrono::{TimeZone, Timelike, Utc};

    #[test]
    fn priority_parse_is_exact() {
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(
            "High".parse::<Priority>(),
            Err(TodoValidationError::InvalidPriority)
        );
        assert_eq!(
            " low".parse::<Priority>(),
            Err(TodoValidationError::InvalidPriority)
        );
    }

    #[test]
    fn priority_presentation_helpers() {
        assert_eq!(Priority::Medium.label(), "Medium");
        assert_eq!(Priority::Low.css_class(), "priority-low");
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn patch_keeps_identity_and_trims_name() {
        let item = TodoItem::create("Read book", "low", "2025-01-01").unwrap();
        let patch = TodoPatch {
            name: Some("  Read two books ".to_string()),
            ..TodoPatch::default()
        };

        let merged = patch.apply_to(&item);
        assert_eq!(merged.id(), item.id());
        assert_eq!(merged.created_at(), item.created_at());
        assert_eq!(merged.name, "Read two books");
        assert_eq!(merged.priority, "low");
        assert!(!patch.is_empty());
        assert!(TodoPatch::default().is_empty());
    }

    #[test]
    fn from_parts_keeps_millisecond_precision() {
        let stamp = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap()
            + chrono::Duration::nanoseconds(965_378_768);

        let item = TodoItem::from_parts(TodoId::from(3), "task", "low", "2025-01-01", stamp);
        assert_eq!(item.created_at().nanosecond(), 965_000_000);
    }

    #[test]
    fn whitespace_due_date_counts_as_present() {
        let item = TodoItem::from_parts(TodoId::from(4), "task", "low", "  ", Utc::now());
        assert_eq!(item.validate(), Ok(()));

        let empty = TodoItem::from_parts(TodoId::from(5), "task", "low", "", Utc::now());
        assert_eq!(empty.validate(), Err(TodoValidationError::MissingDueDate));
    }

    #[test]
    fn current_date_has_iso_shape() {
        let today = current_date();
        assert_eq!(today.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&today, "%Y-%m-%d").is_ok());
    }
}
