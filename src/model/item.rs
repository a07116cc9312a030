//! To-do item types
//!
//! `TodoItem` mirrors what the item service reports. The due date is kept as the
//! raw string the service sent (`YYYY-MM-DD` or an RFC 3339 date-time) and parsed
//! on demand through [`Due`].

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Unique item identifier assigned by the item service
pub type Uid = String;

/// Completion status of an item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TodoItemStatus {
    #[default]
    NeedsAction,
    Completed,
}

impl TodoItemStatus {
    /// The opposite status (used by the checkbox toggle)
    pub fn toggled(self) -> Self {
        match self {
            TodoItemStatus::NeedsAction => TodoItemStatus::Completed,
            TodoItemStatus::Completed => TodoItemStatus::NeedsAction,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoItemStatus::NeedsAction => "needs_action",
            TodoItemStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "needs_action" => Some(TodoItemStatus::NeedsAction),
            "completed" => Some(TodoItemStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TodoItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single to-do item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    pub uid: Uid,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339 date-time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(default)]
    pub status: TodoItemStatus,
    /// Uid of the parent item (one level of nesting)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Uid>,
}

impl TodoItem {
    /// Create an open item without due date or parent
    pub fn new(uid: impl Into<Uid>, summary: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            summary: summary.into(),
            description: None,
            due: None,
            status: TodoItemStatus::NeedsAction,
            parent: None,
        }
    }

    /// Builder: set description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set due date string
    pub fn due(mut self, due: impl Into<String>) -> Self {
        self.due = Some(due.into());
        self
    }

    /// Builder: set status
    pub fn status(mut self, status: TodoItemStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder: set parent uid
    pub fn parent(mut self, parent: impl Into<Uid>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == TodoItemStatus::Completed
    }

    pub fn is_child(&self) -> bool {
        self.parent.is_some()
    }

    /// Parsed due date, `None` if absent or unparseable
    pub fn parsed_due(&self) -> Option<Due> {
        self.due.as_deref().and_then(Due::parse)
    }

    /// Chronological sort key in milliseconds
    pub fn due_timestamp(&self) -> Option<i64> {
        self.parsed_due().map(|due| due.timestamp_millis())
    }

    /// Relation of the due date to `now`, in `now`'s time zone
    pub fn due_state<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DueState> {
        self.parsed_due().map(|due| due.state_at(now))
    }
}

/// A parsed due date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Due {
    /// All-day due date
    Date(NaiveDate),
    /// Due at a specific instant
    DateTime(DateTime<FixedOffset>),
}

impl Due {
    /// Parse `YYYY-MM-DD`, RFC 3339, or a date-time without offset (taken as UTC)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.contains('T') {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(Due::DateTime(dt));
            }
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
                .ok()
                .map(|naive| Due::DateTime(Utc.from_utc_datetime(&naive).fixed_offset()))
        } else {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Due::Date)
        }
    }

    /// Milliseconds since the epoch; all-day dates count from midnight UTC
    pub fn timestamp_millis(&self) -> i64 {
        match self {
            Due::Date(date) => date
                .and_hms_opt(0, 0, 0)
                .map(|naive| Utc.from_utc_datetime(&naive).timestamp_millis())
                .unwrap_or_default(),
            Due::DateTime(dt) => dt.timestamp_millis(),
        }
    }

    /// All-day dates are due at the end of their day in `now`'s time zone
    pub fn state_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DueState {
        match self {
            Due::Date(date) => {
                let today = now.date_naive();
                if *date == today {
                    DueState::Today
                } else if *date < today {
                    DueState::Overdue
                } else {
                    DueState::Upcoming
                }
            }
            Due::DateTime(dt) => {
                if dt.timestamp_millis() < now.timestamp_millis() {
                    DueState::Overdue
                } else {
                    DueState::Upcoming
                }
            }
        }
    }
}

/// How a due date relates to the current time
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DueState {
    Overdue,
    Today,
    Upcoming,
}

/// Payload for creating an item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NewTodoItem {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Uid>,
}

impl NewTodoItem {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Default::default()
        }
    }

    /// Copy the content of an existing item (not its uid, status or parent)
    pub fn copy_of(item: &TodoItem) -> Self {
        Self {
            summary: item.summary.clone(),
            description: item.description.clone(),
            due: item.due.clone(),
            parent: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn due(mut self, due: impl Into<String>) -> Self {
        self.due = Some(due.into());
        self
    }

    pub fn parent(mut self, parent: impl Into<Uid>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Materialize into an item with the given uid
    pub fn into_item(self, uid: impl Into<Uid>) -> TodoItem {
        TodoItem {
            uid: uid.into(),
            summary: self.summary,
            description: self.description,
            due: self.due,
            status: TodoItemStatus::NeedsAction,
            parent: self.parent,
        }
    }
}

/// Payload for updating an item; `None` fields are left unchanged.
///
/// An empty `description` or `due` clears that field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemUpdate {
    pub uid: Uid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TodoItemStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
}

impl ItemUpdate {
    pub fn new(uid: impl Into<Uid>) -> Self {
        Self {
            uid: uid.into(),
            summary: None,
            status: None,
            description: None,
            due: None,
        }
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn status(mut self, status: TodoItemStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn due(mut self, due: impl Into<String>) -> Self {
        self.due = Some(due.into());
        self
    }

    /// Apply this update to an item in place
    pub fn apply_to(&self, item: &mut TodoItem) {
        if let Some(summary) = &self.summary {
            item.summary = summary.clone();
        }
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(description) = &self.description {
            item.description = non_empty(description);
        }
        if let Some(due) = &self.due {
            item.due = non_empty(due);
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
