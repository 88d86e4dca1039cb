use crate::date::iso_date;
use crate::id::{AssigneeId, AttachmentId, ColumnId, CommentId, TagId, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::{Date, OffsetDateTime};

/// Task priority. The empty string on the wire means "unset".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    /// No priority chosen.
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a priority token is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority: {0}")]
pub struct UnknownPriority(pub String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "unset" | "none" => Ok(Self::Unset),
            "low" => Ok(Self::Low),
            "medium" | "med" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(UnknownPriority(s.to_owned())),
        }
    }
}

/// File attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Unique attachment identifier.
    pub id: AttachmentId,
    /// Display file name.
    pub name: String,
    /// Location of the uploaded file.
    #[serde(default)]
    pub url: String,
    /// File size in bytes.
    #[serde(default)]
    pub size_bytes: u64,
}

/// Markdown comment on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique comment identifier.
    pub id: CommentId,
    /// Author, when known.
    #[serde(default)]
    pub author: Option<AssigneeId>,
    /// Comment body in Markdown.
    pub body: String,
    /// Creation timestamp in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The unit of work tracked on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Non-empty display title.
    pub title: String,
    /// Markdown description.
    #[serde(default)]
    pub description: String,
    /// Title of the column the task belongs to.
    pub section: String,
    /// Priority, possibly unset.
    #[serde(default)]
    pub priority: Priority,
    /// Optional due date.
    #[serde(default, with = "iso_date::option")]
    pub due_date: Option<Date>,
    /// Completion flag, independent of `section`.
    #[serde(default)]
    pub is_completed: bool,
    /// Referenced catalog tags, in insertion order.
    #[serde(default)]
    pub tags: Vec<TagId>,
    /// Referenced catalog assignees, in insertion order.
    #[serde(default)]
    pub assignees: Vec<AssigneeId>,
    /// Owned attachments.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Owned comments.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Task {
    /// Create a task with every optional field at its default.
    pub fn new(id: TaskId, title: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            section: section.into(),
            priority: Priority::Unset,
            due_date: None,
            is_completed: false,
            tags: Vec::new(),
            assignees: Vec::new(),
            attachments: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Replace the tag references, collapsing duplicates.
    pub fn set_tags(&mut self, tags: impl IntoIterator<Item = TagId>) {
        self.tags = dedup_ordered(tags);
    }

    /// Replace the assignee references, collapsing duplicates.
    pub fn set_assignees(&mut self, assignees: impl IntoIterator<Item = AssigneeId>) {
        self.assignees = dedup_ordered(assignees);
    }
}

/// Keep the first occurrence of every element, preserving order.
#[must_use]
pub fn dedup_ordered<T, I>(items: I) -> Vec<T>
where
    T: PartialEq,
    I: IntoIterator<Item = T>,
{
    let mut out: Vec<T> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Named bucket grouping tasks whose `section` equals its title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Store-assigned identifier.
    pub id: ColumnId,
    /// Section name used for matching.
    pub title: String,
}

impl Column {
    /// Create a column.
    pub fn new(id: ColumnId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}
