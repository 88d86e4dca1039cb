//! Derived list and board views.
//!
//! Projection is a pure function of the (filtered) task collection, the
//! declared columns and the catalog. It is rerun in full after every change.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::Date;
use time::format_description::{self, OwnedFormatItem};

use crate::catalog::EntityCatalog;
use crate::id::{ColumnId, TaskId};
use crate::task::{Column, Priority, Task};

/// Default rendering of due dates, e.g. `Feb 5, 2025`.
pub const DEFAULT_DUE_DATE_FORMAT: &str = "[month repr:short] [day padding:none], [year]";

const SYNTHESIZED_PREFIX: &str = "auto-";

/// Parsed due-date format shared by every projection run.
#[derive(Debug, Clone)]
pub struct DueDateFormat(OwnedFormatItem);

impl DueDateFormat {
    /// Parse a `time` format description.
    ///
    /// # Errors
    /// Returns an error when the description is malformed.
    pub fn parse(description: &str) -> Result<Self, time::error::InvalidFormatDescription> {
        format_description::parse_owned::<2>(description).map(Self)
    }

    /// Render a date, falling back to ISO form if the format cannot represent it.
    #[must_use]
    pub fn render(&self, date: Date) -> String {
        date.format(&self.0).unwrap_or_else(|_| date.to_string())
    }
}

impl Default for DueDateFormat {
    fn default() -> Self {
        let items = format_description::parse_owned::<2>(DEFAULT_DUE_DATE_FORMAT)
            .unwrap_or_else(|_| OwnedFormatItem::Compound(Box::default()));
        Self(items)
    }
}

/// Identifier of a board column: declared by the store or synthesized for an unmatched section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoardColumnId {
    /// Column owned by the store.
    Declared(ColumnId),
    /// Column created on the fly, numbered from 1 in order of first appearance.
    Synthesized(u64),
}

impl fmt::Display for BoardColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declared(id) => id.fmt(f),
            Self::Synthesized(n) => write!(f, "{SYNTHESIZED_PREFIX}{n}"),
        }
    }
}

/// Error returned when a board column id cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid board column id: {0}")]
pub struct InvalidBoardColumnId(pub String);

impl FromStr for BoardColumnId {
    type Err = InvalidBoardColumnId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || InvalidBoardColumnId(s.to_owned());
        if let Some(rest) = trimmed.strip_prefix(SYNTHESIZED_PREFIX) {
            return rest.parse().map(Self::Synthesized).map_err(|_| invalid());
        }
        trimmed
            .parse::<ColumnId>()
            .map(Self::Declared)
            .map_err(|_| invalid())
    }
}

impl Serialize for BoardColumnId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BoardColumnId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Lightweight task row consumed by list and board views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTask {
    /// Task identifier.
    pub id: TaskId,
    /// Display title.
    pub content: String,
    /// Markdown description.
    pub description: String,
    /// Priority.
    pub priority: Priority,
    /// Tag display names.
    pub tags: Vec<String>,
    /// Formatted due date.
    pub due_date: Option<String>,
    /// Number of comments.
    pub comment_count: usize,
    /// Number of attachments.
    pub attachment_count: usize,
    /// Assignee display names.
    pub assignees: Vec<String>,
    /// Owning section.
    pub section: String,
    /// Completion flag.
    pub is_completed: bool,
}

impl ViewTask {
    fn from_task(task: &Task, catalog: &EntityCatalog, format: &DueDateFormat) -> Self {
        Self {
            id: task.id,
            content: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            tags: catalog.tag_names(&task.tags).map(str::to_owned).collect(),
            due_date: task.due_date.map(|date| format.render(date)),
            comment_count: task.comments.len(),
            attachment_count: task.attachments.len(),
            assignees: catalog
                .assignee_names(&task.assignees)
                .map(str::to_owned)
                .collect(),
            section: task.section.clone(),
            is_completed: task.is_completed,
        }
    }
}

/// Column of the board view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    /// Column identifier.
    pub id: BoardColumnId,
    /// Section name.
    pub title: String,
    /// True when no declared column exists for this section.
    pub synthesized: bool,
    /// Tasks of the section, in list order.
    pub tasks: Vec<ViewTask>,
}

impl BoardColumn {
    /// Position of a task within the column.
    #[must_use]
    pub fn position_of(&self, task: TaskId) -> Option<usize> {
        self.tasks.iter().position(|view| view.id == task)
    }
}

/// Both derived views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Projection {
    /// Flat list view.
    pub list: Vec<ViewTask>,
    /// Board view grouped by section.
    pub board: Vec<BoardColumn>,
}

impl Projection {
    /// Find a board column by id.
    #[must_use]
    pub fn column(&self, id: BoardColumnId) -> Option<&BoardColumn> {
        self.board.iter().find(|column| column.id == id)
    }

    /// Find the column currently holding a task, with the task's index in it.
    #[must_use]
    pub fn locate_task(&self, task: TaskId) -> Option<(&BoardColumn, usize)> {
        self.board
            .iter()
            .find_map(|column| column.position_of(task).map(|idx| (column, idx)))
    }

    /// Total number of tasks placed on the board.
    #[must_use]
    pub fn board_task_count(&self) -> usize {
        self.board.iter().map(|column| column.tasks.len()).sum()
    }
}

/// Derive the list and board projections.
#[must_use]
pub fn project(
    tasks: &[Task],
    columns: &[Column],
    catalog: &EntityCatalog,
    format: &DueDateFormat,
) -> Projection {
    let list: Vec<ViewTask> = tasks
        .iter()
        .map(|task| ViewTask::from_task(task, catalog, format))
        .collect();

    let mut board: Vec<BoardColumn> = columns
        .iter()
        .map(|column| BoardColumn {
            id: BoardColumnId::Declared(column.id),
            title: column.title.clone(),
            synthesized: false,
            tasks: Vec::new(),
        })
        .collect();

    let mut known: HashSet<&str> = columns.iter().map(|column| column.title.as_str()).collect();
    let mut synthesized = 0_u64;
    for view in &list {
        if known.insert(view.section.as_str()) {
            synthesized += 1;
            board.push(BoardColumn {
                id: BoardColumnId::Synthesized(synthesized),
                title: view.section.clone(),
                synthesized: true,
                tasks: Vec::new(),
            });
        }
    }

    for view in &list {
        if let Some(column) = board.iter_mut().find(|column| column.title == view.section) {
            column.tasks.push(view.clone());
        }
    }

    Projection { list, board }
}
