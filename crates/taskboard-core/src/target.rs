use std::fmt;
use std::str::FromStr;

use crate::error::BoardError;
use crate::id::TaskId;
use crate::projection::BoardColumnId;

const TASK_PREFIX: &str = "task-";
const COLUMN_PREFIX: &str = "column-";

/// Element a drag gesture can start on or hover over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragTarget {
    /// A task card, encoded as `task-<id>`.
    Task(TaskId),
    /// A board column, encoded as `column-<id>`.
    Column(BoardColumnId),
}

impl fmt::Display for DragTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task(id) => write!(f, "{TASK_PREFIX}{id}"),
            Self::Column(id) => write!(f, "{COLUMN_PREFIX}{id}"),
        }
    }
}

impl FromStr for DragTarget {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BoardError::InvalidDragTarget(s.to_owned());
        if let Some(raw) = s.strip_prefix(TASK_PREFIX) {
            return raw.parse().map(Self::Task).map_err(|_| invalid());
        }
        if let Some(raw) = s.strip_prefix(COLUMN_PREFIX) {
            return raw.parse().map(Self::Column).map_err(|_| invalid());
        }
        Err(invalid())
    }
}
