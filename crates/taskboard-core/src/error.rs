//! Error types for board operations.

use thiserror::Error;

/// Result type for board operations.
pub type Result<T> = std::result::Result<T, BoardError>;

/// Failures that callers must handle. Missing ids are not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Task titles must contain visible characters.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// Column titles must contain visible characters.
    #[error("column title must not be empty")]
    EmptyColumnTitle,

    /// Comment bodies must contain visible characters.
    #[error("comment body must not be empty")]
    EmptyComment,

    /// Another column already uses the title.
    #[error("column '{0}' already exists")]
    DuplicateColumn(String),

    /// The board must keep at least one column to host its tasks.
    #[error("cannot delete the last column '{0}'")]
    LastColumn(String),

    /// Drag identifier is neither `task-<id>` nor `column-<id>`.
    #[error("invalid drag target: {0}")]
    InvalidDragTarget(String),
}
