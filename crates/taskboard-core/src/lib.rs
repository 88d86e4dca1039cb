//! Domain types, filtering and projections for the task board engine.
//!
//! Everything in this crate is pure: no I/O, no interior mutability.

/// Tag and assignee reference data.
pub mod catalog;
/// ISO calendar date parsing and serde.
pub mod date;
/// Error types.
pub mod error;
/// Multi-criterion filtering.
pub mod filter;
/// Identifier types.
pub mod id;
/// List and board projections.
pub mod projection;
/// Demo data for seeded boards.
pub mod seed;
/// Drag source and drop target encoding.
pub mod target;
/// Task and column records.
pub mod task;
/// Case-insensitive text search.
pub mod text_matcher;

pub use catalog::{Assignee, EntityCatalog, Tag};
pub use date::parse_iso_date;
pub use error::{BoardError, Result};
pub use filter::{DueRange, FilterUpdate, TaskFilter};
pub use projection::{
    BoardColumn, BoardColumnId, DEFAULT_DUE_DATE_FORMAT, DueDateFormat, Projection, ViewTask,
    project,
};
pub use target::DragTarget;
pub use task::{Attachment, Column, Comment, Priority, Task};
