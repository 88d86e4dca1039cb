//! Application layer for the task board.
//!
//! This crate owns the mutable board state, the drag controller, configuration
//! loading and the command surface shared by the CLI and scripts.

pub mod board;
pub mod config;
pub mod drag;
pub mod filter_util;
pub mod service;
pub mod task_patch;

// Re-exports for convenience
pub use board::{BoardListener, NewAttachment, Placement, TaskBoard};
pub use config::{BoardConfig, ProjectConfig};
pub use drag::{DragController, DragPreview, DragState, DropIgnored, DropOutcome};
pub use filter_util::{FilterBuildError, FilterBuilder, parse_date};
pub use service::{BoardCommand, BoardService, CommandOutcome, parse_script};
pub use task_patch::{NewTask, TaskPatch};
