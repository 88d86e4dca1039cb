//! Drag-and-drop lifecycle as an explicit state machine.
//!
//! `Idle -> Dragging { task, source } -> Idle`. Only [`DragController::drop`]
//! commits anything; `over` is a read-only preview.

use serde::Serialize;
use taskboard_core::id::TaskId;
use taskboard_core::{BoardColumnId, DragTarget};
use tracing::debug;

use crate::board::{Placement, TaskBoard};

/// Transient drag state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A task card is being dragged.
    Dragging {
        /// Dragged task.
        task: TaskId,
        /// Column the task was picked up from.
        source: BoardColumnId,
    },
}

/// Where the dragged card would land if dropped now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DragPreview {
    /// Destination column.
    pub column: BoardColumnId,
    /// Destination index within the visible column.
    pub index: usize,
}

/// Reason a drop did not change the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DropIgnored {
    /// `drop` without a preceding `start`.
    NotDragging,
    /// The target id could not be parsed.
    InvalidTarget,
    /// The dragged task no longer exists.
    TaskGone,
    /// The target task or column no longer exists.
    TargetGone,
    /// Dropped onto the column the task already sits in.
    SameColumn,
    /// Dropped onto itself.
    SamePosition,
}

/// Result of a drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DropOutcome {
    /// The task changed column.
    Moved {
        /// Dragged task.
        task: TaskId,
        /// Column it left.
        from: BoardColumnId,
        /// Column it joined.
        to: BoardColumnId,
        /// New section of the task.
        section: String,
    },
    /// The task changed position inside its column.
    Reordered {
        /// Dragged task.
        task: TaskId,
        /// Section the reorder applied to.
        section: String,
        /// Previous index in the section.
        from_index: usize,
        /// New index in the section.
        to_index: usize,
    },
    /// Nothing changed.
    Ignored {
        /// Why the drop was ignored.
        reason: DropIgnored,
    },
}

impl DropOutcome {
    /// Returns true when the board was mutated.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        !matches!(self, Self::Ignored { .. })
    }

    const fn ignored(reason: DropIgnored) -> Self {
        Self::Ignored { reason }
    }
}

/// Interprets drag events against the board projection.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    /// Create an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// Begin dragging `active_id` (`task-<id>`).
    ///
    /// Any state left by an abandoned gesture is discarded. Returns false and
    /// stays idle when the id does not resolve to a task on the board.
    pub fn start(&mut self, board: &TaskBoard, active_id: &str) -> bool {
        self.state = DragState::Idle;
        let Ok(DragTarget::Task(task)) = active_id.parse::<DragTarget>() else {
            debug!(active_id, "Drag start ignored: not a task");
            return false;
        };
        let projection = board.projection();
        let Some((column, _)) = projection.locate_task(task) else {
            debug!(%task, "Drag start ignored: task not on board");
            return false;
        };
        self.state = DragState::Dragging {
            task,
            source: column.id,
        };
        debug!(%task, source = %column.id, "Drag started");
        true
    }

    /// Preview the landing spot for `over_id` without committing.
    #[must_use]
    pub fn over(&self, board: &TaskBoard, over_id: &str) -> Option<DragPreview> {
        let DragState::Dragging { task, .. } = self.state else {
            return None;
        };
        let projection = board.projection();
        let (current, current_index) = projection.locate_task(task)?;
        match over_id.parse::<DragTarget>().ok()? {
            DragTarget::Column(id) => {
                let column = projection.column(id)?;
                let index = if column.id == current.id {
                    current_index
                } else {
                    column.tasks.len()
                };
                Some(DragPreview {
                    column: column.id,
                    index,
                })
            }
            DragTarget::Task(over) => {
                let (column, index) = projection.locate_task(over)?;
                Some(DragPreview {
                    column: column.id,
                    index,
                })
            }
        }
    }

    /// Finish the gesture on `over_id`. The controller is idle afterwards whatever the outcome.
    pub fn drop(&mut self, board: &mut TaskBoard, over_id: &str) -> DropOutcome {
        let DragState::Dragging { task, .. } = std::mem::take(&mut self.state) else {
            return DropOutcome::ignored(DropIgnored::NotDragging);
        };
        let outcome = match over_id.parse::<DragTarget>() {
            Ok(DragTarget::Column(column)) => drop_on_column(board, task, column),
            Ok(DragTarget::Task(over)) => drop_on_task(board, task, over),
            Err(err) => {
                debug!(%err, "Drop target rejected");
                DropOutcome::ignored(DropIgnored::InvalidTarget)
            }
        };
        debug!(%task, over_id, ?outcome, "Drag finished");
        outcome
    }

    /// Abandon the gesture.
    pub fn cancel(&mut self) {
        if let DragState::Dragging { task, .. } = std::mem::take(&mut self.state) {
            debug!(%task, "Drag cancelled");
        }
    }
}

fn drop_on_column(board: &mut TaskBoard, task: TaskId, target: BoardColumnId) -> DropOutcome {
    let projection = board.projection();
    let Some((source, _)) = projection.locate_task(task) else {
        return DropOutcome::ignored(DropIgnored::TaskGone);
    };
    let Some(column) = projection.column(target) else {
        return DropOutcome::ignored(DropIgnored::TargetGone);
    };
    if column.id == source.id {
        return DropOutcome::ignored(DropIgnored::SameColumn);
    }
    if !board.move_task_to(task, &column.title, Placement::End) {
        return DropOutcome::ignored(DropIgnored::TaskGone);
    }
    DropOutcome::Moved {
        task,
        from: source.id,
        to: column.id,
        section: column.title.clone(),
    }
}

fn drop_on_task(board: &mut TaskBoard, task: TaskId, over: TaskId) -> DropOutcome {
    if task == over {
        return DropOutcome::ignored(DropIgnored::SamePosition);
    }
    let projection = board.projection();
    let Some((source, _)) = projection.locate_task(task) else {
        return DropOutcome::ignored(DropIgnored::TaskGone);
    };
    let Some((target, _)) = projection.locate_task(over) else {
        return DropOutcome::ignored(DropIgnored::TargetGone);
    };
    // Board indices skip filtered-out tasks; positions must come from the full section.
    let (Some(from_index), Some(to_index)) =
        (board.section_position(task), board.section_position(over))
    else {
        return DropOutcome::ignored(DropIgnored::TargetGone);
    };

    if source.id == target.id {
        let section = source.title.clone();
        if !board.reorder_tasks(as_signed(from_index), as_signed(to_index), Some(&section)) {
            return DropOutcome::ignored(DropIgnored::SamePosition);
        }
        return DropOutcome::Reordered {
            task,
            section,
            from_index,
            to_index,
        };
    }

    if !board.move_task_to(task, &target.title, Placement::Index(to_index)) {
        return DropOutcome::ignored(DropIgnored::TaskGone);
    }
    DropOutcome::Moved {
        task,
        from: source.id,
        to: target.id,
        section: target.title.clone(),
    }
}

fn as_signed(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}
