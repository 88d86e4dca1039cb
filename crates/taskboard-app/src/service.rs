use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use taskboard_core::id::{AssigneeId, AttachmentId, ColumnId, CommentId, TaskId};
use taskboard_core::{FilterUpdate, Projection, TaskFilter};
use tracing::debug;

use crate::board::{NewAttachment, TaskBoard};
use crate::config::BoardConfig;
use crate::drag::{DragController, DragPreview, DropOutcome};
use crate::task_patch::{NewTask, TaskPatch};

/// Every inbound operation as plain data, so scripts and collaborators can drive a board with JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BoardCommand {
    /// Create a task. Omitted fields take the board defaults.
    AddTask(NewTask),
    /// Merge the present fields of `patch` into a task.
    UpdateTask {
        /// Task to change.
        id: TaskId,
        /// Fields to replace.
        #[serde(default)]
        patch: TaskPatch,
    },
    /// Remove a task.
    DeleteTask {
        /// Task to remove.
        id: TaskId,
    },
    /// Mark a task complete or incomplete.
    UpdateTaskStatus {
        /// Task to change.
        id: TaskId,
        /// New completion flag.
        is_completed: bool,
    },
    /// Change a task's section, keeping its position in the collection.
    MoveTask {
        /// Task to move.
        id: TaskId,
        /// Destination section title.
        section: String,
    },
    /// Move a task from one index to another, within a section or the whole collection.
    ReorderTasks {
        /// Index the task currently occupies.
        source: i64,
        /// Index it should end up at.
        dest: i64,
        /// Section the indices refer to. `None` means the whole collection.
        #[serde(default)]
        section: Option<String>,
    },
    /// Append a column.
    AddColumn {
        /// Column title.
        title: String,
    },
    /// Rename a column. Its tasks follow the new title.
    UpdateColumn {
        /// Column to rename.
        id: ColumnId,
        /// New title.
        title: String,
    },
    /// Remove a column, moving its tasks to the fallback column.
    DeleteColumn {
        /// Column to remove.
        id: ColumnId,
    },
    /// Append a comment to a task.
    AddComment {
        /// Task to comment on.
        task: TaskId,
        /// Commenting assignee, if known.
        #[serde(default)]
        author: Option<AssigneeId>,
        /// Comment text.
        body: String,
    },
    /// Remove a comment from a task.
    DeleteComment {
        /// Task holding the comment.
        task: TaskId,
        /// Comment to remove.
        comment: CommentId,
    },
    /// Attach a file reference to a task.
    AddAttachment {
        /// Task to attach to.
        task: TaskId,
        /// File name.
        name: String,
        /// Location of the file.
        url: String,
        /// File size in bytes.
        #[serde(default)]
        size_bytes: u64,
    },
    /// Remove an attachment from a task.
    DeleteAttachment {
        /// Task holding the attachment.
        task: TaskId,
        /// Attachment to remove.
        attachment: AttachmentId,
    },
    /// Merge criteria into the active filter.
    UpdateFilter(FilterUpdate),
    /// Clear every filter criterion.
    ResetFilters,
    /// Pick up a task by its `task-<id>` drag identifier.
    DragStart {
        /// Drag source identifier.
        id: String,
    },
    /// Hover over a task or column while dragging.
    DragOver {
        /// Hovered target identifier.
        id: String,
    },
    /// Release the dragged task over a target.
    DragEnd {
        /// Drop target identifier.
        id: String,
    },
    /// Abandon the current drag.
    DragCancel,
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CommandOutcome {
    /// A task was added.
    TaskCreated {
        /// Id assigned by the store.
        id: TaskId,
    },
    /// A column was added.
    ColumnCreated {
        /// Id assigned by the store.
        id: ColumnId,
    },
    /// Result of adding a comment.
    CommentAdded {
        /// Task that was addressed.
        task: TaskId,
        /// New comment id, or `None` when the task does not exist.
        id: Option<CommentId>,
    },
    /// Result of adding an attachment.
    AttachmentAdded {
        /// Task that was addressed.
        task: TaskId,
        /// New attachment id, or `None` when the task does not exist.
        id: Option<AttachmentId>,
    },
    /// Soft operations report whether their target existed.
    Applied {
        /// `false` when nothing matched.
        changed: bool,
    },
    /// The filter after an update or reset.
    FilterChanged {
        /// Active criteria.
        filter: TaskFilter,
    },
    /// Result of `dragStart`.
    DragStarted {
        /// `false` when the identifier named no task.
        accepted: bool,
    },
    /// Where a drop over the hovered target would land.
    Preview {
        /// `None` when not dragging or the target is unknown.
        preview: Option<DragPreview>,
    },
    /// What a drop did.
    Dropped {
        /// Drop result.
        outcome: DropOutcome,
    },
}

/// Service façade pairing a board with its drag controller.
#[derive(Debug, Default)]
pub struct BoardService {
    board: TaskBoard,
    drag: DragController,
}

impl BoardService {
    /// Build a service around a freshly configured board.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot produce a board.
    pub fn new(config: &BoardConfig) -> Result<Self> {
        Ok(Self::from_board(TaskBoard::new(config)?))
    }

    /// Wrap an existing board.
    #[must_use]
    pub fn from_board(board: TaskBoard) -> Self {
        Self {
            board,
            drag: DragController::new(),
        }
    }

    /// Board being driven.
    #[must_use]
    pub const fn board(&self) -> &TaskBoard {
        &self.board
    }

    /// Mutable board access for callers that bypass commands.
    pub const fn board_mut(&mut self) -> &mut TaskBoard {
        &mut self.board
    }

    /// Drag gesture state shared by the drag commands.
    #[must_use]
    pub const fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Current projection.
    #[must_use]
    pub fn projection(&self) -> std::sync::Arc<Projection> {
        self.board.projection()
    }

    /// Apply one command.
    ///
    /// # Errors
    /// Returns the board's validation error when the command is rejected.
    pub fn execute(&mut self, command: BoardCommand) -> taskboard_core::Result<CommandOutcome> {
        debug!(?command, "Executing command");
        let board = &mut self.board;
        let outcome = match command {
            BoardCommand::AddTask(new) => CommandOutcome::TaskCreated {
                id: board.add_task(new)?,
            },
            BoardCommand::UpdateTask { id, patch } => applied(board.update_task(id, patch)?),
            BoardCommand::DeleteTask { id } => applied(board.delete_task(id)),
            BoardCommand::UpdateTaskStatus { id, is_completed } => {
                applied(board.update_task_status(id, is_completed))
            }
            BoardCommand::MoveTask { id, section } => applied(board.move_task(id, &section)),
            BoardCommand::ReorderTasks {
                source,
                dest,
                section,
            } => applied(board.reorder_tasks(source, dest, section.as_deref())),
            BoardCommand::AddColumn { title } => CommandOutcome::ColumnCreated {
                id: board.add_column(&title)?,
            },
            BoardCommand::UpdateColumn { id, title } => applied(board.update_column(id, &title)?),
            BoardCommand::DeleteColumn { id } => applied(board.delete_column(id)?),
            BoardCommand::AddComment { task, author, body } => CommandOutcome::CommentAdded {
                task,
                id: board.add_comment(task, author, &body)?,
            },
            BoardCommand::DeleteComment { task, comment } => {
                applied(board.delete_comment(task, comment))
            }
            BoardCommand::AddAttachment {
                task,
                name,
                url,
                size_bytes,
            } => CommandOutcome::AttachmentAdded {
                task,
                id: board.add_attachment(
                    task,
                    NewAttachment {
                        name,
                        url,
                        size_bytes,
                    },
                ),
            },
            BoardCommand::DeleteAttachment { task, attachment } => {
                applied(board.delete_attachment(task, attachment))
            }
            BoardCommand::UpdateFilter(update) => {
                board.update_filter(update);
                CommandOutcome::FilterChanged {
                    filter: board.filter().clone(),
                }
            }
            BoardCommand::ResetFilters => {
                board.reset_filters();
                CommandOutcome::FilterChanged {
                    filter: board.filter().clone(),
                }
            }
            BoardCommand::DragStart { id } => CommandOutcome::DragStarted {
                accepted: self.drag.start(board, &id),
            },
            BoardCommand::DragOver { id } => CommandOutcome::Preview {
                preview: self.drag.over(board, &id),
            },
            BoardCommand::DragEnd { id } => CommandOutcome::Dropped {
                outcome: self.drag.drop(board, &id),
            },
            BoardCommand::DragCancel => {
                self.drag.cancel();
                CommandOutcome::Applied { changed: false }
            }
        };
        Ok(outcome)
    }

    /// Parse and apply a JSON-lines script, stopping at the first failure.
    ///
    /// # Errors
    /// Returns an error naming the line that failed to parse or was rejected.
    pub fn run_script(&mut self, contents: &str) -> Result<Vec<CommandOutcome>> {
        parse_script(contents)?
            .into_iter()
            .map(|(line, command)| {
                self.execute(command)
                    .with_context(|| format!("command on line {line} was rejected"))
            })
            .collect()
    }
}

const fn applied(changed: bool) -> CommandOutcome {
    CommandOutcome::Applied { changed }
}

/// Parse a JSON-lines script into commands tagged with their 1-based line numbers.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
/// Returns an error naming the first line that is not a valid command.
pub fn parse_script(contents: &str) -> Result<Vec<(usize, BoardCommand)>> {
    contents
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, raw)| {
            serde_json::from_str(raw)
                .map(|command| (line, command))
                .with_context(|| format!("failed to parse command on line {line}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::DragState;
    use taskboard_core::{BoardError, Priority};

    fn parse(raw: &str) -> BoardCommand {
        serde_json::from_str(raw).unwrap_or_else(|err| panic!("parse {raw}: {err}"))
    }

    #[test]
    fn commands_parse_from_camel_case_json() {
        assert_eq!(
            parse(r#"{"op":"addTask","title":"Fix bug","section":"To Do","priority":"High"}"#),
            BoardCommand::AddTask(
                NewTask::titled("Fix bug")
                    .in_section("To Do")
                    .with_priority(Priority::High)
            )
        );
        assert_eq!(
            parse(r#"{"op":"updateTaskStatus","id":"3","isCompleted":true}"#),
            BoardCommand::UpdateTaskStatus {
                id: TaskId(3),
                is_completed: true
            }
        );
        assert_eq!(parse(r#"{"op":"dragCancel"}"#), BoardCommand::DragCancel);
        assert_eq!(
            parse(r#"{"op":"updateFilter","priorities":["High"]}"#),
            BoardCommand::UpdateFilter(FilterUpdate {
                priorities: Some(vec![Priority::High]),
                ..FilterUpdate::default()
            })
        );
    }

    #[test]
    fn execute_reports_soft_misses() {
        let mut service = BoardService::default();
        let outcome = service
            .execute(BoardCommand::DeleteTask { id: TaskId(404) })
            .unwrap_or_else(|err| panic!("delete: {err}"));
        assert_eq!(outcome, CommandOutcome::Applied { changed: false });
    }

    #[test]
    fn execute_surfaces_validation_errors() {
        let mut service = BoardService::default();
        let Err(err) = service.execute(BoardCommand::AddColumn { title: "Done".into() }) else {
            panic!("duplicate column should be rejected");
        };
        assert_eq!(err, BoardError::DuplicateColumn("Done".into()));
    }

    #[test]
    fn drag_commands_share_controller_state() {
        let mut service = BoardService::default();
        let script = r#"
            # move the login design card to Done
            {"op":"dragStart","id":"task-1"}
            {"op":"dragOver","id":"column-4"}
            {"op":"dragEnd","id":"column-4"}
        "#;
        let outcomes = service
            .run_script(script)
            .unwrap_or_else(|err| panic!("script: {err:#}"));
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0], CommandOutcome::DragStarted { accepted: true });
        assert!(matches!(
            &outcomes[2],
            CommandOutcome::Dropped { outcome } if outcome.is_committed()
        ));
        assert!(
            service
                .board()
                .task(TaskId(1))
                .is_some_and(|task| task.section == "Done")
        );
    }

    #[test]
    fn script_errors_name_the_line() {
        let Err(err) = parse_script("{\"op\":\"resetFilters\"}\n\n{\"op\":\"explode\"}") else {
            panic!("unknown op should fail");
        };
        assert!(err.to_string().contains("line 3"));

        let mut service = BoardService::default();
        let Err(err) = service.run_script(r#"{"op":"addTask","title":"  "}"#) else {
            panic!("blank title should fail");
        };
        assert!(format!("{err:#}").contains("line 1"));
    }

    #[test]
    fn outcomes_serialize_with_result_tag() {
        let json = serde_json::to_value(CommandOutcome::TaskCreated { id: TaskId(13) })
            .unwrap_or_else(|err| panic!("serialize: {err}"));
        assert_eq!(json, serde_json::json!({"result": "taskCreated", "id": "13"}));
    }

    #[test]
    fn accessors_expose_board_and_drag_state() {
        let mut service = BoardService::default();
        let outcome = service
            .execute(BoardCommand::DragStart { id: "task-2".into() })
            .unwrap_or_else(|err| panic!("drag start: {err}"));
        assert_eq!(outcome, CommandOutcome::DragStarted { accepted: true });
        assert!(matches!(
            service.drag().state(),
            DragState::Dragging { task, .. } if task == TaskId(2)
        ));

        service.board_mut().reset_filters();
        service
            .execute(BoardCommand::DragCancel)
            .unwrap_or_else(|err| panic!("cancel: {err}"));
        assert_eq!(service.drag().state(), DragState::Idle);
        assert_eq!(service.board().tasks().len(), 12);
    }
}
