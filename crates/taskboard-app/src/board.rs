//! Authoritative task and column state.
//!
//! [`TaskBoard`] owns the task collection and the declared columns. Every
//! mutation replaces the collection copy-on-write, re-derives the filtered
//! working set and the projection, then notifies listeners. Snapshots handed
//! out before a mutation never change.

use std::fmt;
use std::sync::Arc;

use anyhow::Result as AnyResult;
use taskboard_core::id::{AssigneeId, AttachmentId, ColumnId, CommentId, TaskId};
use taskboard_core::seed::seed_tasks;
use taskboard_core::{
    Attachment, BoardError, Column, Comment, DueDateFormat, EntityCatalog, FilterUpdate,
    Projection, Result, Task, TaskFilter, project,
};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::config::BoardConfig;
use crate::task_patch::{NewTask, TaskPatch};

/// Where a moved task lands inside its destination section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// After the last task of the section.
    End,
    /// At the given index of the section, clamped to its length.
    Index(usize),
}

/// Receives the new projection after every mutation.
pub trait BoardListener {
    /// Called once per committed mutation.
    fn board_changed(&mut self, projection: &Projection, filter: &TaskFilter);
}

impl<F> BoardListener for F
where
    F: FnMut(&Projection, &TaskFilter),
{
    fn board_changed(&mut self, projection: &Projection, filter: &TaskFilter) {
        self(projection, filter);
    }
}

/// Attachment metadata supplied by an uploader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAttachment {
    /// Display file name.
    pub name: String,
    /// Location of the uploaded file.
    pub url: String,
    /// File size in bytes.
    pub size_bytes: u64,
}

/// Task store: single source of truth for tasks, columns and filter criteria.
pub struct TaskBoard {
    tasks: Arc<Vec<Task>>,
    columns: Arc<Vec<Column>>,
    catalog: Arc<EntityCatalog>,
    filter: TaskFilter,
    filtered: Arc<Vec<Task>>,
    projection: Arc<Projection>,
    default_section: String,
    due_format: DueDateFormat,
    next_task: TaskId,
    next_column: ColumnId,
    listeners: Vec<Box<dyn BoardListener>>,
}

impl fmt::Debug for TaskBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskBoard")
            .field("tasks", &self.tasks.len())
            .field("columns", &self.columns)
            .field("filter", &self.filter)
            .field("default_section", &self.default_section)
            .field("next_task", &self.next_task)
            .field("next_column", &self.next_column)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for TaskBoard {
    fn default() -> Self {
        Self::seeded()
    }
}

impl TaskBoard {
    /// Build a board from configuration, loading demo data when enabled.
    ///
    /// # Errors
    /// Returns an error if the due-date format is invalid or the columns are not unique.
    pub fn new(config: &BoardConfig) -> AnyResult<Self> {
        let tasks = if config.seed() { seed_tasks() } else { Vec::new() };
        let board = Self::from_parts(
            config.columns(),
            config.default_section(),
            tasks,
            EntityCatalog::seed(),
            config.due_date_format()?,
        )?;
        Ok(board)
    }

    /// Demo board with the default columns, catalog and 12 seed tasks.
    #[must_use]
    pub fn seeded() -> Self {
        let config = BoardConfig::default();
        let columns = config
            .columns()
            .iter()
            .zip(1_u64..)
            .map(|(title, id)| Column::new(ColumnId(id), title.clone()))
            .collect();
        Self::assemble(
            columns,
            config.default_section().to_owned(),
            seed_tasks(),
            EntityCatalog::seed(),
            DueDateFormat::default(),
        )
    }

    /// Build a board from explicit parts. Column ids are assigned from 1 in the given order.
    ///
    /// # Errors
    /// Returns an error if a column title or the default section is blank, or a title repeats.
    pub fn from_parts(
        columns: &[String],
        default_section: &str,
        tasks: Vec<Task>,
        catalog: EntityCatalog,
        due_format: DueDateFormat,
    ) -> Result<Self> {
        let mut declared: Vec<Column> = Vec::with_capacity(columns.len());
        for (title, id) in columns.iter().zip(1_u64..) {
            let title = normalize_column_title(title)?;
            if declared.iter().any(|column| column.title == title) {
                return Err(BoardError::DuplicateColumn(title));
            }
            declared.push(Column::new(ColumnId(id), title));
        }
        let default_section = normalize_column_title(default_section)?;
        Ok(Self::assemble(
            declared,
            default_section,
            tasks,
            catalog,
            due_format,
        ))
    }

    fn assemble(
        columns: Vec<Column>,
        default_section: String,
        tasks: Vec<Task>,
        catalog: EntityCatalog,
        due_format: DueDateFormat,
    ) -> Self {
        let next_task = tasks.iter().map(|task| task.id).max().unwrap_or_default().next();
        let next_column = columns
            .iter()
            .map(|column| column.id)
            .max()
            .unwrap_or_default()
            .next();
        let mut board = Self {
            tasks: Arc::new(tasks),
            columns: Arc::new(columns),
            catalog: Arc::new(catalog),
            filter: TaskFilter::default(),
            filtered: Arc::default(),
            projection: Arc::default(),
            default_section,
            due_format,
            next_task,
            next_column,
            listeners: Vec::new(),
        };
        board.refresh();
        board
    }

    /// Register a listener notified after every mutation.
    pub fn subscribe(&mut self, listener: impl BoardListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Snapshot of the authoritative task collection.
    #[must_use]
    pub fn tasks(&self) -> Arc<Vec<Task>> {
        Arc::clone(&self.tasks)
    }

    /// Snapshot of the filtered working set.
    #[must_use]
    pub fn filtered(&self) -> Arc<Vec<Task>> {
        Arc::clone(&self.filtered)
    }

    /// Snapshot of the current list and board projections.
    #[must_use]
    pub fn projection(&self) -> Arc<Projection> {
        Arc::clone(&self.projection)
    }

    /// Declared columns, in board order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Reference data for tags and assignees.
    #[must_use]
    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    /// Current filter criteria.
    #[must_use]
    pub const fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    /// Section given to tasks created without one.
    #[must_use]
    pub fn default_section(&self) -> &str {
        &self.default_section
    }

    /// Look up a task in the authoritative collection.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Look up a declared column.
    #[must_use]
    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == id)
    }

    /// Index of a task among the tasks sharing its section, in authoritative order.
    #[must_use]
    pub fn section_position(&self, id: TaskId) -> Option<usize> {
        let task = self.task(id)?;
        self.tasks
            .iter()
            .filter(|other| other.section == task.section)
            .position(|other| other.id == id)
    }

    /// Create a task from partial fields and prepend it. Returns the new id.
    ///
    /// # Errors
    /// Returns [`BoardError::EmptyTitle`] when the title is blank.
    pub fn add_task(&mut self, new: NewTask) -> Result<TaskId> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(BoardError::EmptyTitle);
        }

        let id = self.next_task;
        self.next_task = id.next();

        let mut task = Task::new(id, title, self.resolve_section(new.section.as_deref()));
        task.description = new.description.unwrap_or_default();
        task.priority = new.priority.unwrap_or_default();
        task.due_date = new.due_date;
        task.is_completed = new.is_completed;
        task.set_tags(new.tags);
        task.set_assignees(new.assignees);

        debug!(%id, section = %task.section, "Created task");
        Arc::make_mut(&mut self.tasks).insert(0, task);
        self.commit();
        Ok(id)
    }

    /// Shallow-merge a patch into a task. Returns `false` when the id is unknown.
    ///
    /// # Errors
    /// Returns [`BoardError::EmptyTitle`] when the patch sets a blank title.
    pub fn update_task(&mut self, id: TaskId, mut patch: TaskPatch) -> Result<bool> {
        if patch.trimmed_title().is_some_and(str::is_empty) {
            return Err(BoardError::EmptyTitle);
        }
        let Some(idx) = self.index_of(id) else {
            debug!(%id, "Ignoring update for missing task");
            return Ok(false);
        };
        if patch.is_empty() {
            return Ok(true);
        }
        if let Some(section) = patch.section.take() {
            patch.section = Some(self.resolve_section(Some(&section)));
        }
        if let Some(task) = Arc::make_mut(&mut self.tasks).get_mut(idx) {
            patch.apply_to(task);
        }
        self.commit();
        Ok(true)
    }

    /// Remove a task. Idempotent; returns whether a task was removed.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let Some(idx) = self.index_of(id) else {
            debug!(%id, "Ignoring delete for missing task");
            return false;
        };
        Arc::make_mut(&mut self.tasks).remove(idx);
        self.commit();
        true
    }

    /// Set the completion flag.
    pub fn update_task_status(&mut self, id: TaskId, is_completed: bool) -> bool {
        matches!(self.update_task(id, TaskPatch::completion(is_completed)), Ok(true))
    }

    /// Change a task's section without touching its position in the collection.
    pub fn move_task(&mut self, id: TaskId, section: &str) -> bool {
        let section = self.resolve_section(Some(section));
        let Some(idx) = self.index_of(id) else {
            debug!(%id, "Ignoring move for missing task");
            return false;
        };
        if let Some(task) = Arc::make_mut(&mut self.tasks).get_mut(idx) {
            task.section = section;
        }
        self.commit();
        true
    }

    /// Change a task's section and position it within the destination section.
    pub fn move_task_to(&mut self, id: TaskId, section: &str, placement: Placement) -> bool {
        let section = self.resolve_section(Some(section));
        let Some(from) = self.index_of(id) else {
            debug!(%id, "Ignoring placement for missing task");
            return false;
        };
        place_in_section(Arc::make_mut(&mut self.tasks), from, section, placement);
        self.commit();
        true
    }

    /// Stable remove-then-insert within a section (or the whole list).
    ///
    /// Indices are clamped into range; negative values count as zero. Tasks
    /// outside the section keep their slots. Returns whether anything moved.
    pub fn reorder_tasks(&mut self, source: i64, dest: i64, section: Option<&str>) -> bool {
        let slots: Vec<usize> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| section.is_none_or(|s| task.section == s))
            .map(|(idx, _)| idx)
            .collect();
        let Some(last) = slots.len().checked_sub(1) else {
            return false;
        };
        let from = clamp_index(source, last);
        let to = clamp_index(dest, last);
        if from == to {
            return false;
        }

        let tasks = Arc::make_mut(&mut self.tasks);
        let mut members: Vec<Task> = slots
            .iter()
            .filter_map(|&slot| tasks.get(slot).cloned())
            .collect();
        let moved = members.remove(from);
        members.insert(to, moved);
        for (slot, task) in slots.into_iter().zip(members) {
            if let Some(entry) = tasks.get_mut(slot) {
                *entry = task;
            }
        }
        self.commit();
        true
    }

    /// Declare a new column at the end of the board.
    ///
    /// # Errors
    /// Returns an error when the title is blank or already used.
    pub fn add_column(&mut self, title: &str) -> Result<ColumnId> {
        let title = normalize_column_title(title)?;
        if self.columns.iter().any(|column| column.title == title) {
            return Err(BoardError::DuplicateColumn(title));
        }
        let id = self.next_column;
        self.next_column = id.next();
        info!(%id, %title, "Added column");
        Arc::make_mut(&mut self.columns).push(Column::new(id, title));
        self.commit();
        Ok(id)
    }

    /// Rename a column and every task in its section. Returns `false` when the id is unknown.
    ///
    /// # Errors
    /// Returns an error when the title is blank or used by another column.
    pub fn update_column(&mut self, id: ColumnId, title: &str) -> Result<bool> {
        let title = normalize_column_title(title)?;
        let Some(old) = self.column(id).map(|column| column.title.clone()) else {
            debug!(%id, "Ignoring rename for missing column");
            return Ok(false);
        };
        if old == title {
            return Ok(true);
        }
        if self.columns.iter().any(|column| column.id != id && column.title == title) {
            return Err(BoardError::DuplicateColumn(title));
        }

        if let Some(column) = Arc::make_mut(&mut self.columns)
            .iter_mut()
            .find(|column| column.id == id)
        {
            column.title.clone_from(&title);
        }
        let moved = self.reassign_section(&old, &title);
        if self.default_section == old {
            self.default_section.clone_from(&title);
        }
        info!(%id, from = %old, to = %title, tasks = moved, "Renamed column");
        self.commit();
        Ok(true)
    }

    /// Remove a column, moving its tasks to the first remaining column.
    /// Returns `false` when the id is unknown.
    ///
    /// # Errors
    /// Returns [`BoardError::LastColumn`] when the column is the only one left.
    pub fn delete_column(&mut self, id: ColumnId) -> Result<bool> {
        let Some(idx) = self.columns.iter().position(|column| column.id == id) else {
            debug!(%id, "Ignoring delete for missing column");
            return Ok(false);
        };
        if self.columns.len() == 1 {
            let title = self.columns.first().map(|c| c.title.clone()).unwrap_or_default();
            return Err(BoardError::LastColumn(title));
        }

        let removed = Arc::make_mut(&mut self.columns).remove(idx);
        let fallback = self
            .columns
            .first()
            .map(|column| column.title.clone())
            .unwrap_or_default();
        let moved = self.reassign_section(&removed.title, &fallback);
        if self.default_section == removed.title {
            self.default_section.clone_from(&fallback);
        }
        info!(%id, title = %removed.title, %fallback, tasks = moved, "Deleted column");
        self.commit();
        Ok(true)
    }

    /// Attach a comment to a task. Returns `None` when the task is unknown.
    ///
    /// # Errors
    /// Returns [`BoardError::EmptyComment`] when the body is blank.
    pub fn add_comment(
        &mut self,
        task: TaskId,
        author: Option<AssigneeId>,
        body: &str,
    ) -> Result<Option<CommentId>> {
        if body.trim().is_empty() {
            return Err(BoardError::EmptyComment);
        }
        let Some(idx) = self.index_of(task) else {
            debug!(%task, "Ignoring comment for missing task");
            return Ok(None);
        };
        let comment = Comment {
            id: CommentId::new(),
            author,
            body: body.to_owned(),
            created_at: OffsetDateTime::now_utc(),
        };
        let id = comment.id;
        if let Some(entry) = Arc::make_mut(&mut self.tasks).get_mut(idx) {
            entry.comments.push(comment);
        }
        self.commit();
        Ok(Some(id))
    }

    /// Remove a comment from a task. Returns whether one was removed.
    pub fn delete_comment(&mut self, task: TaskId, comment: CommentId) -> bool {
        let found = self
            .task(task)
            .is_some_and(|entry| entry.comments.iter().any(|c| c.id == comment));
        if !found {
            debug!(%task, %comment, "Ignoring delete for missing comment");
            return false;
        }
        if let Some(entry) = Arc::make_mut(&mut self.tasks).iter_mut().find(|t| t.id == task) {
            entry.comments.retain(|c| c.id != comment);
        }
        self.commit();
        true
    }

    /// Attach a file to a task. Returns `None` when the task is unknown.
    pub fn add_attachment(&mut self, task: TaskId, attachment: NewAttachment) -> Option<AttachmentId> {
        let Some(idx) = self.index_of(task) else {
            debug!(%task, "Ignoring attachment for missing task");
            return None;
        };
        let NewAttachment {
            name,
            url,
            size_bytes,
        } = attachment;
        let id = AttachmentId::new();
        if let Some(entry) = Arc::make_mut(&mut self.tasks).get_mut(idx) {
            entry.attachments.push(Attachment {
                id,
                name,
                url,
                size_bytes,
            });
        }
        self.commit();
        Some(id)
    }

    /// Remove an attachment from a task. Returns whether one was removed.
    pub fn delete_attachment(&mut self, task: TaskId, attachment: AttachmentId) -> bool {
        let found = self
            .task(task)
            .is_some_and(|entry| entry.attachments.iter().any(|a| a.id == attachment));
        if !found {
            debug!(%task, %attachment, "Ignoring delete for missing attachment");
            return false;
        }
        if let Some(entry) = Arc::make_mut(&mut self.tasks).iter_mut().find(|t| t.id == task) {
            entry.attachments.retain(|a| a.id != attachment);
        }
        self.commit();
        true
    }

    /// Merge partial criteria into the filter and re-derive the working set.
    pub fn update_filter(&mut self, update: FilterUpdate) {
        self.filter.merge(update);
        debug!(filter = ?self.filter, "Updated filter");
        self.commit();
    }

    /// Clear every criterion.
    pub fn reset_filters(&mut self) {
        self.filter.reset();
        debug!("Reset filters");
        self.commit();
    }

    fn index_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn resolve_section(&self, section: Option<&str>) -> String {
        section
            .map(str::trim)
            .filter(|section| !section.is_empty())
            .unwrap_or(&self.default_section)
            .to_owned()
    }

    fn reassign_section(&mut self, from: &str, to: &str) -> usize {
        if !self.tasks.iter().any(|task| task.section == from) {
            return 0;
        }
        let mut moved = 0;
        for task in Arc::make_mut(&mut self.tasks).iter_mut() {
            if task.section == from {
                task.section = to.to_owned();
                moved += 1;
            }
        }
        moved
    }

    fn refresh(&mut self) {
        self.filtered = Arc::new(self.filter.apply(&self.tasks));
        self.projection = Arc::new(project(
            &self.filtered,
            &self.columns,
            &self.catalog,
            &self.due_format,
        ));
    }

    fn commit(&mut self) {
        self.refresh();
        for listener in &mut self.listeners {
            listener.board_changed(&self.projection, &self.filter);
        }
    }
}

fn normalize_column_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(BoardError::EmptyColumnTitle);
    }
    Ok(trimmed.to_owned())
}

fn clamp_index(index: i64, last: usize) -> usize {
    usize::try_from(index).map_or(0, |idx| idx.min(last))
}

/// Pull the task at `from` out of the collection and reinsert it inside `section`.
fn place_in_section(tasks: &mut Vec<Task>, from: usize, section: String, placement: Placement) {
    let mut task = tasks.remove(from);
    task.section = section;

    let slots: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, other)| other.section == task.section)
        .map(|(idx, _)| idx)
        .collect();
    let after_last = slots.last().map_or(from.min(tasks.len()), |&last| last + 1);
    let at = match placement {
        Placement::End => after_last,
        Placement::Index(n) => slots.get(n).copied().unwrap_or(after_last),
    };
    tasks.insert(at, task);
}
