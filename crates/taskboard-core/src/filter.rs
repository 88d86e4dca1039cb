//! Multi-criterion task filtering.
//!
//! Criteria combine with AND across categories and OR within a category.
//! An empty category places no constraint on the task.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::date::iso_date;
use crate::id::{AssigneeId, TagId};
use crate::task::{Priority, Task};
use crate::text_matcher::TextMatcher;

/// Inclusive due-date window. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueRange {
    /// Earliest accepted due date.
    #[serde(default, with = "iso_date::option")]
    pub from: Option<Date>,
    /// Latest accepted due date.
    #[serde(default, with = "iso_date::option")]
    pub to: Option<Date>,
}

impl DueRange {
    /// Returns true when neither bound is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Check a task's due date against the window.
    #[must_use]
    pub fn contains(&self, due: Option<Date>) -> bool {
        if self.is_empty() {
            return true;
        }
        let Some(due) = due else {
            return false;
        };
        self.from.is_none_or(|from| due >= from) && self.to.is_none_or(|to| due <= to)
    }
}

/// Persistent filter criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    /// Free-text query over title and description.
    #[serde(default)]
    pub search: Option<String>,
    /// Accepted priorities.
    #[serde(default)]
    pub priorities: BTreeSet<Priority>,
    /// Accepted sections.
    #[serde(default)]
    pub statuses: BTreeSet<String>,
    /// Tasks must reference at least one of these assignees.
    #[serde(default)]
    pub assignees: BTreeSet<AssigneeId>,
    /// Tasks must reference at least one of these tags.
    #[serde(default)]
    pub tags: BTreeSet<TagId>,
    /// Due-date window.
    #[serde(default)]
    pub due: DueRange,
}

/// Partial criteria. Present fields replace the stored ones, absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterUpdate {
    /// Replacement search text (empty string clears it).
    #[serde(default)]
    pub search: Option<String>,
    /// Replacement priority set.
    #[serde(default)]
    pub priorities: Option<Vec<Priority>>,
    /// Replacement section set.
    #[serde(default)]
    pub statuses: Option<Vec<String>>,
    /// Replacement assignee set.
    #[serde(default)]
    pub assignees: Option<Vec<AssigneeId>>,
    /// Replacement tag set.
    #[serde(default)]
    pub tags: Option<Vec<TagId>>,
    /// Replacement due-date window.
    #[serde(default)]
    pub due: Option<DueRange>,
}

impl FilterUpdate {
    /// Returns true when the update carries no field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.priorities.is_none()
            && self.statuses.is_none()
            && self.assignees.is_none()
            && self.tags.is_none()
            && self.due.is_none()
    }
}

impl TaskFilter {
    /// Returns true when no criterion is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.priorities.is_empty()
            && self.statuses.is_empty()
            && self.assignees.is_empty()
            && self.tags.is_empty()
            && self.due.is_empty()
    }

    /// Merge a partial update into the stored criteria.
    pub fn merge(&mut self, update: FilterUpdate) {
        let FilterUpdate {
            search,
            priorities,
            statuses,
            assignees,
            tags,
            due,
        } = update;

        if let Some(text) = search {
            let trimmed = text.trim();
            self.search = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        }
        if let Some(priorities) = priorities {
            self.priorities = priorities.into_iter().collect();
        }
        if let Some(statuses) = statuses {
            self.statuses = statuses.into_iter().collect();
        }
        if let Some(assignees) = assignees {
            self.assignees = assignees.into_iter().collect();
        }
        if let Some(tags) = tags {
            self.tags = tags.into_iter().collect();
        }
        if let Some(due) = due {
            self.due = due;
        }
    }

    /// Clear every criterion.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Evaluate the predicate against a task.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(matcher) = self.search.as_deref().and_then(TextMatcher::new)
            && !matcher.matches(task)
        {
            return false;
        }
        if !self.priorities.is_empty() && !self.priorities.contains(&task.priority) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&task.section) {
            return false;
        }
        if !self.assignees.is_empty()
            && !task.assignees.iter().any(|id| self.assignees.contains(id))
        {
            return false;
        }
        if !self.tags.is_empty() && !task.tags.iter().any(|id| self.tags.contains(id)) {
            return false;
        }
        self.due.contains(task.due_date)
    }

    /// Derive the filtered collection from the full one, preserving order.
    #[must_use]
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        if self.is_empty() {
            return tasks.to_vec();
        }
        tasks.iter().filter(|task| self.matches(task)).cloned().collect()
    }
}
