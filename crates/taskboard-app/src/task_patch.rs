use serde::{Deserialize, Deserializer};
use taskboard_core::id::{AssigneeId, TagId};
use taskboard_core::task::dedup_ordered;
use taskboard_core::{Priority, Task, parse_iso_date};
use time::Date;

/// Fields for a new task. Omitted fields take their documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Display title (required, trimmed).
    pub title: String,
    /// Markdown description.
    #[serde(default)]
    pub description: Option<String>,
    /// Target section; the board's default section when absent.
    #[serde(default)]
    pub section: Option<String>,
    /// Priority, unset when absent.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Due date.
    #[serde(default, deserialize_with = "deserialize_date")]
    pub due_date: Option<Date>,
    /// Completion flag.
    #[serde(default)]
    pub is_completed: bool,
    /// Tag references.
    #[serde(default)]
    pub tags: Vec<TagId>,
    /// Assignee references.
    #[serde(default)]
    pub assignees: Vec<AssigneeId>,
}

impl NewTask {
    /// Start a new task with just a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Place the task in a section.
    #[must_use]
    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the due date.
    #[must_use]
    pub const fn due(mut self, date: Date) -> Self {
        self.due_date = Some(date);
        self
    }
}

/// Shallow partial update. Present fields replace the task's values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New section.
    #[serde(default)]
    pub section: Option<String>,
    /// New priority.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// `Some(None)` clears the due date; JSON `null` maps to it.
    #[serde(default, deserialize_with = "deserialize_date_patch")]
    pub due_date: Option<Option<Date>>,
    /// New completion flag.
    #[serde(default)]
    pub is_completed: Option<bool>,
    /// Replacement tag references.
    #[serde(default)]
    pub tags: Option<Vec<TagId>>,
    /// Replacement assignee references.
    #[serde(default)]
    pub assignees: Option<Vec<AssigneeId>>,
}

impl TaskPatch {
    /// Patch touching only the completion flag.
    #[must_use]
    pub fn completion(is_completed: bool) -> Self {
        Self {
            is_completed: Some(is_completed),
            ..Self::default()
        }
    }

    /// Returns true when the patch would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.section.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.is_completed.is_none()
            && self.tags.is_none()
            && self.assignees.is_none()
    }

    /// Title after trimming, if the patch sets one.
    pub(crate) fn trimmed_title(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim)
    }

    /// Merge into a task. Section and title must already be normalized by the caller.
    pub(crate) fn apply_to(self, task: &mut Task) {
        let Self {
            title,
            description,
            section,
            priority,
            due_date,
            is_completed,
            tags,
            assignees,
        } = self;

        if let Some(title) = title {
            task.title = title.trim().to_owned();
        }
        if let Some(description) = description {
            task.description = description;
        }
        if let Some(section) = section {
            task.section = section;
        }
        if let Some(priority) = priority {
            task.priority = priority;
        }
        if let Some(due_date) = due_date {
            task.due_date = due_date;
        }
        if let Some(is_completed) = is_completed {
            task.is_completed = is_completed;
        }
        if let Some(tags) = tags {
            task.tags = dedup_ordered(tags);
        }
        if let Some(assignees) = assignees {
            task.assignees = dedup_ordered(assignees);
        }
    }
}

fn deserialize_date<'de, D>(d: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(d)?
        .map(|raw| parse_iso_date(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

fn deserialize_date_patch<'de, D>(d: D) -> Result<Option<Option<Date>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_date(d).map(Some)
}
