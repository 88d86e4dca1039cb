//! Demo data loaded into a fresh board when seeding is enabled.

use crate::id::{AssigneeId, TagId, TaskId};
use crate::task::{Priority, Task};
use time::Date;
use time::macros::date;

/// Column titles of the demo board, in board order.
pub const SEED_COLUMNS: [&str; 4] = ["To Do", "In Progress", "In Review", "Done"];

struct SeedTask {
    title: &'static str,
    section: &'static str,
    priority: Priority,
    due: Option<Date>,
    completed: bool,
    tags: &'static [u64],
    assignees: &'static [u64],
}

const SEED_TASKS: [SeedTask; 12] = [
    SeedTask {
        title: "Design login screen",
        section: "To Do",
        priority: Priority::High,
        due: Some(date!(2025 - 02 - 10)),
        completed: false,
        tags: &[1],
        assignees: &[1],
    },
    SeedTask {
        title: "Write API documentation",
        section: "To Do",
        priority: Priority::Low,
        due: Some(date!(2025 - 02 - 20)),
        completed: false,
        tags: &[4],
        assignees: &[3],
    },
    SeedTask {
        title: "Research charting libraries",
        section: "To Do",
        priority: Priority::Medium,
        due: None,
        completed: false,
        tags: &[5, 2],
        assignees: &[2],
    },
    SeedTask {
        title: "Plan newsletter campaign",
        section: "To Do",
        priority: Priority::Unset,
        due: Some(date!(2025 - 03 - 01)),
        completed: false,
        tags: &[6],
        assignees: &[5],
    },
    SeedTask {
        title: "Implement task filters",
        section: "In Progress",
        priority: Priority::High,
        due: Some(date!(2025 - 02 - 14)),
        completed: false,
        tags: &[2],
        assignees: &[2, 4],
    },
    SeedTask {
        title: "Fix session timeout bug",
        section: "In Progress",
        priority: Priority::Medium,
        due: Some(date!(2025 - 02 - 05)),
        completed: false,
        tags: &[3, 2],
        assignees: &[4],
    },
    SeedTask {
        title: "Profile settings page",
        section: "In Progress",
        priority: Priority::Low,
        due: None,
        completed: false,
        tags: &[1, 2],
        assignees: &[1],
    },
    SeedTask {
        title: "Review MFA flow",
        section: "In Review",
        priority: Priority::High,
        due: Some(date!(2025 - 02 - 12)),
        completed: false,
        tags: &[2],
        assignees: &[3, 5],
    },
    SeedTask {
        title: "Update onboarding copy",
        section: "In Review",
        priority: Priority::Low,
        due: None,
        completed: false,
        tags: &[6, 4],
        assignees: &[5],
    },
    SeedTask {
        title: "Set up CI pipeline",
        section: "Done",
        priority: Priority::Medium,
        due: Some(date!(2025 - 01 - 20)),
        completed: true,
        tags: &[2],
        assignees: &[4],
    },
    SeedTask {
        title: "Create colour palette",
        section: "Done",
        priority: Priority::Unset,
        due: Some(date!(2025 - 01 - 15)),
        completed: true,
        tags: &[1],
        assignees: &[1],
    },
    SeedTask {
        title: "Audit dependency licenses",
        section: "Done",
        priority: Priority::Medium,
        due: None,
        completed: true,
        tags: &[5],
        assignees: &[2],
    },
];

/// Demo tasks with ids `1..=12`, in authoritative order.
#[must_use]
pub fn seed_tasks() -> Vec<Task> {
    (1_u64..)
        .zip(SEED_TASKS.iter())
        .map(|(id, seed)| {
            let mut task = Task::new(TaskId(id), seed.title, seed.section);
            task.priority = seed.priority;
            task.due_date = seed.due;
            task.is_completed = seed.completed;
            task.set_tags(seed.tags.iter().copied().map(TagId));
            task.set_assignees(seed.assignees.iter().copied().map(AssigneeId));
            task
        })
        .collect()
}
