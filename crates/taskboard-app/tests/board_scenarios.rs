//! End-to-end board behaviour: store mutations, filters, projections and drags together.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::BTreeSet;

use taskboard_app::{
    BoardConfig, BoardService, DragController, FilterBuilder, NewTask, Placement, TaskBoard,
};
use taskboard_core::id::{ColumnId, TaskId};
use taskboard_core::{DueDateFormat, EntityCatalog, FilterUpdate, Priority, Task};

fn column_ids(board: &TaskBoard, title: &str) -> Vec<u64> {
    board
        .projection()
        .board
        .iter()
        .find(|column| column.title == title)
        .map(|column| column.tasks.iter().map(|task| task.id.0).collect())
        .unwrap_or_default()
}

fn all_ids(board: &TaskBoard) -> BTreeSet<u64> {
    board.tasks().iter().map(|task| task.id.0).collect()
}

#[test]
fn adding_to_seeded_board_assigns_next_id() {
    let mut board = TaskBoard::seeded();
    let id = board
        .add_task(NewTask::titled("Fix bug").in_section("To Do"))
        .expect("add task");

    assert_eq!(id.to_string(), "13");
    let projection = board.projection();
    let todo = projection
        .board
        .iter()
        .find(|column| column.title == "To Do")
        .expect("to do column");
    assert!(todo.tasks.iter().any(|task| task.content == "Fix bug"));
}

#[test]
fn high_priority_filter_yields_three_tasks() {
    let mut board = TaskBoard::seeded();
    let update = FilterBuilder::new()
        .with_priorities(&["High".to_owned()])
        .expect("priority")
        .build();
    board.update_filter(update);

    assert_eq!(board.filtered().len(), 3);
    assert!(board.filtered().iter().all(|task| task.priority == Priority::High));
    assert_eq!(board.projection().board_task_count(), 3);
}

#[test]
fn dragging_onto_done_column_moves_task() {
    let mut board = TaskBoard::seeded();
    assert!(board.move_task(TaskId(5), "To Do"));
    let todo_before = column_ids(&board, "To Do").len();
    let done_before = column_ids(&board, "Done").len();

    let mut drag = DragController::new();
    assert!(drag.start(&board, "task-5"));
    assert!(drag.drop(&mut board, "column-4").is_committed());

    assert_eq!(column_ids(&board, "To Do").len(), todo_before - 1);
    assert_eq!(column_ids(&board, "Done").len(), done_before + 1);
    assert_eq!(board.task(TaskId(5)).expect("task 5").section, "Done");
}

#[test]
fn dragging_onto_task_in_same_column_lands_at_its_index() {
    let tasks: Vec<Task> = [(1, "a"), (2, "b"), (5, "five"), (3, "c"), (8, "eight")]
        .into_iter()
        .map(|(id, title)| Task::new(TaskId(id), title, "In Progress"))
        .collect();
    let columns = vec!["To Do".to_owned(), "In Progress".to_owned()];
    let mut board = TaskBoard::from_parts(
        &columns,
        "To Do",
        tasks,
        EntityCatalog::seed(),
        DueDateFormat::default(),
    )
    .expect("board");
    assert_eq!(column_ids(&board, "In Progress"), vec![1, 2, 5, 3, 8]);

    let mut drag = DragController::new();
    assert!(drag.start(&board, "task-5"));
    assert!(drag.drop(&mut board, "task-8").is_committed());

    let after = column_ids(&board, "In Progress");
    assert_eq!(after, vec![1, 2, 3, 8, 5]);
    assert_eq!(after.iter().position(|id| *id == 5), Some(4));
}

#[test]
fn deleting_in_progress_moves_its_tasks_to_first_column() {
    let mut board = TaskBoard::seeded();
    assert_eq!(column_ids(&board, "In Progress").len(), 3);

    assert!(board.delete_column(ColumnId(2)).expect("delete column"));

    assert!(board.tasks().iter().all(|task| task.section != "In Progress"));
    for id in [5, 6, 7] {
        assert_eq!(board.task(TaskId(id)).expect("task").section, "To Do");
    }
    assert!(board.projection().board.iter().all(|column| !column.synthesized));
}

#[test]
fn task_ids_stay_unique_across_adds_and_deletes() {
    let mut board = TaskBoard::seeded();
    let mut seen: BTreeSet<TaskId> = board.tasks().iter().map(|task| task.id).collect();
    for round in 0..20 {
        let id = board
            .add_task(NewTask::titled(format!("task {round}")))
            .expect("add");
        assert!(seen.insert(id), "id {id} reused");
        if round % 3 == 0 {
            assert!(board.delete_task(id));
        }
    }
}

#[test]
fn filters_narrow_and_reset_restores() {
    let mut board = TaskBoard::seeded();
    let full = all_ids(&board);
    let updates = [
        FilterUpdate {
            search: Some("login".into()),
            ..FilterUpdate::default()
        },
        FilterUpdate {
            statuses: Some(vec!["Done".into(), "In Review".into()]),
            ..FilterUpdate::default()
        },
        FilterUpdate {
            priorities: Some(vec![Priority::Medium]),
            ..FilterUpdate::default()
        },
    ];

    for update in updates {
        board.update_filter(update);
        let visible: BTreeSet<u64> = board.filtered().iter().map(|task| task.id.0).collect();
        assert!(visible.is_subset(&full));
        assert_eq!(all_ids(&board), full);
    }

    board.reset_filters();
    let visible: BTreeSet<u64> = board.filtered().iter().map(|task| task.id.0).collect();
    assert_eq!(visible, full);
}

#[test]
fn drops_preserve_task_count() {
    let mut board = TaskBoard::seeded();
    let mut drag = DragController::new();
    let gestures = [
        ("task-1", "column-2"),
        ("task-6", "task-9"),
        ("task-12", "task-2"),
        ("task-3", "column-3"),
        ("task-4", "task-4"),
        ("task-8", "column-auto-1"),
    ];
    for (active, over) in gestures {
        drag.start(&board, active);
        drag.drop(&mut board, over);
        assert_eq!(board.tasks().len(), 12);
        assert_eq!(board.projection().board_task_count(), 12);
    }
}

#[test]
fn same_column_reorder_is_a_permutation() {
    let mut board = TaskBoard::seeded();
    let before: BTreeSet<u64> = column_ids(&board, "To Do").into_iter().collect();
    for (from, to) in [(0, 3), (3, 1), (2, 2), (-1, 9)] {
        board.reorder_tasks(from, to, Some("To Do"));
        let after = column_ids(&board, "To Do");
        assert_eq!(after.len(), before.len());
        assert_eq!(after.into_iter().collect::<BTreeSet<_>>(), before);
    }
}

#[test]
fn column_rename_leaves_no_task_behind() {
    let mut board = TaskBoard::seeded();
    assert!(board.update_column(ColumnId(3), "QA").expect("rename"));
    assert!(board.tasks().iter().all(|task| task.section != "In Review"));
    assert_eq!(column_ids(&board, "QA"), vec![8, 9]);
}

#[test]
fn moved_task_lands_inside_target_section() {
    let mut board = TaskBoard::seeded();
    assert!(board.move_task_to(TaskId(12), "To Do", Placement::Index(0)));
    assert_eq!(column_ids(&board, "To Do"), vec![12, 1, 2, 3, 4]);
}

#[test]
fn configured_board_without_seed_starts_empty() {
    let config = BoardConfig::from_columns(["Inbox", "Doing", "Shipped"]);
    let mut service = BoardService::new(&config).expect("service");
    assert!(service.board().tasks().is_empty());
    assert_eq!(service.projection().board.len(), 3);

    let outcomes = service
        .run_script(
            r#"
            {"op":"addTask","title":"Write release notes"}
            {"op":"addTask","title":"Tag release","section":"Doing","priority":"High"}
            {"op":"updateColumn","id":"3","title":"Released"}
            "#,
        )
        .expect("script");
    assert_eq!(outcomes.len(), 3);
    assert_eq!(column_ids(service.board(), "Inbox"), vec![1]);
    assert_eq!(column_ids(service.board(), "Doing"), vec![2]);
    assert_eq!(service.board().columns()[2].title, "Released");
}
