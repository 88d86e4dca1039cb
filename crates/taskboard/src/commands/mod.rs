use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use taskboard_app::{BoardService, CommandOutcome, FilterBuilder};
use taskboard_core::{BoardColumn, FilterUpdate, ViewTask};

use crate::{Command, FilterArgs, OutputFormat};

/// Execute a view or script command against the service, writing to `out`.
pub fn run(command: Command, service: &mut BoardService, out: &mut impl Write) -> Result<()> {
    match command {
        Command::List { filter, format } => {
            apply_filter(service, filter)?;
            let projection = service.projection();
            match format {
                OutputFormat::Table => render_list(out, &projection.list)?,
                OutputFormat::Json => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&projection.list)?)?;
                }
            }
        }
        Command::Board { filter, format } => {
            apply_filter(service, filter)?;
            print_board(service, format, out)?;
        }
        Command::Run { script, format } => {
            let contents = fs::read_to_string(&script)
                .with_context(|| format!("failed to read script {}", script.display()))?;
            let outcomes = service.run_script(&contents)?;
            print_outcomes(&outcomes, format, out)?;
            print_board(service, format, out)?;
        }
    }
    Ok(())
}

fn apply_filter(service: &mut BoardService, args: FilterArgs) -> Result<()> {
    let update = build_filter(args)?;
    if !update.is_empty() {
        service.board_mut().update_filter(update);
    }
    Ok(())
}

fn build_filter(args: FilterArgs) -> Result<FilterUpdate> {
    let FilterArgs {
        search,
        priorities,
        statuses,
        assignees,
        tags,
        due_from,
        due_to,
    } = args;

    let update = FilterBuilder::new()
        .with_search(search)
        .with_statuses(&statuses)
        .with_priorities(&priorities)?
        .with_assignees(&assignees)?
        .with_tags(&tags)?
        .with_due_range(due_from, due_to)?
        .build();
    Ok(update)
}

fn print_board(service: &BoardService, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let projection = service.projection();
    match format {
        OutputFormat::Table => render_board(out, &projection.board)?,
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&projection.board)?)?;
        }
    }
    Ok(())
}

fn print_outcomes(
    outcomes: &[CommandOutcome],
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    for outcome in outcomes {
        match format {
            OutputFormat::Table => writeln!(out, "{}", describe_outcome(outcome))?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(outcome)?)?,
        }
    }
    Ok(())
}

fn describe_outcome(outcome: &CommandOutcome) -> String {
    match outcome {
        CommandOutcome::TaskCreated { id } => format!("created task: {id}"),
        CommandOutcome::ColumnCreated { id } => format!("created column: {id}"),
        CommandOutcome::CommentAdded { task, id } => id.map_or_else(
            || format!("no task {task} to comment on"),
            |id| format!("commented on {task}: {id}"),
        ),
        CommandOutcome::AttachmentAdded { task, id } => id.map_or_else(
            || format!("no task {task} to attach to"),
            |id| format!("attached to {task}: {id}"),
        ),
        CommandOutcome::Applied { changed: true } => "applied".to_owned(),
        CommandOutcome::Applied { changed: false } => "no change".to_owned(),
        CommandOutcome::FilterChanged { filter } if filter.is_empty() => "filters cleared".to_owned(),
        CommandOutcome::FilterChanged { .. } => "filter updated".to_owned(),
        CommandOutcome::DragStarted { accepted } => {
            if *accepted {
                "drag started".to_owned()
            } else {
                "drag not started".to_owned()
            }
        }
        CommandOutcome::Preview { preview } => preview.map_or_else(
            || "no drop target".to_owned(),
            |preview| format!("would drop into column {} at {}", preview.column, preview.index),
        ),
        CommandOutcome::Dropped { outcome } => format!("drop: {outcome:?}"),
    }
}

fn render_list(out: &mut impl Write, tasks: &[ViewTask]) -> Result<()> {
    if tasks.is_empty() {
        writeln!(out, "No tasks matched")?;
        return Ok(());
    }
    writeln!(out, "ID | Title | Section | Priority | Due | Tags | Assignees | Done")?;
    writeln!(out, "-- | ----- | ------- | -------- | --- | ---- | --------- | ----")?;
    for task in tasks {
        writeln!(
            out,
            "{} | {} | {} | {} | {} | {} | {} | {}",
            task.id,
            task.content,
            task.section,
            or_dash(task.priority.as_str()),
            task.due_date.as_deref().unwrap_or("-"),
            join_or_dash(&task.tags),
            join_or_dash(&task.assignees),
            if task.is_completed { "yes" } else { "no" },
        )?;
    }
    Ok(())
}

fn render_board(out: &mut impl Write, columns: &[BoardColumn]) -> Result<()> {
    for column in columns {
        let marker = if column.synthesized { " *" } else { "" };
        writeln!(
            out,
            "== {} [{}]{} ({})",
            column.title,
            column.id,
            marker,
            column.tasks.len()
        )?;
        for task in &column.tasks {
            let check = if task.is_completed { "x" } else { " " };
            let priority = if task.priority.as_str().is_empty() {
                String::new()
            } else {
                format!(" !{}", task.priority)
            };
            writeln!(out, "  [{check}] {} {}{priority}", task.id, task.content)?;
        }
    }
    Ok(())
}

const fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_owned()
    } else {
        values.join(", ")
    }
}
