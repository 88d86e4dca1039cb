//! CLI entry point for taskboard.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use taskboard_app::{BoardService, ProjectConfig};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;

/// Kanban board engine driven from the command line.
#[derive(Parser, Debug)]
#[command(
    name = "taskboard",
    version,
    about = "taskboard: filterable list and board views over a task collection"
)]
struct Cli {
    /// Directory holding `.taskboard/config.toml` (defaults to current).
    #[arg(long)]
    workdir: Option<PathBuf>,

    /// Explicit config file; overrides the workdir lookup.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start without the demo tasks.
    #[arg(long)]
    empty: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the flat list view.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Print the board view grouped by column.
    Board {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Replay a JSON-lines command script, then print the board.
    Run {
        /// Script with one command object per line.
        script: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

/// Filter flags shared by the view commands.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Case-insensitive text over title and description.
    #[arg(long)]
    search: Option<String>,
    /// Accepted priority (repeatable).
    #[arg(short = 'p', long = "priority")]
    priorities: Vec<String>,
    /// Accepted section (repeatable).
    #[arg(short = 's', long = "status")]
    statuses: Vec<String>,
    /// Accepted assignee id (repeatable).
    #[arg(short = 'a', long = "assignee")]
    assignees: Vec<String>,
    /// Accepted tag id (repeatable).
    #[arg(short = 't', long = "tag")]
    tags: Vec<String>,
    /// Earliest due date (YYYY-MM-DD).
    #[arg(long)]
    due_from: Option<String>,
    /// Latest due date (YYYY-MM-DD).
    #[arg(long)]
    due_to: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    install_tracing();

    let mut service = open_service(&cli)?;
    commands::run(cli.cmd, &mut service, &mut std::io::stdout().lock())
}

fn open_service(cli: &Cli) -> Result<BoardService> {
    let config = match (&cli.config, &cli.workdir) {
        (Some(path), _) => ProjectConfig::from_path(path)?,
        (None, Some(dir)) => ProjectConfig::from_workdir(dir)?,
        (None, None) => ProjectConfig::from_workdir(".")?,
    };
    let mut board = config.board;
    if cli.empty {
        board = board.with_seed(false);
    }
    BoardService::new(&board)
}

fn install_tracing() {
    // RUST_LOG is honoured; default is INFO. Logs go to stderr to keep stdout parseable.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parse_list_with_filters() {
        let cli = Cli::parse_from([
            "taskboard",
            "list",
            "--priority",
            "High",
            "--priority",
            "low",
            "--status",
            "In Progress",
            "--due-from",
            "2025-02-01",
            "--format",
            "json",
        ]);

        match cli.cmd {
            Command::List { filter, format } => {
                assert_eq!(filter.priorities, vec!["High", "low"]);
                assert_eq!(filter.statuses, vec!["In Progress"]);
                assert_eq!(filter.due_from.as_deref(), Some("2025-02-01"));
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn parse_run_with_global_flags() {
        let cli = Cli::parse_from(["taskboard", "--empty", "--config", "board.toml", "run", "demo.jsonl"]);
        assert!(cli.empty);
        assert_eq!(cli.config, Some(PathBuf::from("board.toml")));
        match cli.cmd {
            Command::Run { script, format } => {
                assert_eq!(script, PathBuf::from("demo.jsonl"));
                assert_eq!(format, OutputFormat::Table);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn empty_flag_disables_seed() {
        let cli = Cli::parse_from(["taskboard", "--empty", "board"]);
        let service = open_service(&cli).unwrap_or_else(|err| panic!("service: {err:#}"));
        assert!(service.board().tasks().is_empty());
        assert_eq!(service.board().columns().len(), 4);
    }

    #[test]
    fn explicit_config_is_loaded() {
        let dir = tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let path = dir.path().join("board.toml");
        fs::write(&path, "[board]\ncolumns = [\"Inbox\", \"Done\"]\ndefault_section = \"Inbox\"\nseed = false\n")
            .unwrap_or_else(|err| panic!("write config: {err}"));
        let path_arg = path.to_string_lossy().into_owned();

        let cli = Cli::parse_from(["taskboard", "--config", path_arg.as_str(), "board"]);
        let service = open_service(&cli).unwrap_or_else(|err| panic!("service: {err:#}"));
        let titles: Vec<&str> = service
            .board()
            .columns()
            .iter()
            .map(|column| column.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Inbox", "Done"]);
    }
}
