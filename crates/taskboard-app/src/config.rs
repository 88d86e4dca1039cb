use std::{collections::HashSet, fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use taskboard_core::projection::{DEFAULT_DUE_DATE_FORMAT, DueDateFormat};
use taskboard_core::seed::SEED_COLUMNS;

const CONFIG_DIR: &str = ".taskboard";
const CONFIG_FILE: &str = "config.toml";

/// Top-level project configuration loaded from `.taskboard/config.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub board: BoardConfig,
}

impl ProjectConfig {
    /// Load configuration from a working directory, falling back to defaults when absent.
    pub fn from_workdir(workdir: impl AsRef<Path>) -> Result<Self> {
        let config_path = workdir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::from_path(config_path)
    }

    /// Load configuration from an explicit file, which must exist.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse and validate TOML contents.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.board.ensure_columns()?;
        self.board.ensure_valid_default()?;
        self.board.due_date_format().map(|_| ())
    }
}

/// Board configuration block.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_columns")]
    columns: Vec<String>,
    #[serde(default = "default_section")]
    default_section: String,
    #[serde(default = "default_due_date_format")]
    due_date_format: String,
    #[serde(default = "default_seed")]
    seed: bool,
}

fn default_columns() -> Vec<String> {
    SEED_COLUMNS.iter().map(|title| (*title).to_owned()).collect()
}

fn default_section() -> String {
    "To Do".into()
}

fn default_due_date_format() -> String {
    DEFAULT_DUE_DATE_FORMAT.into()
}

const fn default_seed() -> bool {
    true
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            default_section: default_section(),
            due_date_format: default_due_date_format(),
            seed: default_seed(),
        }
    }
}

impl BoardConfig {
    /// Board with the given columns and no seed data. The first column becomes the default section.
    #[must_use]
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let default_section = columns.first().cloned().unwrap_or_else(default_section);
        Self {
            columns,
            default_section,
            due_date_format: default_due_date_format(),
            seed: false,
        }
    }

    /// Override whether demo data is loaded.
    #[must_use]
    pub const fn with_seed(mut self, seed: bool) -> Self {
        self.seed = seed;
        self
    }

    /// Declared column titles, in board order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Section given to tasks created without one.
    #[must_use]
    pub fn default_section(&self) -> &str {
        &self.default_section
    }

    /// Whether demo tasks are loaded into a new board.
    #[must_use]
    pub const fn seed(&self) -> bool {
        self.seed
    }

    /// Parse the configured due-date format.
    pub fn due_date_format(&self) -> Result<DueDateFormat> {
        DueDateFormat::parse(&self.due_date_format)
            .with_context(|| format!("invalid due_date_format '{}'", self.due_date_format))
    }

    fn ensure_columns(&self) -> Result<()> {
        if self.columns.is_empty() {
            bail!("board must declare at least one column");
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.trim().is_empty() {
                bail!("column titles must not be empty");
            }
            if !seen.insert(column.trim()) {
                bail!("duplicate column detected: {}", column.trim());
            }
        }
        Ok(())
    }

    fn ensure_valid_default(&self) -> Result<()> {
        let default = self.default_section();
        if default.trim().is_empty() {
            bail!("default section must not be empty");
        }
        if !self.columns.iter().any(|column| column.trim() == default.trim()) {
            bail!("default section '{default}' is not one of the configured columns");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(dir: &Path, contents: &str) -> Result<()> {
        let cfg_dir = dir.join(CONFIG_DIR);
        fs::create_dir_all(&cfg_dir)?;
        let mut file = fs::File::create(cfg_dir.join(CONFIG_FILE))?;
        writeln!(file, "{contents}")?;
        Ok(())
    }

    #[test]
    fn missing_config_returns_builtin_board() -> Result<()> {
        let dir = tempdir()?;
        let cfg = ProjectConfig::from_workdir(dir.path())?;
        assert_eq!(cfg.board.columns().len(), 4);
        assert_eq!(cfg.board.default_section(), "To Do");
        assert!(cfg.board.seed());
        Ok(())
    }

    #[test]
    fn load_config_with_columns() -> Result<()> {
        let dir = tempdir()?;
        write_config(
            dir.path(),
            "[board]\ncolumns = [\"Backlog\", \"Doing\", \"Done\"]\ndefault_section = \"Backlog\"\nseed = false",
        )?;

        let cfg = ProjectConfig::from_workdir(dir.path())?;
        assert_eq!(cfg.board.columns(), ["Backlog", "Doing", "Done"]);
        assert_eq!(cfg.board.default_section(), "Backlog");
        assert!(!cfg.board.seed());
        Ok(())
    }

    #[test]
    fn duplicate_columns_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        write_config(
            dir.path(),
            "[board]\ncolumns = [\"To Do\", \"To Do\"]",
        )?;

        let Err(err) = ProjectConfig::from_workdir(dir.path()) else {
            panic!("duplicate column should error");
        };
        assert!(format!("{err:#}").contains("duplicate column"));
        Ok(())
    }

    #[test]
    fn default_section_must_be_a_column() {
        let Err(err) = ProjectConfig::from_toml("[board]\ncolumns = [\"Doing\"]\ndefault_section = \"Later\"")
        else {
            panic!("unknown default section should error");
        };
        assert!(err.to_string().contains("default section 'Later'"));
    }

    #[test]
    fn empty_column_list_is_rejected() {
        let Err(err) = ProjectConfig::from_toml("[board]\ncolumns = []") else {
            panic!("empty column list should error");
        };
        assert!(err.to_string().contains("at least one column"));
    }

    #[test]
    fn malformed_due_date_format_is_rejected() {
        let Err(err) = ProjectConfig::from_toml("[board]\ndue_date_format = \"[bogus]\"") else {
            panic!("malformed format should error");
        };
        assert!(err.to_string().contains("due_date_format"));
    }

    #[test]
    fn explicit_path_must_exist() -> Result<()> {
        let dir = tempdir()?;
        let missing = dir.path().join("nope.toml");
        assert!(ProjectConfig::from_path(&missing).is_err());
        Ok(())
    }

    #[test]
    fn from_columns_disables_seed_and_uses_first_column() {
        let cfg = BoardConfig::from_columns(["Inbox", "Done"]);
        assert_eq!(cfg.default_section(), "Inbox");
        assert!(!cfg.seed());
        assert!(cfg.with_seed(true).seed());
    }

    #[test]
    fn columns_differing_only_in_whitespace_are_duplicates() {
        let Err(err) = ProjectConfig::from_toml("[board]\ncolumns = [\"To Do\", \"To Do \"]") else {
            panic!("whitespace-padded duplicate should error");
        };
        assert!(err.to_string().contains("duplicate column detected: To Do"));
    }

    #[test]
    fn padded_default_section_matches_its_column() {
        let cfg = ProjectConfig::from_toml(
            "[board]\ncolumns = [\"Doing\", \"Done\"]\ndefault_section = \" Doing \"",
        )
        .unwrap_or_else(|err| panic!("padded default should load: {err:#}"));
        assert_eq!(cfg.board.default_section().trim(), "Doing");
    }
}
