//! Settings for a reformatting run.
//!
//! The settings file (`reframe.yml`) lives in the working directory and
//! tunes the layout constants, the default page size and the category
//! tables. Input and output folders come from the command line or, failing
//! that, from `INPUT_DIR` / `OUTPUT_REPORT_DIR` (a `.env` file is honoured).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::layout::{CategoryExtensions, CategoryTable, LayoutConfig, PageCanvas};

/// Default settings file name, resolved against the working directory.
pub const SETTINGS_FILE: &str = "reframe.yml";

pub const INPUT_DIR_VAR: &str = "INPUT_DIR";
pub const OUTPUT_DIR_VAR: &str = "OUTPUT_REPORT_DIR";

/// Theme step configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Whether base themes are replaced during `apply`. Default: true.
    pub enabled: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Settings loaded from `reframe.yml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Layout constants.
    pub layout: LayoutConfig,

    /// Canvas used when a page does not declare its own size.
    pub page: PageCanvas,

    /// Extra visual type tags per category.
    pub categories: CategoryExtensions,

    pub theme: ThemeConfig,
}

/// Errors that can occur when loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("'{field}' must be a positive integer (got {value})")]
    NonPositive { field: &'static str, value: i64 },

    #[error("visual type '{tag}' is listed under more than one category: {categories}")]
    OverlappingCategory { tag: String, categories: String },

    #[error("no input report given; pass a path or set INPUT_DIR")]
    InputNotSet,
}

impl Settings {
    /// Load settings from a file path.
    ///
    /// Returns the default settings if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let settings: Settings = serde_yaml::from_str(&content)?;
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(SettingsError::Io(e)),
        }
    }

    /// Load and validate in one step.
    pub fn load_validated(path: &Path) -> Result<Self, SettingsError> {
        let settings = Self::load(path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the layout core is not defined for.
    ///
    /// Every integer constant and the default page size must be positive,
    /// and category extensions must keep the membership sets disjoint.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let layout = &self.layout;
        let fields = [
            ("layout.grid_unit", layout.grid_unit),
            ("layout.margin", layout.margin),
            ("layout.gap", layout.gap),
            ("layout.kpi_height", layout.kpi_height),
            ("layout.slicer_width", layout.slicer_width),
            ("layout.table_height", layout.table_height),
            ("page.width", self.page.width),
            ("page.height", self.page.height),
        ];
        for (field, value) in fields {
            if value <= 0 {
                return Err(SettingsError::NonPositive { field, value });
            }
        }

        if let Some((tag, owners)) = self.category_table().overlaps().into_iter().next() {
            let categories = owners
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(SettingsError::OverlappingCategory { tag, categories });
        }

        Ok(())
    }

    /// The classification table with this run's extensions applied.
    pub fn category_table(&self) -> CategoryTable {
        CategoryTable::with_extensions(&self.categories)
    }
}

/// Resolve the input report folder from the CLI value or the environment.
pub fn resolve_input(cli: Option<PathBuf>) -> Result<PathBuf, SettingsError> {
    input_from(cli, std::env::var(INPUT_DIR_VAR).ok())
}

/// Resolve the output folder from the CLI value, the environment, or the
/// `<stem>_reformatted.Report` sibling of `input`.
pub fn resolve_output(cli: Option<PathBuf>, input: &Path) -> PathBuf {
    output_from(cli, std::env::var(OUTPUT_DIR_VAR).ok(), input)
}

fn input_from(cli: Option<PathBuf>, env: Option<String>) -> Result<PathBuf, SettingsError> {
    match (cli, env) {
        (Some(path), _) => Ok(path),
        (None, Some(value)) if !value.trim().is_empty() => Ok(expand(&value)),
        _ => Err(SettingsError::InputNotSet),
    }
}

fn output_from(cli: Option<PathBuf>, env: Option<String>, input: &Path) -> PathBuf {
    match (cli, env) {
        (Some(path), _) => path,
        (None, Some(value)) if !value.trim().is_empty() => expand(&value),
        _ => default_output(input),
    }
}

/// `<parent>/<stem>_reformatted.Report` next to the input folder.
pub fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    let name = format!("{stem}_reformatted.Report");
    match input.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

fn expand(value: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(value.trim()).into_owned())
}
