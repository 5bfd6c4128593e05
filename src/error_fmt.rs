use std::fmt;

use owo_colors::OwoColorize;

use crate::report::ReportError;
use crate::settings::{SettingsError, INPUT_DIR_VAR};

/// Application error with context for actionable error messages.
#[derive(Debug)]
pub enum AppError {
    /// Settings could not be loaded or failed validation
    Settings { path: String, source: SettingsError },
    /// Reading or writing the report failed
    Report(ReportError),
    /// Layout could not be serialized for --json output
    Serialize(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Settings { path, source } => {
                write!(f, "{}", format_settings_error(source, path))
            }
            AppError::Report(source) => write!(f, "{}", format_report_error(source)),
            AppError::Serialize(source) => {
                write!(f, "{}", format_cli_error(&format!("failed to serialize layout: {}", source)))
            }
        }
    }
}

impl std::error::Error for AppError {}

impl From<ReportError> for AppError {
    fn from(e: ReportError) -> Self {
        AppError::Report(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialize(e)
    }
}

/// Extension trait to add settings file context to settings results.
pub trait SettingsResultExt<T> {
    fn with_settings_path(self, path: &str) -> Result<T, AppError>;
}

impl<T> SettingsResultExt<T> for Result<T, SettingsError> {
    fn with_settings_path(self, path: &str) -> Result<T, AppError> {
        self.map_err(|e| AppError::Settings {
            path: path.to_string(),
            source: e,
        })
    }
}

// ============================================================================
// Formatting functions (internal implementation)
// ============================================================================

fn format_cli_error(message: &str) -> String {
    format!("{}: {}\n", "error".red().bold(), message)
}

fn format_settings_error(error: &SettingsError, path: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}: ", "error".red().bold()));

    match error {
        SettingsError::Io(io_err) => {
            out.push_str(&format!("could not read {}\n", path.cyan()));
            out.push('\n');
            out.push_str(&format!("  {}\n", io_err.to_string().dimmed()));
        }
        SettingsError::Parse(yaml_err) => {
            out.push_str(&format!("invalid YAML in {}\n", path.cyan()));
            out.push('\n');
            out.push_str(&format!("  {}\n", yaml_err.to_string().dimmed()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Check the keys against the sections {}, {}, {} and {}\n",
                "layout".cyan(),
                "page".cyan(),
                "categories".cyan(),
                "theme".cyan()
            ));
        }
        SettingsError::NonPositive { field, value } => {
            out.push_str(&format!(
                "'{}' must be a positive integer, got {}\n",
                field.yellow(),
                value.to_string().yellow()
            ));
            out.push('\n');
            out.push_str(&format!(
                "  {}\n",
                "Layout sizes, margins and page dimensions must all be greater than zero.".dimmed()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Set {} to a value above 0 in {}, or remove it to use the default\n",
                field.cyan(),
                path.cyan()
            ));
        }
        SettingsError::OverlappingCategory { tag, categories } => {
            out.push_str(&format!(
                "visual type '{}' is listed under more than one category ({})\n",
                tag.yellow(),
                categories
            ));
            out.push('\n');
            out.push_str(&format!(
                "  {}\n",
                "Each visual type must map to exactly one category.".dimmed()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Remove '{}' from all but one list under {} in {}\n",
                tag.cyan(),
                "categories".cyan(),
                path.cyan()
            ));
        }
        SettingsError::InputNotSet => {
            out.push_str("no input report given\n");
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    1. Pass the report folder: {}\n",
                "reframe apply path/to/Name.Report".cyan()
            ));
            out.push_str(&format!(
                "    2. Or set {} in the environment or a {} file\n",
                INPUT_DIR_VAR.cyan(),
                ".env".cyan()
            ));
        }
    }

    out
}

fn format_report_error(error: &ReportError) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}: ", "error".red().bold()));

    match error {
        ReportError::Io {
            action,
            path,
            source,
        } => {
            out.push_str(&format!(
                "failed to {} {}\n",
                action,
                path.display().to_string().cyan()
            ));
            out.push('\n');
            out.push_str(&format!("  {}\n", source.to_string().dimmed()));
        }
        ReportError::Json { path, source } => {
            out.push_str(&format!(
                "invalid JSON in {}\n",
                path.display().to_string().cyan()
            ));
            out.push('\n');
            out.push_str(&format!("  {}\n", source.to_string().dimmed()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str("    Re-save the report from Power BI Desktop as a PBIR project\n");
        }
        ReportError::InputNotFound(path) => {
            out.push_str(&format!(
                "input report '{}' not found\n",
                path.display().to_string().yellow()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Point to the {} folder saved next to your .pbip file\n",
                "Name.Report".cyan()
            ));
        }
        ReportError::NotADirectory(path) => {
            out.push_str(&format!(
                "input '{}' is not a folder\n",
                path.display().to_string().yellow()
            ));
            out.push('\n');
            out.push_str(&format!(
                "  {}\n",
                "Only PBIR report folders are supported, not .pbix files.".dimmed()
            ));
        }
        ReportError::OverlappingPaths { input, output } => {
            out.push_str(&format!(
                "output '{}' overlaps input '{}'\n",
                output.display().to_string().yellow(),
                input.display().to_string().yellow()
            ));
            out.push('\n');
            out.push_str(&format!(
                "  {}\n",
                "The output folder is deleted before copying, so it must be separate from the input."
                    .dimmed()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Choose another folder with {}, or omit it to write next to the input\n",
                "--output".cyan()
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn strip_ansi(s: &str) -> String {
        let re = regex::Regex::new(r"\x1b\[[0-9;]*m").unwrap();
        re.replace_all(s, "").to_string()
    }

    #[test]
    fn test_format_non_positive() {
        let err = AppError::Settings {
            path: "reframe.yml".to_string(),
            source: SettingsError::NonPositive {
                field: "layout.gap",
                value: -5,
            },
        };
        let stripped = strip_ansi(&err.to_string());

        assert!(stripped.contains("error:"));
        assert!(stripped.contains("'layout.gap' must be a positive integer, got -5"));
        assert!(stripped.contains("To fix this"));
        assert!(stripped.contains("reframe.yml"));
    }

    #[test]
    fn test_format_overlapping_category() {
        let err = AppError::Settings {
            path: "reframe.yml".to_string(),
            source: SettingsError::OverlappingCategory {
                tag: "card".to_string(),
                categories: "kpi, table".to_string(),
            },
        };
        let stripped = strip_ansi(&err.to_string());

        assert!(stripped.contains("visual type 'card'"));
        assert!(stripped.contains("(kpi, table)"));
        assert!(stripped.contains("Remove 'card'"));
    }

    #[test]
    fn test_format_input_not_set() {
        let err = AppError::Settings {
            path: "reframe.yml".to_string(),
            source: SettingsError::InputNotSet,
        };
        let stripped = strip_ansi(&err.to_string());

        assert!(stripped.contains("no input report given"));
        assert!(stripped.contains("INPUT_DIR"));
        assert!(stripped.contains(".env"));
    }

    #[test]
    fn test_format_input_not_found() {
        let err = AppError::from(ReportError::InputNotFound(PathBuf::from("Sales.Report")));
        let stripped = strip_ansi(&err.to_string());

        assert!(stripped.contains("error:"));
        assert!(stripped.contains("input report 'Sales.Report' not found"));
        assert!(stripped.contains("To fix this"));
    }

    #[test]
    fn test_format_overlapping_paths() {
        let err = AppError::from(ReportError::OverlappingPaths {
            input: PathBuf::from("in.Report"),
            output: PathBuf::from("in.Report/out"),
        });
        let stripped = strip_ansi(&err.to_string());

        assert!(stripped.contains("output 'in.Report/out' overlaps input 'in.Report'"));
        assert!(stripped.contains("--output"));
    }

    #[test]
    fn test_format_io_error() {
        let err = AppError::from(ReportError::Io {
            action: "read",
            path: PathBuf::from("page.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        let stripped = strip_ansi(&err.to_string());

        assert!(stripped.contains("failed to read page.json"));
        assert!(stripped.contains("denied"));
    }
}
