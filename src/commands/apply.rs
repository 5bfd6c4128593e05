//! Apply command - writes a reformatted copy of a report.

use std::path::Path;

use owo_colors::OwoColorize;

use crate::error_fmt::AppError;
use crate::report::{self, ReformatSummary};
use crate::Settings;

/// Reformat `input` into `output` and print a summary.
pub fn apply(input: &Path, output: &Path, settings: &Settings) -> Result<ReformatSummary, AppError> {
    let summary = report::reformat(input, output, settings)?;
    print!("{}", render_summary(&summary));
    Ok(summary)
}

pub fn render_summary(summary: &ReformatSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} {} files into {}\n",
        "copied".bright_green().bold(),
        summary.files_copied,
        summary.output.display().to_string().cyan()
    ));

    for page in &summary.pages {
        out.push_str(&format!(
            "  {} {} {}\n",
            "ok".bright_green(),
            page.display_name.bold(),
            format!("{} visuals positioned", page.positioned).dimmed()
        ));
        if page.skipped > 0 {
            out.push_str(&format!(
                "     {} {} visuals with a missing or duplicate name\n",
                "skipped".yellow(),
                page.skipped
            ));
        }
        if !page.degenerate.is_empty() {
            out.push_str(&format!(
                "     {} canvas too small for {}\n",
                "warning:".yellow().bold(),
                page.degenerate.join(", ")
            ));
        }
    }

    if summary.themes_updated > 0 {
        out.push_str(&format!(
            "{} {} theme file(s) to CorporateBlue\n",
            "restyled".bright_green().bold(),
            summary.themes_updated
        ));
    }

    out.push_str(&format!(
        "{} {} pages, {} visuals\n",
        "done:".bold(),
        summary.pages.len(),
        summary.visuals_positioned()
    ));
    out
}
