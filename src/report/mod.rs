//! Report orchestration: everything that touches the filesystem.
//!
//! This module contains:
//! - `Page` - one page folder, its canvas and its visuals
//! - `plan_report` - read-only planning of every page of a report
//! - `reformat` - copy a report, rewrite every visual position, apply the theme
//! - Theme replacement for the report's base themes

mod page;
pub mod theme;

use std::collections::BTreeSet;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::layout::{Category, CategoryTable, Layout, VisualPools, Zones, plan};
use crate::settings::Settings;

pub use page::{
    merge_position, visual_type, Page, SkipReason, SkippedVisual, PAGE_FILE, UNKNOWN_TYPE,
    VISUALS_DIR, VISUAL_FILE,
};

/// Pages folder relative to the report root.
pub const PAGES_DIR: &str = "definition/pages";

/// Page ordering metadata inside [`PAGES_DIR`].
pub const PAGES_META_FILE: &str = "pages.json";

/// Errors raised while reading or writing a report folder.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("input report not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("input is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("output {} overlaps input {}", .output.display(), .input.display())]
    OverlappingPaths { input: PathBuf, output: PathBuf },
}

impl ReportError {
    fn io(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> ReportError {
        let path = path.to_path_buf();
        move |source| ReportError::Io {
            action,
            path,
            source,
        }
    }
}

pub(crate) fn read_json(path: &Path) -> Result<Value, ReportError> {
    let content = std::fs::read_to_string(path).map_err(ReportError::io("read", path))?;
    serde_json::from_str(&content).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_json(path: &Path, value: &Value) -> Result<(), ReportError> {
    let content = serde_json::to_string_pretty(value).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, content).map_err(ReportError::io("write", path))
}

/// Entries of a directory, sorted by path.
pub(crate) fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    let mut paths = std::fs::read_dir(dir)
        .map_err(ReportError::io("read directory", dir))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<PathBuf>>>()
        .map_err(ReportError::io("read directory", dir))?;
    paths.sort();
    Ok(paths)
}

/// Copy every file under `src` into `dst`, creating directories as needed.
///
/// Symlinked files are copied by content. Symlinked directories are skipped
/// so a link cycle cannot recurse forever.
///
/// Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize, ReportError> {
    std::fs::create_dir_all(dst).map_err(ReportError::io("create directory", dst))?;

    let mut copied = 0;
    for path in sorted_entries(src)? {
        let Some(name) = path.file_name() else {
            continue;
        };
        let target = dst.join(name);
        let file_type = std::fs::symlink_metadata(&path)
            .map_err(ReportError::io("inspect", &path))?
            .file_type();
        if file_type.is_dir() {
            copied += copy_tree(&path, &target)?;
        } else if file_type.is_symlink() && path.is_dir() {
            warn!(path = %path.display(), "skipping symlinked directory");
        } else {
            std::fs::copy(&path, &target).map_err(ReportError::io("copy", &path))?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Page folders of a report in display order.
///
/// Pages listed in `pages.json` come first, in `pageOrder`; any remaining
/// page folders follow in name order.
pub fn page_dirs(report_root: &Path) -> Result<Vec<PathBuf>, ReportError> {
    let pages_dir = report_root.join(PAGES_DIR);
    if !pages_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut ordered = Vec::new();
    let mut seen = BTreeSet::new();

    let meta_file = pages_dir.join(PAGES_META_FILE);
    if meta_file.is_file() {
        let meta = read_json(&meta_file)?;
        let order = meta
            .get("pageOrder")
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default();
        debug!(pages = order.len(), "page order read from {}", PAGES_META_FILE);
        for id in order {
            let dir = pages_dir.join(id);
            if dir.join(PAGE_FILE).is_file() && seen.insert(dir.clone()) {
                ordered.push(dir);
            }
        }
    }

    for dir in sorted_entries(&pages_dir)? {
        if dir.is_dir() && dir.join(PAGE_FILE).is_file() && seen.insert(dir.clone()) {
            ordered.push(dir);
        }
    }

    Ok(ordered)
}

/// A page together with its computed layout.
#[derive(Debug, Clone)]
pub struct PlannedPage {
    pub page: Page,
    pub layout: Layout,
    /// The overflow band overlays the KPI row or the chart grid.
    pub overflow_overlaps: bool,
}

impl PlannedPage {
    /// Classify and plan a loaded page.
    pub fn new(page: Page, settings: &Settings, table: &CategoryTable) -> Self {
        let pools = VisualPools::group(&page.visuals, table);
        let zones = Zones::compute(&pools, page.canvas, &settings.layout);
        let layout = plan(&pools, page.canvas, &settings.layout);
        let overflow_overlaps = zones.overflow_overlays_content(&pools);

        info!(
            page = %page.id,
            visuals = pools.total(),
            slicers = pools.count(Category::Slicer),
            kpis = pools.count(Category::Kpi),
            charts = pools.count(Category::Chart),
            tables = pools.count(Category::Table),
            other = pools.count(Category::Other),
            "planned page"
        );
        if overflow_overlaps {
            debug!(page = %page.id, "overflow visuals overlay the kpi or chart area");
        }
        let degenerate = layout.degenerate();
        if !degenerate.is_empty() {
            warn!(
                page = %page.id,
                width = page.canvas.width,
                height = page.canvas.height,
                visuals = ?degenerate,
                "canvas too small for margins and bands; non-positive sizes emitted"
            );
        }
        for (name, placement) in layout.in_stacking_order() {
            debug!(page = %page.id, visual = %name, position = ?placement.position, "placed");
        }

        Self {
            page,
            layout,
            overflow_overlaps,
        }
    }

    /// Number of visuals per category, in placement order.
    pub fn counts(&self) -> [(Category, usize); 5] {
        Category::ALL.map(|c| {
            let n = self
                .layout
                .iter()
                .filter(|(_, p)| p.category == c)
                .count();
            (c, n)
        })
    }
}

/// Load and plan every page under `root` without writing anything.
///
/// `root` may be a report folder or a single page folder.
pub fn plan_report(root: &Path, settings: &Settings) -> Result<Vec<PlannedPage>, ReportError> {
    ensure_dir(root)?;
    let table = settings.category_table();

    let dirs = if root.join(PAGE_FILE).is_file() {
        vec![root.to_path_buf()]
    } else {
        page_dirs(root)?
    };

    let mut planned = Vec::new();
    for dir in dirs {
        if let Some(page) = Page::load(&dir, settings.page)? {
            planned.push(PlannedPage::new(page, settings, &table));
        }
    }
    Ok(planned)
}

/// Outcome of one page during [`reformat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub id: String,
    pub display_name: String,
    pub positioned: usize,
    pub skipped: usize,
    pub degenerate: Vec<String>,
}

/// Outcome of a [`reformat`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReformatSummary {
    pub output: PathBuf,
    pub files_copied: usize,
    pub pages: Vec<PageSummary>,
    pub themes_updated: usize,
}

impl ReformatSummary {
    pub fn visuals_positioned(&self) -> usize {
        self.pages.iter().map(|p| p.positioned).sum()
    }
}

/// Copy `input` to `output`, lay out every page and restyle the themes.
///
/// An existing `output` folder is removed first. `output` must not be
/// `input`, lie inside it, or contain it.
pub fn reformat(
    input: &Path,
    output: &Path,
    settings: &Settings,
) -> Result<ReformatSummary, ReportError> {
    ensure_dir(input)?;
    check_disjoint(input, output)?;

    if output.exists() {
        std::fs::remove_dir_all(output).map_err(ReportError::io("remove", output))?;
    }
    let files_copied = copy_tree(input, output)?;
    info!(files = files_copied, output = %output.display(), "copied source files");

    let table = settings.category_table();
    let mut pages = Vec::new();
    for dir in page_dirs(output)? {
        let Some(page) = Page::load(&dir, settings.page)? else {
            continue;
        };
        if page.visuals.is_empty() {
            info!(page = %page.id, "no visuals found");
        }
        let planned = PlannedPage::new(page, settings, &table);
        let positioned = planned.page.write_layout(&planned.layout)?;
        pages.push(PageSummary {
            id: planned.page.id.clone(),
            display_name: planned.page.display_name.clone(),
            positioned,
            skipped: planned.page.skipped.len(),
            degenerate: planned
                .layout
                .degenerate()
                .into_iter()
                .map(str::to_string)
                .collect(),
        });
    }

    let themes_updated = if settings.theme.enabled {
        theme::apply_theme(output)?
    } else {
        0
    };

    Ok(ReformatSummary {
        output: output.to_path_buf(),
        files_copied,
        pages,
        themes_updated,
    })
}

fn ensure_dir(path: &Path) -> Result<(), ReportError> {
    if !path.exists() {
        return Err(ReportError::InputNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(ReportError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// Absolute form of `path` with symlinks and `.`/`..` resolved.
///
/// Components that exist are canonicalized one at a time, so a path that
/// does not exist yet still resolves through any linked parent.
fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    let mut resolved = PathBuf::new();
    for component in std::path::absolute(path)?.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                if resolved.exists() {
                    resolved = resolved.canonicalize()?;
                }
            }
        }
    }
    Ok(resolved)
}

fn check_disjoint(input: &Path, output: &Path) -> Result<(), ReportError> {
    let input_abs = resolve_path(input).map_err(ReportError::io("resolve", input))?;
    let output_abs = resolve_path(output).map_err(ReportError::io("resolve", output))?;
    if output_abs.starts_with(&input_abs) || input_abs.starts_with(&output_abs) {
        return Err(ReportError::OverlappingPaths {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        });
    }
    Ok(())
}
