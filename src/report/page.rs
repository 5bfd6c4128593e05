//! Reading and writing one PBIR page folder.
//!
//! ```text
//! <page>/
//!   page.json                 { "displayName", "width", "height", ... }
//!   visuals/<visual>/visual.json
//!                             { "name", "position", "visual": { "visualType" } }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use super::{read_json, sorted_entries, write_json, ReportError};
use crate::layout::{Layout, PageCanvas, Position, VisualDescriptor};

pub const PAGE_FILE: &str = "page.json";
pub const VISUALS_DIR: &str = "visuals";
pub const VISUAL_FILE: &str = "visual.json";

/// Type tag used when a visual record has no `visual.visualType`.
pub const UNKNOWN_TYPE: &str = "unknown";

/// Why a visual was left out of the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingName,
    DuplicateName(String),
}

/// A visual folder that was read but not handed to the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedVisual {
    pub file: PathBuf,
    pub reason: SkipReason,
}

/// A loaded page: canvas plus visuals in folder-name order.
#[derive(Debug, Clone)]
pub struct Page {
    /// Folder name of the page.
    pub id: String,
    pub display_name: String,
    pub dir: PathBuf,
    pub canvas: PageCanvas,
    pub visuals: Vec<VisualDescriptor>,
    /// Visual name to the `visual.json` it was read from.
    pub files: BTreeMap<String, PathBuf>,
    pub skipped: Vec<SkippedVisual>,
}

impl Page {
    /// Load a page folder. Returns `None` if the folder has no `page.json`.
    ///
    /// A missing `visuals` folder yields a page with no visuals. Visuals
    /// without a `name` and repeats of an already-seen name are skipped
    /// and recorded in [`Page::skipped`].
    pub fn load(dir: &Path, default_canvas: PageCanvas) -> Result<Option<Self>, ReportError> {
        let page_file = dir.join(PAGE_FILE);
        if !page_file.is_file() {
            return Ok(None);
        }

        let id = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let meta = read_json(&page_file)?;
        let canvas = PageCanvas {
            width: dimension(&meta, "width").unwrap_or(default_canvas.width),
            height: dimension(&meta, "height").unwrap_or(default_canvas.height),
        };
        let display_name = meta
            .get("displayName")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| id.clone());

        let mut page = Page {
            id,
            display_name,
            dir: dir.to_path_buf(),
            canvas,
            visuals: Vec::new(),
            files: BTreeMap::new(),
            skipped: Vec::new(),
        };

        let visuals_dir = dir.join(VISUALS_DIR);
        if !visuals_dir.is_dir() {
            return Ok(Some(page));
        }

        for visual_dir in sorted_entries(&visuals_dir)? {
            let file = visual_dir.join(VISUAL_FILE);
            if !visual_dir.is_dir() || !file.is_file() {
                continue;
            }
            let payload = read_json(&file)?;
            page.push_visual(file, payload);
        }

        Ok(Some(page))
    }

    fn push_visual(&mut self, file: PathBuf, payload: Value) {
        let Some(name) = payload.get("name").and_then(Value::as_str).map(str::to_string) else {
            warn!(file = %file.display(), "visual has no name, skipping");
            self.skipped.push(SkippedVisual {
                file,
                reason: SkipReason::MissingName,
            });
            return;
        };
        if name.is_empty() {
            warn!(file = %file.display(), "visual has an empty name, skipping");
            self.skipped.push(SkippedVisual {
                file,
                reason: SkipReason::MissingName,
            });
            return;
        }
        if self.files.contains_key(&name) {
            warn!(file = %file.display(), name = %name, "duplicate visual name, skipping");
            self.skipped.push(SkippedVisual {
                file,
                reason: SkipReason::DuplicateName(name),
            });
            return;
        }

        let type_tag = visual_type(&payload).to_string();
        self.files.insert(name.clone(), file);
        self.visuals.push(VisualDescriptor {
            name,
            type_tag,
            payload,
        });
    }

    /// Merge `layout` into every visual record and write the files back.
    ///
    /// Returns the number of visuals rewritten. Visuals with no placement
    /// are left untouched.
    pub fn write_layout(&self, layout: &Layout) -> Result<usize, ReportError> {
        let mut written = 0;
        for visual in &self.visuals {
            let (Some(position), Some(file)) =
                (layout.get(&visual.name), self.files.get(&visual.name))
            else {
                continue;
            };
            let mut payload = visual.payload.clone();
            merge_position(&mut payload, position);
            write_json(file, &payload)?;
            written += 1;
        }
        Ok(written)
    }
}

/// The `visual.visualType` of a visual record.
pub fn visual_type(payload: &Value) -> &str {
    payload
        .get("visual")
        .and_then(|v| v.get("visualType"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_TYPE)
}

/// Replace the `position` field of a visual record, leaving all else as is.
pub fn merge_position(payload: &mut Value, position: &Position) {
    let Value::Object(map) = payload else {
        return;
    };
    let value = serde_json::json!({
        "x": position.x,
        "y": position.y,
        "z": position.z,
        "width": position.width,
        "height": position.height,
        "tabOrder": position.tab_order,
    });
    map.insert("position".to_string(), value);
}

/// Integer page dimension; PBIR sometimes writes these as floats.
fn dimension(meta: &Value, key: &str) -> Option<i64> {
    let value = meta.get(key)?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.round() as i64))
        .filter(|v| *v > 0)
}
