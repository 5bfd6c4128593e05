//! Data contracts shared by the classifier, the planner and the report orchestrator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::classify::Category;
use super::split::SplitPolicy;

/// A visual as seen by the layout core.
///
/// `payload` is the visual's full JSON record. The core never reads or
/// modifies it; it travels along so the orchestrator can merge the
/// computed position back into the same document.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualDescriptor {
    pub name: String,
    pub type_tag: String,
    pub payload: serde_json::Value,
}

impl VisualDescriptor {
    /// Build a descriptor with an empty payload.
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
            payload: serde_json::Value::Null,
        }
    }
}

/// Page dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageCanvas {
    pub width: i64,
    pub height: i64,
}

impl Default for PageCanvas {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl PageCanvas {
    pub fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }
}

/// Tunable constants of the dashboard layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Pixel increment every coordinate and size is snapped to.
    pub grid_unit: i64,
    /// Distance between the page edge and any visual.
    pub margin: i64,
    /// Distance between neighbouring visuals.
    pub gap: i64,
    /// Height of the KPI row.
    pub kpi_height: i64,
    /// Width of the slicer sidebar.
    pub slicer_width: i64,
    /// Height of the table row.
    pub table_height: i64,
    /// Not consumed by any layout formula yet.
    pub golden_ratio: f64,
    /// How a span is divided into equal cells.
    pub split_policy: SplitPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid_unit: 10,
            margin: 40,
            gap: 20,
            kpi_height: 120,
            slicer_width: 200,
            table_height: 200,
            golden_ratio: 1.618,
            split_policy: SplitPolicy::default(),
        }
    }
}

/// An unsnapped rectangle: a zone of the canvas or one cell inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.height
    }

    /// True if the interiors of both rectangles intersect.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Final placement of one visual, in the shape PBIR stores under `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub width: i64,
    pub height: i64,
    pub tab_order: i64,
}

impl Position {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// One placed visual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub category: Category,
    pub position: Position,
}

/// Planner output for one page.
///
/// Keyed by visual name. A name that appears twice in the input keeps the
/// placement computed last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Layout {
    placements: BTreeMap<String, Placement>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: &str, category: Category, position: Position) {
        self.placements
            .insert(name.to_string(), Placement { category, position });
    }

    pub fn get(&self, name: &str) -> Option<&Position> {
        self.placements.get(name).map(|p| &p.position)
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Iterate placements in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Placement)> {
        self.placements.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Placements sorted by stacking order (which is also tab order).
    pub fn in_stacking_order(&self) -> Vec<(&str, &Placement)> {
        let mut ordered: Vec<_> = self.iter().collect();
        ordered.sort_by_key(|(name, p)| (p.position.z, *name));
        ordered
    }

    /// Names of visuals whose snapped width or height is not positive.
    ///
    /// This only happens when the margins and fixed bands do not fit the
    /// canvas; callers should surface it as a configuration warning.
    pub fn degenerate(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, p)| p.position.width <= 0 || p.position.height <= 0)
            .map(|(name, _)| name)
            .collect()
    }

    /// Name to position map, the shape merged into visual records.
    pub fn positions(&self) -> BTreeMap<&str, Position> {
        self.iter().map(|(name, p)| (name, p.position)).collect()
    }
}
