//! Dashboard layout planner.
//!
//! The canvas is partitioned into zones, one per category:
//!
//! ```text
//! ┌────────┬────────────────────────────────────────────┐
//! │        │  KPI 1   │  KPI 2   │  KPI 3   │  KPI 4    │
//! │        ├──────────┴──────────┴──────────┴───────────┤
//! │ SLICER │                                            │
//! │   S    │     Chart grid                             │
//! │        │                                            │
//! │        ├────────────────────────────────────────────┤
//! │        │     Tables                                 │
//! └────────┴────────────────────────────────────────────┘
//! ```
//!
//! Empty categories reserve nothing. Each zone is then split into equal
//! cells and every cell is snapped to the grid. Stacking and tab order come
//! from a single counter that walks the categories in [`Category::ALL`] order.

use super::classify::{Category, CategoryTable};
use super::model::{Layout, LayoutConfig, PageCanvas, Position, Rect, VisualDescriptor};
use super::snap::snap;
use super::split::SplitPolicy;

/// Height of the overflow band when charts already occupy the main area.
pub const OVERFLOW_BAND_HEIGHT: i64 = 200;

/// Upper bound on the height of an overflow cell.
pub const OVERFLOW_MAX_HEIGHT: i64 = 300;

/// Visuals grouped by category, input order preserved inside each pool.
#[derive(Debug, Clone, Default)]
pub struct VisualPools<'a> {
    pub slicers: Vec<&'a VisualDescriptor>,
    pub kpis: Vec<&'a VisualDescriptor>,
    pub charts: Vec<&'a VisualDescriptor>,
    pub tables: Vec<&'a VisualDescriptor>,
    pub other: Vec<&'a VisualDescriptor>,
}

impl<'a> VisualPools<'a> {
    pub fn group(visuals: &'a [VisualDescriptor], table: &CategoryTable) -> Self {
        let mut pools = Self::default();
        for visual in visuals {
            pools.pool_mut(table.classify(&visual.type_tag)).push(visual);
        }
        pools
    }

    pub fn pool(&self, category: Category) -> &[&'a VisualDescriptor] {
        match category {
            Category::Slicer => &self.slicers,
            Category::Kpi => &self.kpis,
            Category::Chart => &self.charts,
            Category::Table => &self.tables,
            Category::Other => &self.other,
        }
    }

    fn pool_mut(&mut self, category: Category) -> &mut Vec<&'a VisualDescriptor> {
        match category {
            Category::Slicer => &mut self.slicers,
            Category::Kpi => &mut self.kpis,
            Category::Chart => &mut self.charts,
            Category::Table => &mut self.tables,
            Category::Other => &mut self.other,
        }
    }

    pub fn count(&self, category: Category) -> usize {
        self.pool(category).len()
    }

    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.count(*c)).sum()
    }
}

/// Columns and rows of the chart grid for a number of charts.
///
/// Caps at 3x3. Charts beyond the ninth share the last cell.
pub fn grid_shape(chart_count: usize) -> (usize, usize) {
    match chart_count {
        0 | 1 => (1, 1),
        2 => (2, 1),
        3 | 4 => (2, 2),
        5 | 6 => (3, 2),
        _ => (3, 3),
    }
}

/// The regions reserved on one page, before cells are cut out of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zones {
    pub sidebar: Option<Rect>,
    pub kpi_band: Option<Rect>,
    /// Always computed; it is also the overflow region when there are no charts.
    pub chart_band: Rect,
    pub table_band: Option<Rect>,
    pub overflow_band: Option<Rect>,
}

impl Zones {
    /// Partition `canvas` for the given pool sizes.
    pub fn compute(pools: &VisualPools<'_>, canvas: PageCanvas, config: &LayoutConfig) -> Self {
        let has = |c| pools.count(c) > 0;
        let margin = config.margin;
        let gap = config.gap;

        let sidebar = has(Category::Slicer).then(|| {
            Rect::new(
                margin,
                margin,
                config.slicer_width,
                canvas.height - 2 * margin,
            )
        });

        let content_left = match sidebar {
            Some(_) => margin + config.slicer_width + gap,
            None => margin,
        };
        let content_width = canvas.width - content_left - margin;

        let kpi_band = has(Category::Kpi)
            .then(|| Rect::new(content_left, margin, content_width, config.kpi_height));
        let table_band = has(Category::Table).then(|| {
            Rect::new(
                content_left,
                canvas.height - margin - config.table_height,
                content_width,
                config.table_height,
            )
        });

        let kpi_area = kpi_band.map_or(0, |b| b.height + gap);
        let table_area = table_band.map_or(0, |b| b.height + gap);
        let chart_band = Rect::new(
            content_left,
            margin + kpi_area,
            content_width,
            canvas.height - margin - kpi_area - table_area - margin,
        );

        // With charts present the overflow band sits at the top of the
        // content area and can overlay the KPI row and the first chart row.
        let overflow_band = has(Category::Other).then(|| {
            let band = if has(Category::Chart) {
                Rect::new(content_left, margin, content_width, OVERFLOW_BAND_HEIGHT)
            } else {
                chart_band
            };
            Rect {
                height: band.height.min(OVERFLOW_MAX_HEIGHT),
                ..band
            }
        });

        Self {
            sidebar,
            kpi_band,
            chart_band,
            table_band,
            overflow_band,
        }
    }

    /// True if the overflow band overlays the KPI row or the chart grid.
    pub fn overflow_overlays_content(&self, pools: &VisualPools<'_>) -> bool {
        let Some(overflow) = self.overflow_band else {
            return false;
        };
        let hits_kpis = self.kpi_band.is_some_and(|b| b.overlaps(&overflow));
        let hits_charts = pools.count(Category::Chart) > 0 && self.chart_band.overlaps(&overflow);
        hits_kpis || hits_charts
    }
}

/// `count` rows stacked top to bottom inside `band`.
fn rows(band: Rect, count: usize, gap: i64, policy: SplitPolicy) -> Vec<Rect> {
    let height = policy.cell_extent(band.height, count, gap);
    (0..count as i64)
        .map(|i| Rect::new(band.x, band.y + i * (height + gap), band.width, height))
        .collect()
}

/// `count` columns left to right inside `band`.
fn columns(band: Rect, count: usize, gap: i64, policy: SplitPolicy) -> Vec<Rect> {
    let width = policy.cell_extent(band.width, count, gap);
    (0..count as i64)
        .map(|i| Rect::new(band.x + i * (width + gap), band.y, width, band.height))
        .collect()
}

/// `count` cells of a row-major grid inside `band`.
fn grid(band: Rect, count: usize, gap: i64, policy: SplitPolicy) -> Vec<Rect> {
    let (cols, rows) = grid_shape(count);
    let width = policy.cell_extent(band.width, cols, gap);
    let height = policy.cell_extent(band.height, rows, gap);
    let last_cell = cols * rows - 1;

    (0..count)
        .map(|i| {
            let cell = i.min(last_cell);
            let row = (cell / cols) as i64;
            let col = (cell % cols) as i64;
            Rect::new(
                band.x + col * (width + gap),
                band.y + row * (height + gap),
                width,
                height,
            )
        })
        .collect()
}

/// Unsnapped cells for every visual of `category`, in pool order.
fn cells(
    category: Category,
    zones: &Zones,
    count: usize,
    config: &LayoutConfig,
) -> Vec<Rect> {
    let gap = config.gap;
    let policy = config.split_policy;
    let band = match category {
        Category::Slicer => zones.sidebar,
        Category::Kpi => zones.kpi_band,
        Category::Chart => Some(zones.chart_band),
        Category::Table => zones.table_band,
        Category::Other => zones.overflow_band,
    };
    let Some(band) = band else {
        return Vec::new();
    };

    match category {
        Category::Slicer => rows(band, count, gap, policy),
        Category::Chart => grid(band, count, gap, policy),
        Category::Kpi | Category::Table | Category::Other => columns(band, count, gap, policy),
    }
}

fn snapped(cell: Rect, grid_unit: i64, order: i64) -> Position {
    Position {
        x: snap(cell.x, grid_unit),
        y: snap(cell.y, grid_unit),
        z: order,
        width: snap(cell.width, grid_unit),
        height: snap(cell.height, grid_unit),
        tab_order: order,
    }
}

/// Compute a position for every visual in `pools`.
///
/// Pure and deterministic. Sizes are not clamped: a canvas too small for
/// the margins and fixed bands yields non-positive widths or heights, which
/// [`Layout::degenerate`] reports.
pub fn plan(pools: &VisualPools<'_>, canvas: PageCanvas, config: &LayoutConfig) -> Layout {
    let zones = Zones::compute(pools, canvas, config);
    let mut layout = Layout::new();
    let mut order = 0;

    for category in Category::ALL {
        let pool = pools.pool(category);
        if pool.is_empty() {
            continue;
        }
        let cells = cells(category, &zones, pool.len(), config);
        for (visual, cell) in pool.iter().zip(cells) {
            layout.insert(&visual.name, category, snapped(cell, config.grid_unit, order));
            order += 1;
        }
    }

    layout
}

/// Classify and plan one page in a single call.
pub fn plan_page(
    visuals: &[VisualDescriptor],
    canvas: PageCanvas,
    config: &LayoutConfig,
    table: &CategoryTable,
) -> Layout {
    plan(&VisualPools::group(visuals, table), canvas, config)
}
