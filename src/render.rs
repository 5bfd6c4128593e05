use owo_colors::OwoColorize;

use crate::layout::{Category, Layout, PageCanvas, Rect};
use crate::report::PlannedPage;

/// Width of the ASCII preview, in characters.
pub const PREVIEW_COLUMNS: usize = 64;

/// Visual names longer than this are cut in the position table.
pub const MAX_NAME_LEN: usize = 32;

pub fn truncate_name(name: &str) -> String {
    if name.chars().count() <= MAX_NAME_LEN {
        name.to_string()
    } else {
        let cut: String = name.chars().take(MAX_NAME_LEN - 3).collect();
        format!("{}...", cut)
    }
}

fn category_letter(category: Category) -> char {
    match category {
        Category::Slicer => 'S',
        Category::Kpi => 'K',
        Category::Chart => 'C',
        Category::Table => 'T',
        Category::Other => 'O',
    }
}

fn paint(category: Category, s: &str) -> String {
    match category {
        Category::Slicer => format!("{}", s.magenta()),
        Category::Kpi => format!("{}", s.yellow()),
        Category::Chart => format!("{}", s.bright_blue()),
        Category::Table => format!("{}", s.green()),
        Category::Other => format!("{}", s.dimmed()),
    }
}

/// Render a planned page: a heading, the position table and a preview.
pub fn render_planned_page(planned: &PlannedPage) -> String {
    let page = &planned.page;
    let mut out = String::new();

    out.push_str(&format!(
        "{} {} {}\n",
        page.display_name.bold(),
        format!("({})", page.id).dimmed(),
        format!("{}x{}", page.canvas.width, page.canvas.height).cyan()
    ));

    if planned.layout.is_empty() {
        out.push_str(&format!("  {}\n", "no visuals".dimmed()));
        return out;
    }

    out.push_str(&render_positions(&planned.layout));
    out.push('\n');
    out.push_str(&render_preview(&planned.layout, page.canvas, PREVIEW_COLUMNS));

    for skipped in &page.skipped {
        out.push_str(&format!(
            "  {} {}\n",
            "skipped".yellow(),
            skipped.file.display().to_string().dimmed()
        ));
    }
    if planned.overflow_overlaps {
        out.push_str(&format!(
            "  {} {}\n",
            "note:".yellow().bold(),
            "overflow visuals overlay the KPI row or chart grid".dimmed()
        ));
    }
    let degenerate = planned.layout.degenerate();
    if !degenerate.is_empty() {
        out.push_str(&format!(
            "  {} {} {}\n",
            "warning:".yellow().bold(),
            "canvas too small, non-positive size for".dimmed(),
            degenerate.join(", ")
        ));
    }

    out
}

/// One line per visual in stacking order.
pub fn render_positions(layout: &Layout) -> String {
    let ordered = layout.in_stacking_order();
    let names: Vec<String> = ordered.iter().map(|(n, _)| truncate_name(n)).collect();
    let name_width = names.iter().map(|n| n.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for ((_, placement), name) in ordered.iter().zip(&names) {
        let p = placement.position;
        let category = format!("{:<6}", placement.category.as_str());
        out.push_str(&format!(
            "  {:>3}  {:name_width$}  {}  {}\n",
            p.z,
            name,
            paint(placement.category, &category),
            format!("({}, {}) {}x{}", p.x, p.y, p.width, p.height).dimmed()
        ));
    }
    out
}

/// Character grid covering `canvas`, one letter per visual category.
///
/// Visuals are drawn in stacking order, so where rectangles overlap the
/// later one is visible.
pub fn preview_grid(layout: &Layout, canvas: PageCanvas, columns: usize) -> Vec<Vec<Option<Category>>> {
    if canvas.width <= 0 || canvas.height <= 0 || columns == 0 {
        return Vec::new();
    }
    let cols = columns as i64;
    // Terminal cells are roughly twice as tall as they are wide.
    let rows = ((cols * canvas.height) / (canvas.width * 2)).max(1);
    let mut grid = vec![vec![None; cols as usize]; rows as usize];

    let to_cols = |x: i64| (x * cols / canvas.width).clamp(0, cols);
    let to_rows = |y: i64| (y * rows / canvas.height).clamp(0, rows);

    for (_, placement) in layout.in_stacking_order() {
        let Rect {
            x,
            y,
            width,
            height,
        } = placement.position.rect();
        if width <= 0 || height <= 0 {
            continue;
        }
        let (c0, c1) = (to_cols(x), to_cols(x + width));
        let (r0, r1) = (to_rows(y), to_rows(y + height));
        for row in grid.iter_mut().take(r1.max(r0 + 1) as usize).skip(r0 as usize) {
            for cell in row.iter_mut().take(c1.max(c0 + 1) as usize).skip(c0 as usize) {
                *cell = Some(placement.category);
            }
        }
    }

    grid
}

/// Framed ASCII preview of the page.
pub fn render_preview(layout: &Layout, canvas: PageCanvas, columns: usize) -> String {
    let grid = preview_grid(layout, canvas, columns);
    let Some(width) = grid.first().map(|r| r.len()) else {
        return String::new();
    };

    let border = format!("  +{}+\n", "-".repeat(width));
    let mut out = border.clone();
    for row in &grid {
        out.push_str("  |");
        for cell in row {
            match cell {
                Some(category) => {
                    let letter = category_letter(*category).to_string();
                    out.push_str(&paint(*category, &letter));
                }
                None => out.push(' '),
            }
        }
        out.push_str("|\n");
    }
    out.push_str(&border);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{plan_page, CategoryTable, LayoutConfig, VisualDescriptor};

    fn strip_ansi(s: &str) -> String {
        let re = regex::Regex::new(r"\x1b\[[0-9;]*m").unwrap();
        re.replace_all(s, "").to_string()
    }

    fn dashboard() -> Layout {
        let visuals = vec![
            VisualDescriptor::new("filters", "slicer"),
            VisualDescriptor::new("revenue", "card"),
            VisualDescriptor::new("trend", "lineChart"),
            VisualDescriptor::new("detail", "tableEx"),
        ];
        plan_page(
            &visuals,
            PageCanvas::default(),
            &LayoutConfig::default(),
            &CategoryTable::builtin(),
        )
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short"), "short");
        let long = "x".repeat(40);
        let cut = truncate_name(&long);
        assert_eq!(cut.chars().count(), MAX_NAME_LEN);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_positions_listed_in_stacking_order() {
        let output = strip_ansi(&render_positions(&dashboard()));
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("filters") && lines[0].contains("slicer"));
        assert!(lines[0].contains("(40, 40) 200x640"));
        assert!(lines[1].contains("revenue"));
        assert!(lines[2].contains("trend"));
        assert!(lines[3].contains("detail") && lines[3].contains("table"));
    }

    #[test]
    fn test_preview_grid_shape_and_zones() {
        let grid = preview_grid(&dashboard(), PageCanvas::default(), 64);

        // 64 * 720 / (1280 * 2) = 18
        assert_eq!(grid.len(), 18);
        assert!(grid.iter().all(|r| r.len() == 64));

        // Margins stay empty, the sidebar sits on the left.
        assert_eq!(grid[0][0], None);
        assert_eq!(grid[5][3], Some(Category::Slicer));
        assert_eq!(grid[1][30], Some(Category::Kpi));
        assert_eq!(grid[8][30], Some(Category::Chart));
        assert_eq!(grid[15][30], Some(Category::Table));
    }

    #[test]
    fn test_preview_empty_for_degenerate_canvas() {
        assert!(preview_grid(&Layout::new(), PageCanvas::new(0, 720), 64).is_empty());
        assert_eq!(render_preview(&Layout::new(), PageCanvas::new(0, 720), 64), "");
    }

    #[test]
    fn test_render_preview_is_framed() {
        let output = strip_ansi(&render_preview(&dashboard(), PageCanvas::default(), 32));
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.first(), Some(&"  +--------------------------------+"));
        assert_eq!(lines.last(), lines.first());
        assert!(lines[1..lines.len() - 1].iter().all(|l| l.starts_with("  |") && l.ends_with('|')));
        assert!(output.contains('S') && output.contains('K') && output.contains('C') && output.contains('T'));
    }
}
