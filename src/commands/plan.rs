//! Plan command - computes layouts without touching the report.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error_fmt::AppError;
use crate::render;
use crate::report::{self, PlannedPage};
use crate::Settings;

/// Plan every page under `root` and print the result.
pub fn plan(root: &Path, settings: &Settings, json: bool) -> Result<(), AppError> {
    let planned = report::plan_report(root, settings)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&planned_json(&planned)?)?);
        return Ok(());
    }

    if planned.is_empty() {
        println!("No pages found in {}", root.display());
        return Ok(());
    }

    for (i, page) in planned.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", render::render_planned_page(page));
    }
    Ok(())
}

/// `{ pageId: { visualName: position } }` in page order.
pub fn planned_json(planned: &[PlannedPage]) -> Result<Value, serde_json::Error> {
    let mut pages = Map::new();
    for page in planned {
        pages.insert(
            page.page.id.clone(),
            serde_json::to_value(page.layout.positions())?,
        );
    }
    Ok(Value::Object(pages))
}
