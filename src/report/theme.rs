//! The CorporateBlue report theme.
//!
//! PBIR does not accept styling objects at the top level of `visual.json`,
//! so backgrounds, borders and shadows are set through the theme's
//! `visualStyles` section instead.

use std::path::Path;

use serde_json::{json, Value};
use tracing::info;

use super::{read_json, sorted_entries, write_json, ReportError};

/// Theme folder relative to the report root.
pub const BASE_THEMES_DIR: &str = "StaticResources/SharedResources/BaseThemes";

pub const THEME_NAME: &str = "CorporateBlue";

/// The full theme document.
pub fn corporate_blue() -> Value {
    let text = |size: u32, face: &str, color: &str| {
        json!({"fontSize": size, "fontFace": face, "color": color})
    };
    let solid = |color: &str| json!({"solid": {"color": color}});

    json!({
        "name": THEME_NAME,
        "dataColors": [
            "#0066CC", "#00A3E0", "#004C99", "#40E0D0", "#003366", "#5BC0DE",
            "#002244", "#87CEEB", "#0055AA", "#00CED1", "#1E90FF", "#4169E1"
        ],
        "foreground": "#1E1E1E",
        "foregroundNeutralSecondary": "#505050",
        "foregroundNeutralTertiary": "#A0A0A0",
        "background": "#FFFFFF",
        "backgroundLight": "#F8FAFC",
        "backgroundNeutral": "#E2E8F0",
        "tableAccent": "#0066CC",
        "good": "#10B981",
        "neutral": "#F59E0B",
        "bad": "#EF4444",
        "maximum": "#0066CC",
        "center": "#F59E0B",
        "minimum": "#E0F2FE",
        "null": "#94A3B8",
        "hyperlink": "#0066CC",
        "visitedHyperlink": "#004C99",
        "textClasses": {
            "callout": text(32, "Segoe UI Light", "#1E1E1E"),
            "title": text(14, "Segoe UI Semibold", "#1E1E1E"),
            "header": text(12, "Segoe UI Semibold", "#1E1E1E"),
            "label": text(10, "Segoe UI", "#505050")
        },
        "visualStyles": {
            "*": {
                "*": {
                    "*": [{"wordWrap": true}],
                    "background": [{
                        "show": true,
                        "color": solid("#FFFFFF"),
                        "transparency": 0
                    }],
                    "border": [{
                        "show": true,
                        "color": solid("#E2E8F0"),
                        "radius": 8
                    }],
                    "dropShadow": [{"show": true, "preset": "BottomRight"}],
                    "title": [{
                        "show": true,
                        "fontColor": solid("#1E1E1E"),
                        "fontSize": 11,
                        "fontFamily": "Segoe UI Semibold"
                    }],
                    "categoryAxis": [{
                        "labelColor": solid("#505050"),
                        "gridlineColor": solid("#E2E8F0")
                    }],
                    "valueAxis": [{
                        "labelColor": solid("#505050"),
                        "gridlineColor": solid("#E2E8F0")
                    }]
                }
            },
            "page": {
                "*": {
                    "background": [{"color": solid("#F1F5F9"), "transparency": 0}]
                }
            }
        }
    })
}

/// The replacement for an existing theme document. Keeps its `name`.
pub fn restyle(existing: &Value) -> Value {
    let mut theme = corporate_blue();
    let name = existing
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(THEME_NAME)
        .to_string();
    theme["name"] = Value::String(name);
    theme
}

/// Rewrite every `*.json` base theme under `report_root`.
///
/// Returns the number of theme files updated; a report without a theme
/// folder updates none.
pub fn apply_theme(report_root: &Path) -> Result<usize, ReportError> {
    let themes_dir = report_root.join(BASE_THEMES_DIR);
    if !themes_dir.is_dir() {
        return Ok(0);
    }

    let mut updated = 0;
    for path in sorted_entries(&themes_dir)? {
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        let existing = read_json(&path)?;
        write_json(&path, &restyle(&existing))?;
        info!(file = %path.display(), "theme updated");
        updated += 1;
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_restyle_keeps_existing_name() {
        let theme = restyle(&json!({"name": "CY24SU06", "dataColors": ["#000000"]}));
        assert_eq!(theme["name"], "CY24SU06");
        assert_eq!(theme["dataColors"][0], "#0066CC");
        assert_eq!(theme["dataColors"].as_array().unwrap().len(), 12);
    }

    #[test]
    fn test_restyle_defaults_name() {
        let theme = restyle(&json!({}));
        assert_eq!(theme["name"], THEME_NAME);
    }

    #[test]
    fn test_theme_styles_every_visual() {
        let theme = corporate_blue();
        let all = &theme["visualStyles"]["*"]["*"];
        assert_eq!(all["border"][0]["radius"], 8);
        assert_eq!(all["dropShadow"][0]["preset"], "BottomRight");
        assert_eq!(
            theme["visualStyles"]["page"]["*"]["background"][0]["color"]["solid"]["color"],
            "#F1F5F9"
        );
        assert_eq!(theme["textClasses"]["callout"]["fontSize"], 32);
    }

    #[test]
    fn test_apply_theme_rewrites_json_files_only() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(BASE_THEMES_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("base.json"), r#"{"name": "Base"}"#).unwrap();
        std::fs::write(dir.join("notes.txt"), "keep me").unwrap();

        let updated = apply_theme(temp_dir.path()).unwrap();
        assert_eq!(updated, 1);

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join("base.json")).unwrap()).unwrap();
        assert_eq!(written["name"], "Base");
        assert_eq!(written["foreground"], "#1E1E1E");
        assert_eq!(std::fs::read_to_string(dir.join("notes.txt")).unwrap(), "keep me");
    }

    #[test]
    fn test_apply_theme_without_folder() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(apply_theme(temp_dir.path()).unwrap(), 0);
    }
}
