//! Visual classification by type tag.
//!
//! Every PBIR visual carries a `visualType` string. The layout only cares
//! about five roles, so tags are mapped through fixed membership sets.
//! Unknown tags are never an error; they land in [`Category::Other`].

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

const SLICER_TYPES: &[&str] = &["slicer", "advancedSlicerVisual"];

const KPI_TYPES: &[&str] = &["card", "cardVisual", "multiRowCard", "kpi"];

const CHART_TYPES: &[&str] = &[
    "clusteredBarChart",
    "clusteredColumnChart",
    "lineChart",
    "barChart",
    "pieChart",
    "donutChart",
    "areaChart",
    "waterfallChart",
    "stackedBarChart",
    "stackedColumnChart",
    "lineClusteredColumnComboChart",
    "scatterChart",
    "treemap",
    "funnel",
    "gauge",
    "ribbonChart",
    "filledMap",
    "map",
    "shapeMap",
];

const TABLE_TYPES: &[&str] = &["tableEx", "pivotTable", "matrix", "table"];

/// Semantic role of a visual. Declaration order is placement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Slicer,
    Kpi,
    Chart,
    Table,
    Other,
}

impl Category {
    /// All categories in placement order.
    pub const ALL: [Category; 5] = [
        Category::Slicer,
        Category::Kpi,
        Category::Chart,
        Category::Table,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Slicer => "slicer",
            Category::Kpi => "kpi",
            Category::Chart => "chart",
            Category::Table => "table",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra type tags per category, read from settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryExtensions {
    pub slicer: Vec<String>,
    pub kpi: Vec<String>,
    pub chart: Vec<String>,
    pub table: Vec<String>,
}

/// The membership sets used to classify visuals.
///
/// Lookup order is slicer, kpi, chart, table; the first set containing the
/// tag wins. The sets are meant to be disjoint, see [`CategoryTable::overlaps`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    slicer: BTreeSet<String>,
    kpi: BTreeSet<String>,
    chart: BTreeSet<String>,
    table: BTreeSet<String>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CategoryTable {
    /// The built-in PBIR visual types.
    pub fn builtin() -> Self {
        let set = |tags: &[&str]| tags.iter().map(|t| t.to_string()).collect();
        Self {
            slicer: set(SLICER_TYPES),
            kpi: set(KPI_TYPES),
            chart: set(CHART_TYPES),
            table: set(TABLE_TYPES),
        }
    }

    /// Built-in sets plus the given extensions.
    pub fn with_extensions(extensions: &CategoryExtensions) -> Self {
        let mut table = Self::builtin();
        table.slicer.extend(extensions.slicer.iter().cloned());
        table.kpi.extend(extensions.kpi.iter().cloned());
        table.chart.extend(extensions.chart.iter().cloned());
        table.table.extend(extensions.table.iter().cloned());
        table
    }

    /// Map a type tag to its category. Total: unknown tags are `Other`.
    pub fn classify(&self, type_tag: &str) -> Category {
        if self.slicer.contains(type_tag) {
            Category::Slicer
        } else if self.kpi.contains(type_tag) {
            Category::Kpi
        } else if self.chart.contains(type_tag) {
            Category::Chart
        } else if self.table.contains(type_tag) {
            Category::Table
        } else {
            Category::Other
        }
    }

    /// Tags that appear in more than one set, with every category claiming them.
    pub fn overlaps(&self) -> Vec<(String, Vec<Category>)> {
        let sets = [
            (Category::Slicer, &self.slicer),
            (Category::Kpi, &self.kpi),
            (Category::Chart, &self.chart),
            (Category::Table, &self.table),
        ];

        let all: BTreeSet<&String> = sets.iter().flat_map(|(_, s)| s.iter()).collect();
        all.into_iter()
            .filter_map(|tag| {
                let owners: Vec<Category> = sets
                    .iter()
                    .filter(|(_, s)| s.contains(tag))
                    .map(|(c, _)| *c)
                    .collect();
                (owners.len() > 1).then(|| (tag.clone(), owners))
            })
            .collect()
    }
}

/// Classify against the built-in sets.
pub fn classify(type_tag: &str) -> Category {
    if SLICER_TYPES.contains(&type_tag) {
        Category::Slicer
    } else if KPI_TYPES.contains(&type_tag) {
        Category::Kpi
    } else if CHART_TYPES.contains(&type_tag) {
        Category::Chart
    } else if TABLE_TYPES.contains(&type_tag) {
        Category::Table
    } else {
        Category::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_tags() {
        assert_eq!(classify("slicer"), Category::Slicer);
        assert_eq!(classify("advancedSlicerVisual"), Category::Slicer);
        assert_eq!(classify("cardVisual"), Category::Kpi);
        assert_eq!(classify("kpi"), Category::Kpi);
        assert_eq!(classify("lineChart"), Category::Chart);
        assert_eq!(classify("shapeMap"), Category::Chart);
        assert_eq!(classify("tableEx"), Category::Table);
        assert_eq!(classify("matrix"), Category::Table);
    }

    #[test]
    fn test_classify_unknown_defaults_to_other() {
        assert_eq!(classify("textbox"), Category::Other);
        assert_eq!(classify(""), Category::Other);
        assert_eq!(classify("unknown"), Category::Other);
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(classify("Slicer"), Category::Other);
        assert_eq!(classify("LINECHART"), Category::Other);
    }

    #[test]
    fn test_builtin_table_matches_free_function() {
        let table = CategoryTable::builtin();
        for tag in SLICER_TYPES
            .iter()
            .chain(KPI_TYPES)
            .chain(CHART_TYPES)
            .chain(TABLE_TYPES)
            .chain(["image", "shape", ""].iter())
        {
            assert_eq!(table.classify(tag), classify(tag), "tag {tag}");
        }
    }

    #[test]
    fn test_builtin_sets_are_disjoint() {
        assert!(CategoryTable::builtin().overlaps().is_empty());
    }

    #[test]
    fn test_extensions_add_custom_visuals() {
        let table = CategoryTable::with_extensions(&CategoryExtensions {
            chart: vec!["sankeyChart".to_string()],
            kpi: vec!["bulletCard".to_string()],
            ..Default::default()
        });

        assert_eq!(table.classify("sankeyChart"), Category::Chart);
        assert_eq!(table.classify("bulletCard"), Category::Kpi);
        assert_eq!(table.classify("lineChart"), Category::Chart);
    }

    #[test]
    fn test_overlapping_tag_resolves_by_precedence() {
        let table = CategoryTable::with_extensions(&CategoryExtensions {
            table: vec!["kpi".to_string()],
            chart: vec!["slicer".to_string()],
            ..Default::default()
        });

        assert_eq!(table.classify("kpi"), Category::Kpi);
        assert_eq!(table.classify("slicer"), Category::Slicer);

        let overlaps = table.overlaps();
        assert_eq!(
            overlaps,
            vec![
                ("kpi".to_string(), vec![Category::Kpi, Category::Table]),
                ("slicer".to_string(), vec![Category::Slicer, Category::Chart]),
            ]
        );
    }

    #[test]
    fn test_category_order_is_placement_order() {
        let mut shuffled = vec![
            Category::Other,
            Category::Table,
            Category::Slicer,
            Category::Chart,
            Category::Kpi,
        ];
        shuffled.sort();
        assert_eq!(shuffled, Category::ALL.to_vec());
    }
}
