pub mod commands;
pub mod error_fmt;
pub mod layout;
pub mod render;
pub mod report;
pub mod settings;

// Re-export the layout core for library users
pub use layout::{
    classify, plan, plan_page, snap, Category, CategoryTable, Layout, LayoutConfig, PageCanvas,
    Position, SplitPolicy, VisualDescriptor, VisualPools,
};

// Re-export orchestration entry points for the binary
pub use report::{plan_report, reformat, PlannedPage, ReformatSummary, ReportError};
pub use settings::{Settings, SettingsError};
