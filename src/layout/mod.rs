//! Pure dashboard layout: classification, zone planning and grid snapping.
//!
//! Nothing in this module performs I/O. [`plan`] is a function of the
//! visuals, the canvas and the config only, so pages can be planned in any
//! order or in parallel.

mod classify;
mod model;
mod planner;
mod snap;
mod split;

pub use classify::{classify, Category, CategoryExtensions, CategoryTable};
pub use model::{
    Layout, LayoutConfig, PageCanvas, Placement, Position, Rect, VisualDescriptor,
};
pub use planner::{
    grid_shape, plan, plan_page, VisualPools, Zones, OVERFLOW_BAND_HEIGHT, OVERFLOW_MAX_HEIGHT,
};
pub use snap::snap;
pub use split::SplitPolicy;
