//! CLI command implementations.
//!
//! Each command is implemented in its own submodule and receives the
//! validated [`Settings`](crate::Settings) for the run.

mod apply;
mod plan;

pub use apply::{apply, render_summary};
pub use plan::{plan, planned_json};
