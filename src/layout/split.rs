//! Division of a span into equal cells.

use serde::{Deserialize, Serialize};

/// How a span is shared between `count` equal cells separated by a gap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Floor division. Leftover pixels stay unused at the end of the span.
    #[default]
    Truncate,
}

impl SplitPolicy {
    /// Extent of one cell when `count` cells and `count - 1` gaps share `span`.
    ///
    /// Returns 0 when `count` is 0. A negative result passes through
    /// unchanged when the gaps alone exceed the span.
    pub fn cell_extent(&self, span: i64, count: usize, gap: i64) -> i64 {
        let Ok(count) = i64::try_from(count) else {
            return 0;
        };
        if count == 0 {
            return 0;
        }

        match self {
            SplitPolicy::Truncate => (span - (count - 1) * gap).div_euclid(count),
        }
    }
}
