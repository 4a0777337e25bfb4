//! Built-in filter implementations.
//!
//! Each module pairs a filter's catalog metadata with the operation that
//! runs it on top of `imageproc`.

mod cartoon;
mod contour;
mod edge;
mod fisheye;
mod identity;

use crate::core::filter::FilterMetadata;

/// Metadata of every built-in filter, in menu order.
pub fn all() -> Vec<FilterMetadata> {
    vec![
        edge::metadata(),
        cartoon::metadata(),
        contour::metadata(),
        fisheye::metadata(),
        identity::metadata(),
    ]
}

// Re-export for direct access
pub use cartoon::cartoonize;
pub use contour::{stroke_width, trace_contours, CONTOUR_COLOR};
pub use edge::{detect_edges, LOW_THRESHOLD_RATIO};
pub use fisheye::{fisheye, FisheyeLens};
