//! The "no filter" entry. The engine short-circuits it, so only metadata
//! lives here.

use crate::core::filter::FilterMetadata;
use crate::core::variant::{Category, FilterVariant};

/// Catalog entry for the identity transform.
pub fn metadata() -> FilterMetadata {
    FilterMetadata::builder(FilterVariant::None, "No Filter")
        .category(Category::Utility)
        .description("Show the image unchanged")
        .tags(["clear", "original"])
        .build()
}
