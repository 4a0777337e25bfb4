//! Edge detection: Canny edges on the luminance channel.

use crate::core::error::{ApplyError, ApplyResult};
use crate::core::filter::FilterMetadata;
use crate::core::parameter::{ParameterSpec, UiHint};
use crate::core::variant::{Category, FilterVariant};
use image::DynamicImage;
use imageproc::edges::canny;

/// Ratio between the weak and the strong hysteresis threshold.
pub const LOW_THRESHOLD_RATIO: f32 = 0.4;

/// Catalog entry for the edge detector.
pub fn metadata() -> FilterMetadata {
    FilterMetadata::builder(FilterVariant::EdgeDetect, "Canny Edges")
        .category(Category::Edge)
        .description("Detect edges with the Canny detector, shown white on black")
        .parameter(
            ParameterSpec::new("threshold", 200.0)
                .with_range(1.0, 300.0)
                .with_ui_hint(UiHint::Slider { steps: 299 })
                .with_description("Gradient strength an edge must reach to be kept"),
        )
        .tags(["canny", "edges", "outline"])
        .build()
}

/// Run Canny with `threshold` as the strong threshold.
pub fn detect_edges(image: &DynamicImage, threshold: f32) -> ApplyResult<DynamicImage> {
    let (width, height) = (image.width(), image.height());
    if width < 3 || height < 3 {
        return Err(ApplyError::TooSmall {
            operation: "edge detection",
            width,
            height,
        });
    }

    let gray = image.to_luma8();
    let high = threshold.max(f32::EPSILON);
    let low = high * LOW_THRESHOLD_RATIO;
    log::trace!("canny low={:.1} high={:.1} on {}x{}", low, high, width, height);

    Ok(DynamicImage::ImageLuma8(canny(&gray, low, high)))
}
