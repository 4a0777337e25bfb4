//! Contour tracing: edge contours drawn over the original image.

use crate::core::error::{ApplyError, ApplyResult};
use crate::core::filter::FilterMetadata;
use crate::core::parameter::ParameterSpec;
use crate::core::variant::{Category, FilterVariant};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::contours::find_contours;
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use imageproc::edges::canny;
use imageproc::point::Point;

/// Hysteresis thresholds of the edge pass feeding the tracer.
const EDGE_LOW: f32 = 50.0;
const EDGE_HIGH: f32 = 150.0;

/// Colour of the traced contours.
pub const CONTOUR_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Catalog entry for the contour tracer.
pub fn metadata() -> FilterMetadata {
    FilterMetadata::builder(FilterVariant::ContourTrace, "Contours")
        .category(Category::Edge)
        .description("Trace object outlines and draw them over the image")
        .parameter(
            ParameterSpec::new("thickness", 0.05)
                .with_range(0.0, 0.15)
                .as_percent()
                .with_description("Stroke width of the drawn contours"),
        )
        .tags(["contours", "outline", "trace"])
        .build()
}

/// Convert the stored thickness fraction to a stroke width in pixels.
pub fn stroke_width(thickness: f64) -> u32 {
    (thickness * 100.0).round().max(0.0) as u32
}

/// Draw the contours of `image` with the given stroke width.
///
/// A width of zero draws nothing and returns the image as RGBA.
pub fn trace_contours(image: &DynamicImage, width: u32) -> ApplyResult<DynamicImage> {
    let mut canvas = image.to_rgba8();
    if width == 0 {
        return Ok(DynamicImage::ImageRgba8(canvas));
    }
    if image.width() < 3 || image.height() < 3 {
        return Err(ApplyError::TooSmall {
            operation: "contour tracing",
            width: image.width(),
            height: image.height(),
        });
    }

    let edges = canny(&image.to_luma8(), EDGE_LOW, EDGE_HIGH);
    let contours = find_contours::<i32>(&edges);
    log::trace!("traced {} contours", contours.len());

    for contour in &contours {
        draw_contour(&mut canvas, &contour.points, width);
    }

    Ok(DynamicImage::ImageRgba8(canvas))
}

fn draw_contour(canvas: &mut RgbaImage, points: &[Point<i32>], width: u32) {
    let radius = (width / 2) as i32;

    if let [only] = points {
        draw_filled_circle_mut(canvas, (only.x, only.y), radius, CONTOUR_COLOR);
        return;
    }

    let closing = points.last().zip(points.first());
    for (a, b) in points.windows(2).map(|w| (&w[0], &w[1])).chain(closing) {
        draw_line_segment_mut(
            canvas,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            CONTOUR_COLOR,
        );
    }

    if radius > 0 {
        for p in points {
            draw_filled_circle_mut(canvas, (p.x, p.y), radius, CONTOUR_COLOR);
        }
    }
}
