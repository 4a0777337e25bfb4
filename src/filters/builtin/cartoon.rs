//! Cartoon stylization: smoothed, posterized colours with dark outlines.

use crate::core::error::{ApplyError, ApplyResult};
use crate::core::filter::FilterMetadata;
use crate::core::variant::{Category, FilterVariant};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::median_filter;
use imageproc::morphology::dilate;

const SMOOTHING_RADIUS: u32 = 3;
const COLOR_LEVELS: u16 = 6;
const OUTLINE_LOW: f32 = 40.0;
const OUTLINE_HIGH: f32 = 100.0;
const OUTLINE_GROWTH: u8 = 1;

/// Catalog entry for the cartoon filter. It takes no parameters.
pub fn metadata() -> FilterMetadata {
    FilterMetadata::builder(FilterVariant::Cartoonize, "Cartoon")
        .category(Category::Stylize)
        .description("Flatten colours and ink the outlines for a comic look")
        .tags(["cartoon", "comic", "posterize"])
        .build()
}

/// Stylize an image.
pub fn cartoonize(image: &DynamicImage) -> ApplyResult<DynamicImage> {
    let (width, height) = (image.width(), image.height());
    if width < 3 || height < 3 {
        return Err(ApplyError::TooSmall {
            operation: "cartoon stylization",
            width,
            height,
        });
    }

    let rgba = image.to_rgba8();
    let smoothed = median_filter(&rgba, SMOOTHING_RADIUS, SMOOTHING_RADIUS);
    let outlines = dilate(
        &canny(&image.to_luma8(), OUTLINE_LOW, OUTLINE_HIGH),
        Norm::LInf,
        OUTLINE_GROWTH,
    );

    let out = RgbaImage::from_fn(width, height, |x, y| {
        let Rgba([r, g, b, a]) = *smoothed.get_pixel(x, y);
        if outlines.get_pixel(x, y)[0] > 0 {
            Rgba([0, 0, 0, a])
        } else {
            Rgba([posterize(r), posterize(g), posterize(b), a])
        }
    });

    Ok(DynamicImage::ImageRgba8(out))
}

/// Snap a channel to the centre of one of `COLOR_LEVELS` bands.
fn posterize(channel: u8) -> u8 {
    let band = 256 / COLOR_LEVELS;
    let level = (channel as u16 / band).min(COLOR_LEVELS - 1);
    (level * band + band / 2) as u8
}
