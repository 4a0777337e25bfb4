//! Fisheye distortion: radial remap that magnifies the centre.

use crate::core::error::{ApplyError, ApplyResult};
use crate::core::filter::FilterMetadata;
use crate::core::parameter::{ParameterSpec, UiHint};
use crate::core::variant::{Category, FilterVariant};
use image::{DynamicImage, Rgba};
use imageproc::geometric_transformations::{warp_with, Interpolation};

/// Catalog entry for the fisheye warp.
pub fn metadata() -> FilterMetadata {
    FilterMetadata::builder(FilterVariant::FisheyeWarp, "Fisheye")
        .category(Category::Distort)
        .description("Bulge the centre of the image like a fisheye lens")
        .parameter(
            ParameterSpec::new("strength", 200.0)
                .with_range(1.0, 300.0)
                .with_ui_hint(UiHint::Slider { steps: 299 })
                .with_description("How strongly the centre is magnified"),
        )
        .tags(["fisheye", "lens", "distort", "warp"])
        .build()
}

/// Lens geometry for one image size and strength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FisheyeLens {
    cx: f32,
    cy: f32,
    radius: f32,
    exponent: f32,
}

impl FisheyeLens {
    /// Lens inscribed in a `width` x `height` image.
    pub fn new(width: u32, height: u32, strength: f32) -> Self {
        Self {
            cx: (width as f32 - 1.0) / 2.0,
            cy: (height as f32 - 1.0) / 2.0,
            radius: (width.min(height) as f32 - 1.0) / 2.0,
            exponent: 1.0 + strength.max(0.0) / 100.0,
        }
    }

    /// Map an output pixel position to the source position it samples.
    ///
    /// Points on or outside the lens circle map to themselves.
    pub fn source_position(&self, x: f32, y: f32) -> (f32, f32) {
        let dx = x - self.cx;
        let dy = y - self.cy;
        let r = (dx * dx + dy * dy).sqrt() / self.radius;
        if r == 0.0 || r >= 1.0 {
            return (x, y);
        }
        let scale = r.powf(self.exponent - 1.0);
        (self.cx + dx * scale, self.cy + dy * scale)
    }
}

/// Warp an image through a fisheye lens.
pub fn fisheye(image: &DynamicImage, strength: f32) -> ApplyResult<DynamicImage> {
    let (width, height) = (image.width(), image.height());
    if width < 2 || height < 2 {
        return Err(ApplyError::TooSmall {
            operation: "fisheye warp",
            width,
            height,
        });
    }

    let lens = FisheyeLens::new(width, height, strength);
    let warped = warp_with(
        &image.to_rgba8(),
        move |x, y| lens.source_position(x, y),
        Interpolation::Bilinear,
        Rgba([0, 0, 0, 0]),
    );

    Ok(DynamicImage::ImageRgba8(warped))
}
