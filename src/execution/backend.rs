//! Vision library boundary.
//!
//! The engine never touches pixels itself. It resolves typed settings for
//! the selected variant and hands them to a [`VisionBackend`], which owns
//! one operation per filter.

use crate::core::error::{ApplyResult, CatalogResult};
use crate::core::variant::FilterVariant;
use crate::execution::store::ParameterStore;
use crate::filters::builtin;
use image::DynamicImage;

/// Typed parameters of one filter application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterSettings {
    /// Identity transform
    Identity,
    /// Canny edges with the strong hysteresis threshold
    EdgeDetect {
        /// Strong threshold; the weak one is derived from it
        threshold: f32,
    },
    /// Contours drawn over the image
    ContourTrace {
        /// Stroke width in pixels
        stroke_width: u32,
    },
    /// Cartoon stylization
    Cartoonize,
    /// Fisheye warp
    FisheyeWarp {
        /// Lens strength
        strength: f32,
    },
}

impl FilterSettings {
    /// Read the current parameters of `variant` from the store.
    pub fn resolve(variant: FilterVariant, store: &ParameterStore) -> CatalogResult<Self> {
        let values = store.values(variant)?;
        Ok(match variant {
            FilterVariant::None => FilterSettings::Identity,
            FilterVariant::EdgeDetect => FilterSettings::EdgeDetect {
                threshold: values.get("threshold")? as f32,
            },
            FilterVariant::ContourTrace => FilterSettings::ContourTrace {
                stroke_width: builtin::stroke_width(values.get("thickness")?),
            },
            FilterVariant::Cartoonize => FilterSettings::Cartoonize,
            FilterVariant::FisheyeWarp => FilterSettings::FisheyeWarp {
                strength: values.get("strength")? as f32,
            },
        })
    }

    /// The variant these settings belong to.
    pub fn variant(&self) -> FilterVariant {
        match self {
            FilterSettings::Identity => FilterVariant::None,
            FilterSettings::EdgeDetect { .. } => FilterVariant::EdgeDetect,
            FilterSettings::ContourTrace { .. } => FilterVariant::ContourTrace,
            FilterSettings::Cartoonize => FilterVariant::Cartoonize,
            FilterSettings::FisheyeWarp { .. } => FilterVariant::FisheyeWarp,
        }
    }
}

/// One operation per filter variant.
///
/// # Thread Safety
///
/// `Send + Sync` lets the batch processor share one backend across the
/// rayon pool. Implementations must not keep per-call state.
pub trait VisionBackend: Send + Sync {
    /// Canny edge detection.
    fn edge_detect(&self, image: &DynamicImage, threshold: f32) -> ApplyResult<DynamicImage>;

    /// Contour tracing drawn over the image.
    fn trace_contours(&self, image: &DynamicImage, stroke_width: u32) -> ApplyResult<DynamicImage>;

    /// Cartoon stylization.
    fn cartoonize(&self, image: &DynamicImage) -> ApplyResult<DynamicImage>;

    /// Fisheye warp.
    fn fisheye(&self, image: &DynamicImage, strength: f32) -> ApplyResult<DynamicImage>;

    /// Dispatch resolved settings to the matching operation.
    ///
    /// Identity returns a copy; the engine short-circuits it before
    /// reaching the backend.
    fn run(&self, settings: FilterSettings, image: &DynamicImage) -> ApplyResult<DynamicImage> {
        match settings {
            FilterSettings::Identity => Ok(image.clone()),
            FilterSettings::EdgeDetect { threshold } => self.edge_detect(image, threshold),
            FilterSettings::ContourTrace { stroke_width } => self.trace_contours(image, stroke_width),
            FilterSettings::Cartoonize => self.cartoonize(image),
            FilterSettings::FisheyeWarp { strength } => self.fisheye(image, strength),
        }
    }
}

/// Backend built on `image` and `imageproc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageprocBackend;

impl VisionBackend for ImageprocBackend {
    fn edge_detect(&self, image: &DynamicImage, threshold: f32) -> ApplyResult<DynamicImage> {
        builtin::detect_edges(image, threshold)
    }

    fn trace_contours(&self, image: &DynamicImage, stroke_width: u32) -> ApplyResult<DynamicImage> {
        builtin::trace_contours(image, stroke_width)
    }

    fn cartoonize(&self, image: &DynamicImage) -> ApplyResult<DynamicImage> {
        builtin::cartoonize(image)
    }

    fn fisheye(&self, image: &DynamicImage, strength: f32) -> ApplyResult<DynamicImage> {
        builtin::fisheye(image, strength)
    }
}
