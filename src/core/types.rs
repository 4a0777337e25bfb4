//! Image values passed between the decode boundary, the engine and the UI.
//!
//! Pixel data lives behind an `Arc` so the identity filter and repeated
//! renders can hand the same raster around without copying it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, ImageFormat as CodecFormat};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Image wrapper with metadata.
///
/// A value without pixel data is the empty-image sentinel: the result of
/// a failed decode or a failed filter, meaning "nothing to display".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageValue {
    /// Image metadata (dimensions, format, etc.)
    pub metadata: ImageMetadata,
    /// Reference to the actual image data
    #[serde(skip)]
    data: Option<Arc<DynamicImage>>,
    /// Where the pixels came from
    pub data_ref: ImageDataRef,
}

impl PartialEq for ImageValue {
    fn eq(&self, other: &Self) -> bool {
        if self.metadata != other.metadata {
            return false;
        }
        match (&self.data, &other.data) {
            (Some(a), Some(b)) => {
                Arc::ptr_eq(a, b) || (a.color() == b.color() && a.as_bytes() == b.as_bytes())
            }
            (None, None) => true,
            _ => false,
        }
    }
}

/// Image metadata without the pixel data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Image format
    pub format: ImageFormat,
    /// Whether the image has an alpha channel
    pub has_alpha: bool,
}

/// Where an image came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "ref_type", content = "value")]
pub enum ImageDataRef {
    /// Path to an image file
    FilePath(PathBuf),
    /// Image was created in memory (no external reference)
    InMemory,
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
    Tiff,
    Bmp,
    Unknown,
}

impl ImageFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(ImageFormat::Unknown)
    }

    /// Parse an extension such as `png` or `JPG`.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "gif" => ImageFormat::Gif,
            "webp" => ImageFormat::WebP,
            "tif" | "tiff" => ImageFormat::Tiff,
            "bmp" => ImageFormat::Bmp,
            _ => ImageFormat::Unknown,
        }
    }

    /// Canonical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::WebP => "webp",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Unknown => "png",
        }
    }

    /// Extensions accepted as image inputs.
    pub fn known_extensions() -> &'static [&'static str] {
        &["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "webp"]
    }

    fn from_codec(format: CodecFormat) -> Self {
        match format {
            CodecFormat::Jpeg => ImageFormat::Jpeg,
            CodecFormat::Png => ImageFormat::Png,
            CodecFormat::Gif => ImageFormat::Gif,
            CodecFormat::WebP => ImageFormat::WebP,
            CodecFormat::Tiff => ImageFormat::Tiff,
            CodecFormat::Bmp => ImageFormat::Bmp,
            _ => ImageFormat::Unknown,
        }
    }
}

fn has_alpha(image: &DynamicImage) -> bool {
    image.color().has_alpha()
}

/// Convert `image` to a colour type the encoder for `format` accepts.
fn encodable(image: &DynamicImage, format: ImageFormat) -> Cow<'_, DynamicImage> {
    match (format, image) {
        // JPEG has no alpha channel
        (ImageFormat::Jpeg, _) if image.color().has_alpha() => {
            Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8()))
        }
        // GIF frames are RGB(A) only
        (ImageFormat::Gif, DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_)) => {
            Cow::Borrowed(image)
        }
        (ImageFormat::Gif, _) => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
        _ => Cow::Borrowed(image),
    }
}

// ============================================================================
// ImageValue Implementation
// ============================================================================

impl ImageValue {
    /// Create a new ImageValue from a DynamicImage.
    pub fn new(image: DynamicImage) -> Self {
        Self {
            metadata: ImageMetadata {
                width: image.width(),
                height: image.height(),
                format: ImageFormat::Unknown,
                has_alpha: has_alpha(&image),
            },
            data: Some(Arc::new(image)),
            data_ref: ImageDataRef::InMemory,
        }
    }

    /// The empty-image sentinel.
    pub fn empty() -> Self {
        Self {
            metadata: ImageMetadata {
                width: 0,
                height: 0,
                format: ImageFormat::Unknown,
                has_alpha: false,
            },
            data: None,
            data_ref: ImageDataRef::InMemory,
        }
    }

    /// Load an image from a file path.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, image::ImageError> {
        let path = path.into();
        let image = image::open(&path)?;
        let mut value = Self::new(image);
        value.metadata.format = ImageFormat::from_path(&path);
        value.data_ref = ImageDataRef::FilePath(path);
        Ok(value)
    }

    /// Decode an image from an in-memory buffer.
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let format = image::guess_format(bytes)?;
        let image = image::load_from_memory_with_format(bytes, format)?;
        let mut value = Self::new(image);
        value.metadata.format = ImageFormat::from_codec(format);
        Ok(value)
    }

    /// Load an image, turning any decode failure into the empty sentinel.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_path(path) {
            Ok(value) => {
                log::debug!(
                    "Loaded {} ({}x{})",
                    path.display(),
                    value.metadata.width,
                    value.metadata.height
                );
                value
            }
            Err(e) => {
                log::warn!("Could not decode {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    /// Get a shared reference to the underlying image.
    ///
    /// Returns None for the empty sentinel.
    pub fn get_image(&self) -> Option<&DynamicImage> {
        self.data.as_ref().map(|arc| arc.as_ref())
    }

    /// Whether this is the empty sentinel (no pixels to show).
    pub fn is_empty(&self) -> bool {
        self.data.is_none() || self.metadata.width == 0 || self.metadata.height == 0
    }

    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.metadata.width, self.metadata.height)
    }

    /// Whether two values share the same pixel buffer.
    pub fn shares_pixels_with(&self, other: &ImageValue) -> bool {
        match (&self.data, &other.data) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Write the image to disk; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        let image = self.get_image().ok_or_else(|| {
            image::ImageError::Parameter(image::error::ParameterError::from_kind(
                image::error::ParameterErrorKind::Generic("cannot save an empty image".to_string()),
            ))
        })?;
        let path = path.as_ref();
        encodable(image, ImageFormat::from_path(path)).save(path)
    }

    /// Encode as a PNG data URL for UI previews.
    ///
    /// The empty sentinel encodes to an empty string.
    pub fn to_data_url(&self) -> Result<String, image::ImageError> {
        let Some(image) = self.get_image() else {
            return Ok(String::new());
        };
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), CodecFormat::Png)?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(&bytes)))
    }
}

impl Default for ImageValue {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn sample() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(8, 6, |x, y| {
            Rgba([(x * 30) as u8, (y * 40) as u8, 90, 255])
        }))
    }

    #[test]
    fn test_new_metadata() {
        let value = ImageValue::new(sample());
        assert_eq!(value.dimensions(), (8, 6));
        assert!(value.metadata.has_alpha);
        assert!(!value.is_empty());
        assert_eq!(value.data_ref, ImageDataRef::InMemory);
    }

    #[test]
    fn test_empty_sentinel() {
        let empty = ImageValue::empty();
        assert!(empty.is_empty());
        assert!(empty.get_image().is_none());
        assert_eq!(empty.to_data_url().unwrap(), "");
        assert_eq!(empty, ImageValue::default());
        assert!(empty.save("never-written.png").is_err());
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(ImageValue::decode(b"definitely not an image").is_err());
    }

    #[test]
    fn test_load_or_empty_missing_file() {
        let value = ImageValue::load_or_empty("/nonexistent/path/to/image.png");
        assert!(value.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");

        let value = ImageValue::new(sample());
        value.save(&path).unwrap();

        let loaded = ImageValue::from_path(&path).unwrap();
        assert_eq!(loaded.dimensions(), (8, 6));
        assert_eq!(loaded.metadata.format, ImageFormat::Png);
        assert_eq!(loaded.data_ref, ImageDataRef::FilePath(path));
        assert_eq!(
            loaded.get_image().unwrap().to_rgba8().as_raw(),
            sample().to_rgba8().as_raw()
        );
    }

    #[test]
    fn test_decode_png_bytes() {
        let value = ImageValue::new(sample());
        let url = value.to_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let encoded = url.trim_start_matches("data:image/png;base64,");
        let bytes = STANDARD.decode(encoded).unwrap();
        let decoded = ImageValue::decode(&bytes).unwrap();
        assert_eq!(decoded.metadata.format, ImageFormat::Png);
        assert_eq!(decoded.dimensions(), (8, 6));
    }

    #[test]
    fn test_save_gray_and_alpha_to_restricted_formats() {
        let dir = tempfile::tempdir().unwrap();
        let edges = ImageValue::new(DynamicImage::ImageLuma8(image::GrayImage::from_fn(8, 6, |x, _| {
            image::Luma([if x % 2 == 0 { 0 } else { 255 }])
        })));

        let gif = dir.path().join("edges.gif");
        edges.save(&gif).unwrap();
        let reloaded = ImageValue::from_path(&gif).unwrap();
        assert_eq!(reloaded.dimensions(), (8, 6));
        assert_eq!(reloaded.metadata.format, ImageFormat::Gif);

        let jpg = dir.path().join("sample.jpg");
        ImageValue::new(sample()).save(&jpg).unwrap();
        assert_eq!(ImageValue::from_path(&jpg).unwrap().dimensions(), (8, 6));
    }

    #[test]
    fn test_equality_respects_color_type() {
        let gray = DynamicImage::ImageLuma8(image::GrayImage::from_raw(4, 1, vec![1, 2, 3, 4]).unwrap());
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_raw(1, 1, vec![1, 2, 3, 4]).unwrap());
        let mut a = ImageValue::new(gray);
        let mut b = ImageValue::new(rgba);
        // Same bytes, same metadata, different layout
        a.metadata = ImageMetadata { width: 1, height: 1, format: ImageFormat::Unknown, has_alpha: false };
        b.metadata = a.metadata;
        assert_eq!(a.get_image().unwrap().as_bytes(), b.get_image().unwrap().as_bytes());
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImageFormat::from_path(Path::new("a/b.JPG")), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path(Path::new("a/b.tif")), ImageFormat::Tiff);
        assert_eq!(ImageFormat::from_path(Path::new("a/b")), ImageFormat::Unknown);
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
    }
}
