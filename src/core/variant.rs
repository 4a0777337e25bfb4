//! Filter variants and their categories.
//!
//! The set of filters is closed, so the variant is a plain enum that the
//! engine and the UI layer match on exhaustively.

use crate::core::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the selectable image transforms, or the identity transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterVariant {
    /// No filter: the input is shown unchanged
    None,
    /// Canny edge detection
    EdgeDetect,
    /// Contours traced over the original image
    ContourTrace,
    /// Flattened colours with dark outlines
    Cartoonize,
    /// Radial fisheye distortion
    FisheyeWarp,
}

impl FilterVariant {
    /// Every variant, in menu order.
    pub const ALL: [FilterVariant; 5] = [
        FilterVariant::EdgeDetect,
        FilterVariant::Cartoonize,
        FilterVariant::ContourTrace,
        FilterVariant::FisheyeWarp,
        FilterVariant::None,
    ];

    /// Stable identifier used in config files and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            FilterVariant::None => "none",
            FilterVariant::EdgeDetect => "edge_detect",
            FilterVariant::ContourTrace => "contour_trace",
            FilterVariant::Cartoonize => "cartoonize",
            FilterVariant::FisheyeWarp => "fisheye_warp",
        }
    }

    /// Label shown on the filter menu button.
    pub fn menu_label(&self) -> &'static str {
        match self {
            FilterVariant::None => "Clear filter",
            FilterVariant::EdgeDetect => "Canny",
            FilterVariant::ContourTrace => "Contours",
            FilterVariant::Cartoonize => "Cartoon",
            FilterVariant::FisheyeWarp => "Fisheye",
        }
    }

    /// Whether this is the identity transform.
    pub fn is_identity(&self) -> bool {
        matches!(self, FilterVariant::None)
    }
}

impl Default for FilterVariant {
    fn default() -> Self {
        FilterVariant::None
    }
}

impl fmt::Display for FilterVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FilterVariant {
    type Err = CatalogError;

    /// Accepts the stable id as well as the menu labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "none" | "clear" | "clear_filter" | "noop" => Ok(FilterVariant::None),
            "edge_detect" | "canny" | "edges" => Ok(FilterVariant::EdgeDetect),
            "contour_trace" | "contours" | "contour" => Ok(FilterVariant::ContourTrace),
            "cartoonize" | "cartoon" => Ok(FilterVariant::Cartoonize),
            "fisheye_warp" | "fisheye" => Ok(FilterVariant::FisheyeWarp),
            _ => Err(CatalogError::UnknownFilterId(s.to_string())),
        }
    }
}

/// Category for organizing filters in menus and listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Edge and outline extraction
    Edge,
    /// Artistic stylization
    Stylize,
    /// Geometric distortion
    Distort,
    /// Utility filters
    Utility,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Edge => "Edge",
            Category::Stylize => "Stylize",
            Category::Distort => "Distort",
            Category::Utility => "Utility",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Utility
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids_and_labels() {
        for variant in FilterVariant::ALL {
            assert_eq!(variant.id().parse::<FilterVariant>().unwrap(), variant);
            assert_eq!(variant.menu_label().parse::<FilterVariant>().unwrap(), variant);
        }
        assert_eq!("Fisheye-Warp".parse::<FilterVariant>().unwrap(), FilterVariant::FisheyeWarp);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "sepia".parse::<FilterVariant>().unwrap_err();
        assert_eq!(err, CatalogError::UnknownFilterId("sepia".to_string()));
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&FilterVariant::ContourTrace).unwrap();
        assert_eq!(json, "\"contour_trace\"");
    }

    #[test]
    fn test_identity() {
        assert!(FilterVariant::None.is_identity());
        assert!(!FilterVariant::Cartoonize.is_identity());
        assert_eq!(FilterVariant::default(), FilterVariant::None);
    }
}
