//! Error types for filterdeck.
//!
//! Uses thiserror for structured errors. The taxonomy follows how each
//! failure is handled:
//! - Configuration errors (catalog/config mismatches) fail fast
//! - Input errors (undecodable images) are absorbed into the empty sentinel
//! - Out-of-range parameter values are clamped and never reach this module

use crate::core::variant::FilterVariant;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for filterdeck.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Filter error: {0}")]
    Apply(#[from] ApplyError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No rendered image to save")]
    NothingToSave,

    #[error("{0}")]
    Other(String),
}

/// Mismatches between the filter catalog and its callers.
///
/// These are programming or configuration mistakes, never runtime
/// conditions of a correctly populated catalog.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CatalogError {
    #[error("Filter variant '{0}' is not registered")]
    UnregisteredVariant(FilterVariant),

    #[error("Filter '{variant}' has no parameter named '{name}'")]
    UnknownParameter { variant: FilterVariant, name: String },

    #[error("Parameter '{name}' of '{variant}' has an invalid spec: min {min}, default {default}, max {max}")]
    InvalidSpec {
        variant: FilterVariant,
        name: String,
        min: f64,
        max: f64,
        default: f64,
    },

    #[error("Filter '{variant}' declares parameter '{name}' more than once")]
    DuplicateParameter { variant: FilterVariant, name: String },

    #[error("Unknown filter '{0}'")]
    UnknownFilterId(String),
}

/// Failures inside the vision library boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplyError {
    #[error("Input image is empty or was not decoded")]
    InvalidInput,

    #[error("Image of {width}x{height} is too small for {operation}")]
    TooSmall {
        operation: &'static str,
        width: u32,
        height: u32,
    },

    #[error("Image processing error: {0}")]
    Processing(String),
}

/// Errors loading or applying the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {error}")]
    Read { path: PathBuf, error: std::io::Error },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid preset: {0}")]
    Preset(#[from] CatalogError),

    #[error("Unsupported output format '{0}'")]
    OutputFormat(String),

    #[error("Invalid log level '{0}'")]
    LogLevel(String),
}

/// Errors during batch processing.
#[derive(Error, Debug, Clone)]
pub enum BatchError {
    #[error("No input files found in {dir} matching pattern: {pattern}")]
    NoInputsFound { dir: String, pattern: String },

    #[error("Output directory does not exist: {path}")]
    OutputDirectoryMissing { path: String },

    #[error("Invalid glob pattern '{pattern}': {error}")]
    InvalidPattern { pattern: String, error: String },

    #[error("Failed to process {path}: {error}")]
    ItemFailed { path: String, error: String },
}

// ============================================================================
// Error Utilities
// ============================================================================

impl StudioError {
    /// Check if the interactive flow can continue after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, StudioError::Catalog(_) | StudioError::Config(_))
    }
}

impl CatalogError {
    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            CatalogError::UnregisteredVariant(variant) => Some(format!(
                "Register '{}' in the catalog or use FilterCatalog::with_builtins()",
                variant.id()
            )),
            CatalogError::UnknownParameter { variant, .. } => Some(format!(
                "Run 'info {}' to list its parameters",
                variant.id()
            )),
            CatalogError::InvalidSpec { .. } => {
                Some("Ensure min <= default <= max".to_string())
            }
            CatalogError::UnknownFilterId(_) => {
                Some("Run 'list' to see available filters".to_string())
            }
            CatalogError::DuplicateParameter { .. } => None,
        }
    }
}

/// Result type alias for filterdeck operations.
pub type StudioResult<T> = Result<T, StudioError>;

/// Result type alias for catalog and store operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result type alias for vision backend operations.
pub type ApplyResult<T> = Result<T, ApplyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_suggestions() {
        let error = CatalogError::UnknownParameter {
            variant: FilterVariant::EdgeDetect,
            name: "radius".to_string(),
        };
        let fix = error.suggested_fix().unwrap();
        assert!(fix.contains("edge_detect"));
        assert!(error.to_string().contains("radius"));
    }

    #[test]
    fn test_recoverability() {
        let config: StudioError = CatalogError::UnregisteredVariant(FilterVariant::Cartoonize).into();
        assert!(!config.is_recoverable());

        let input: StudioError = ApplyError::InvalidInput.into();
        assert!(input.is_recoverable());
        assert!(StudioError::NothingToSave.is_recoverable());
    }
}
