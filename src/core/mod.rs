//! Core types for the filterdeck filter core.
//!
//! This module contains the foundational types shared by the catalog, the
//! parameter store and the apply engine:
//! - Filter variants and categories
//! - Parameter specs and resolved values
//! - Filter metadata
//! - Image values and the empty sentinel
//! - Error types

pub mod error;
pub mod filter;
pub mod parameter;
pub mod types;
pub mod variant;

// Re-export commonly used types
pub use error::{ApplyError, BatchError, CatalogError, ConfigError, StudioError};
pub use filter::{FilterMetadata, FilterMetadataBuilder};
pub use parameter::{DisplayScale, ParameterSpec, ParameterValues, UiHint};
pub use types::{ImageDataRef, ImageFormat, ImageMetadata, ImageValue};
pub use variant::{Category, FilterVariant};
