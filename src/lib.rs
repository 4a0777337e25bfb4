//! # Filterdeck - Interactive Image Filters
//!
//! Filterdeck applies one of a small, fixed set of computer-vision filters
//! to an image and exposes the numeric knobs of the selected filter.
//!
//! ## Features
//!
//! - **Closed filter set**: edge detection, contour tracing, cartoon and fisheye
//! - **Range-checked parameters**: every adjustment is clamped to its declared range
//! - **Non-fatal input handling**: undecodable images become an empty sentinel
//! - **Batch mode**: apply a filter to a whole folder in parallel
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use filterdeck::prelude::*;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(FilterCatalog::with_builtins());
//! let mut store = ParameterStore::new(catalog);
//! store.set(FilterVariant::EdgeDetect, "threshold", 120.0).unwrap();
//!
//! let input = ImageValue::load_or_empty("input.png");
//! let output = ApplyEngine::new().apply(FilterVariant::EdgeDetect, &store, &input);
//! if !output.is_empty() {
//!     output.save("edges.png").unwrap();
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: variants, parameter specs, image values and errors
//! - [`filters`]: the filter catalog and the built-in operations
//! - [`execution`]: parameter store, vision backend, apply engine, batch runs
//! - [`app`]: application state, messages and the interactive session
//! - [`config`]: the TOML configuration file

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod config;
pub mod core;
pub mod execution;
pub mod filters;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use filterdeck::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{ImageDataRef, ImageFormat, ImageMetadata, ImageValue};
    pub use crate::core::variant::{Category, FilterVariant};
    pub use crate::core::parameter::{DisplayScale, ParameterSpec, ParameterValues, UiHint};
    pub use crate::core::filter::FilterMetadata;

    // Errors
    pub use crate::core::error::{
        ApplyError, BatchError, CatalogError, ConfigError, StudioError, StudioResult,
    };

    // Filters
    pub use crate::filters::catalog::FilterCatalog;

    // Execution
    pub use crate::execution::backend::{FilterSettings, ImageprocBackend, VisionBackend};
    pub use crate::execution::batch::{collect_inputs, BatchJob, BatchProcessor, BatchReport};
    pub use crate::execution::engine::ApplyEngine;
    pub use crate::execution::store::{ParameterStore, StoreReport};

    // Application
    pub use crate::app::{AppState, FilterControls, Message, Session, SliderModel};

    // Configuration
    pub use crate::config::StudioConfig;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
