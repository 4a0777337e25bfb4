//! Filter execution.
//!
//! Contains the parameter store, the vision backend boundary, the apply
//! engine and batch processing.

pub mod backend;
pub mod batch;
pub mod engine;
pub mod store;

pub use backend::{FilterSettings, ImageprocBackend, VisionBackend};
pub use batch::{collect_inputs, BatchJob, BatchProcessor, BatchReport};
pub use engine::ApplyEngine;
pub use store::{ParameterSnapshot, ParameterStore, StoreReport};
