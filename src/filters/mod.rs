//! Filter module.
//!
//! Contains the filter catalog and the built-in filter implementations.

pub mod builtin;
pub mod catalog;

pub use catalog::FilterCatalog;
