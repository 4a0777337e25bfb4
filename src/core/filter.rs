//! Filter metadata.
//!
//! Metadata is everything the catalog knows about a filter without running
//! it: names for the menu, a description and the parameter specs the UI
//! turns into sliders.

use crate::core::error::CatalogError;
use crate::core::parameter::ParameterSpec;
use crate::core::variant::{Category, FilterVariant};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Metadata describing a filter variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterMetadata {
    /// The variant this metadata describes
    pub variant: FilterVariant,
    /// Human-readable name (e.g., "Canny Edges")
    pub name: String,
    /// Category for menu organization
    pub category: Category,
    /// Detailed description
    pub description: String,
    /// Parameter specs, in slider order
    pub parameters: Vec<ParameterSpec>,
    /// Searchable tags
    pub tags: Vec<String>,
}

impl FilterMetadata {
    /// Create a new metadata builder.
    pub fn builder(variant: FilterVariant, name: impl Into<String>) -> FilterMetadataBuilder {
        FilterMetadataBuilder::new(variant, name)
    }

    /// Stable identifier of the variant.
    pub fn id(&self) -> &'static str {
        self.variant.id()
    }

    /// Get all parameter names.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    /// Find a parameter by name.
    pub fn get_parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Whether the filter exposes any adjustable parameters.
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Check every spec and reject duplicate names.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for spec in &self.parameters {
            spec.validate(self.variant)?;
            if !seen.insert(spec.name.as_str()) {
                return Err(CatalogError::DuplicateParameter {
                    variant: self.variant,
                    name: spec.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Builder for FilterMetadata.
pub struct FilterMetadataBuilder {
    variant: FilterVariant,
    name: String,
    category: Category,
    description: String,
    parameters: Vec<ParameterSpec>,
    tags: Vec<String>,
}

impl FilterMetadataBuilder {
    /// Create a new builder with required fields.
    pub fn new(variant: FilterVariant, name: impl Into<String>) -> Self {
        Self {
            variant,
            name: name.into(),
            category: Category::default(),
            description: String::new(),
            parameters: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a parameter.
    pub fn parameter(mut self, param: ParameterSpec) -> Self {
        self.parameters.push(param);
        self
    }

    /// Add multiple tags.
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }

    /// Build the metadata.
    pub fn build(self) -> FilterMetadata {
        FilterMetadata {
            variant: self.variant,
            name: self.name,
            category: self.category,
            description: self.description,
            parameters: self.parameters,
            tags: self.tags,
        }
    }
}
