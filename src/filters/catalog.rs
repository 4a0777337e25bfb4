//! Filter catalog: the static registry of filter variants and their
//! parameter specs.

use crate::core::error::{CatalogError, CatalogResult};
use crate::core::filter::FilterMetadata;
use crate::core::parameter::ParameterSpec;
use crate::core::variant::{Category, FilterVariant};
use indexmap::IndexMap;

/// Registry for all available filter variants.
///
/// The catalog is populated at startup and only read afterwards. Lookups
/// for a variant that was never registered are configuration errors.
#[derive(Debug, Clone)]
pub struct FilterCatalog {
    /// Metadata indexed by variant, in registration order.
    filters: IndexMap<FilterVariant, FilterMetadata>,
    /// Variants grouped by category.
    categories: IndexMap<Category, Vec<FilterVariant>>,
}

impl FilterCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self {
            filters: IndexMap::new(),
            categories: IndexMap::new(),
        }
    }

    /// Create a catalog pre-populated with the built-in filters.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        for metadata in crate::filters::builtin::all() {
            let variant = metadata.variant;
            if let Err(e) = catalog.register(metadata) {
                log::error!("Skipping built-in filter '{}': {}", variant, e);
            }
        }
        catalog
    }

    /// Register a filter variant.
    ///
    /// Re-registering a variant replaces its metadata.
    pub fn register(&mut self, metadata: FilterMetadata) -> CatalogResult<()> {
        metadata.validate()?;

        let variant = metadata.variant;
        let category = metadata.category;

        if let Some(previous) = self.filters.insert(variant, metadata) {
            if let Some(ids) = self.categories.get_mut(&previous.category) {
                ids.retain(|v| *v != variant);
            }
        }

        self.categories.entry(category).or_default().push(variant);
        log::debug!("Registered filter '{}'", variant);
        Ok(())
    }

    /// Remove a variant from the catalog.
    pub fn unregister(&mut self, variant: FilterVariant) -> bool {
        if let Some(metadata) = self.filters.shift_remove(&variant) {
            if let Some(ids) = self.categories.get_mut(&metadata.category) {
                ids.retain(|v| *v != variant);
            }
            true
        } else {
            false
        }
    }

    /// Get the parameter specs of a variant.
    pub fn spec_for(&self, variant: FilterVariant) -> CatalogResult<&[ParameterSpec]> {
        self.metadata(variant).map(|m| m.parameters.as_slice())
    }

    /// Get the metadata of a variant.
    pub fn metadata(&self, variant: FilterVariant) -> CatalogResult<&FilterMetadata> {
        self.filters
            .get(&variant)
            .ok_or(CatalogError::UnregisteredVariant(variant))
    }

    /// Get one parameter spec of a variant.
    pub fn parameter(&self, variant: FilterVariant, name: &str) -> CatalogResult<&ParameterSpec> {
        self.metadata(variant)?
            .get_parameter(name)
            .ok_or_else(|| CatalogError::UnknownParameter {
                variant,
                name: name.to_string(),
            })
    }

    /// Check if a variant is registered.
    pub fn contains(&self, variant: FilterVariant) -> bool {
        self.filters.contains_key(&variant)
    }

    /// All registered variants, in registration order.
    pub fn variants(&self) -> impl Iterator<Item = FilterVariant> + '_ {
        self.filters.keys().copied()
    }

    /// All registered metadata, in registration order.
    pub fn filters(&self) -> impl Iterator<Item = &FilterMetadata> {
        self.filters.values()
    }

    /// Get variants by category.
    pub fn filters_by_category(&self, category: Category) -> Vec<FilterVariant> {
        self.categories.get(&category).cloned().unwrap_or_default()
    }

    /// Search filters by id, name, description or tag.
    pub fn search(&self, query: &str) -> Vec<FilterVariant> {
        let query = query.to_lowercase();

        self.filters
            .values()
            .filter(|m| {
                m.id().contains(&query)
                    || m.name.to_lowercase().contains(&query)
                    || m.description.to_lowercase().contains(&query)
                    || m.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .map(|m| m.variant)
            .collect()
    }

    /// Get filters grouped by category for menus, sorted by name.
    pub fn grouped_by_category(&self) -> IndexMap<Category, Vec<&FilterMetadata>> {
        let mut grouped: IndexMap<Category, Vec<&FilterMetadata>> = IndexMap::new();

        for metadata in self.filters.values() {
            grouped.entry(metadata.category).or_default().push(metadata);
        }

        for filters in grouped.values_mut() {
            filters.sort_by(|a, b| a.name.cmp(&b.name));
        }

        grouped
    }

    /// Get the total number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Default for FilterCatalog {
    fn default() -> Self {
        Self::with_builtins()
    }
}
