//! Parameter store: current parameter values per filter variant.
//!
//! Values survive filter switches, so selecting another filter and coming
//! back restores the user's adjustments instead of the defaults. Every
//! write is clamped into the spec's range.

use crate::core::error::CatalogResult;
use crate::core::parameter::ParameterValues;
use crate::core::variant::FilterVariant;
use crate::filters::catalog::FilterCatalog;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Explicitly set values, keyed by variant then parameter name.
pub type ParameterSnapshot = IndexMap<FilterVariant, IndexMap<String, f64>>;

/// Mutable mapping from filter variant to its parameter values.
///
/// Cloning is cheap: the catalog is shared and only adjusted values are
/// stored.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    catalog: Arc<FilterCatalog>,
    values: HashMap<FilterVariant, HashMap<String, f64>>,
}

impl ParameterStore {
    /// Create a store where every parameter holds its default.
    pub fn new(catalog: Arc<FilterCatalog>) -> Self {
        Self {
            catalog,
            values: HashMap::new(),
        }
    }

    /// The catalog used for validation.
    pub fn catalog(&self) -> &FilterCatalog {
        &self.catalog
    }

    /// Current value of a parameter, or its default if never set.
    pub fn get(&self, variant: FilterVariant, name: &str) -> CatalogResult<f64> {
        let spec = self.catalog.parameter(variant, name)?;
        Ok(self
            .values
            .get(&variant)
            .and_then(|params| params.get(name))
            .copied()
            .unwrap_or(spec.default))
    }

    /// Clamp `value` into the parameter's range, store it, and return what
    /// was stored.
    pub fn set(&mut self, variant: FilterVariant, name: &str, value: f64) -> CatalogResult<f64> {
        let spec = self.catalog.parameter(variant, name)?;
        let stored = spec.clamp(value);
        if stored != value {
            log::debug!("Clamped {}.{} from {} to {}", variant, name, value, stored);
        }

        self.values
            .entry(variant)
            .or_default()
            .insert(spec.name.clone(), stored);
        Ok(stored)
    }

    /// Resolve every parameter of a variant, in declaration order.
    pub fn values(&self, variant: FilterVariant) -> CatalogResult<ParameterValues> {
        let specs = self.catalog.spec_for(variant)?;
        let stored = self.values.get(&variant);

        let mut values = ParameterValues::new(variant);
        for spec in specs {
            let value = stored
                .and_then(|params| params.get(&spec.name))
                .copied()
                .unwrap_or(spec.default);
            values.insert(spec.name.clone(), value);
        }
        Ok(values)
    }

    /// Restore the defaults of one variant.
    pub fn reset(&mut self, variant: FilterVariant) -> CatalogResult<()> {
        self.catalog.spec_for(variant)?;
        self.values.remove(&variant);
        Ok(())
    }

    /// Whether a parameter was explicitly set.
    pub fn is_modified(&self, variant: FilterVariant, name: &str) -> bool {
        self.values
            .get(&variant)
            .map(|params| params.contains_key(name))
            .unwrap_or(false)
    }

    /// The value formatted the way the UI shows it.
    pub fn display_value(&self, variant: FilterVariant, name: &str) -> CatalogResult<String> {
        let spec = self.catalog.parameter(variant, name)?;
        Ok(spec.format_value(self.get(variant, name)?))
    }

    /// Explicitly set values, ordered for stable serialization.
    pub fn snapshot(&self) -> ParameterSnapshot {
        let mut snapshot: ParameterSnapshot = self
            .values
            .iter()
            .filter(|(_, params)| !params.is_empty())
            .map(|(variant, params)| {
                let mut params: IndexMap<String, f64> =
                    params.iter().map(|(k, v)| (k.clone(), *v)).collect();
                params.sort_keys();
                (*variant, params)
            })
            .collect();
        snapshot.sort_keys();
        snapshot
    }

    /// Apply a snapshot through the clamping `set`.
    pub fn restore(&mut self, snapshot: &ParameterSnapshot) -> CatalogResult<()> {
        for (variant, params) in snapshot {
            for (name, value) in params {
                self.set(*variant, name, *value)?;
            }
        }
        Ok(())
    }
}

impl PartialEq for ParameterStore {
    fn eq(&self, other: &Self) -> bool {
        self.snapshot() == other.snapshot()
    }
}

/// Serializable form of a store, used for `--json` output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreReport {
    /// Resolved values per variant
    pub filters: IndexMap<FilterVariant, IndexMap<String, f64>>,
}

impl StoreReport {
    /// Resolve every registered variant of a store.
    pub fn from_store(store: &ParameterStore) -> CatalogResult<Self> {
        let mut filters = IndexMap::new();
        for variant in store.catalog().variants() {
            let values = store.values(variant)?;
            filters.insert(
                variant,
                values.iter().map(|(k, v)| (k.to_string(), v)).collect(),
            );
        }
        Ok(Self { filters })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CatalogError;
    use proptest::prelude::*;

    fn store() -> ParameterStore {
        ParameterStore::new(Arc::new(FilterCatalog::with_builtins()))
    }

    #[test]
    fn test_defaults_before_set() {
        let store = store();
        assert_eq!(store.get(FilterVariant::EdgeDetect, "threshold").unwrap(), 200.0);
        assert_eq!(store.get(FilterVariant::ContourTrace, "thickness").unwrap(), 0.05);
        assert!(!store.is_modified(FilterVariant::EdgeDetect, "threshold"));
    }

    #[test]
    fn test_threshold_clamping() {
        let mut store = store();
        assert_eq!(store.set(FilterVariant::EdgeDetect, "threshold", 500.0).unwrap(), 300.0);
        assert_eq!(store.get(FilterVariant::EdgeDetect, "threshold").unwrap(), 300.0);

        assert_eq!(store.set(FilterVariant::EdgeDetect, "threshold", -10.0).unwrap(), 1.0);
        assert_eq!(store.get(FilterVariant::EdgeDetect, "threshold").unwrap(), 1.0);
    }

    #[test]
    fn test_thickness_display() {
        let mut store = store();
        store.set(FilterVariant::ContourTrace, "thickness", 0.1).unwrap();
        assert_eq!(store.display_value(FilterVariant::ContourTrace, "thickness").unwrap(), "10");
    }

    #[test]
    fn test_values_survive_switching() {
        let mut store = store();
        store.set(FilterVariant::EdgeDetect, "threshold", 42.0).unwrap();
        store.set(FilterVariant::FisheyeWarp, "strength", 7.0).unwrap();
        store.set(FilterVariant::ContourTrace, "thickness", 0.12).unwrap();

        assert_eq!(store.get(FilterVariant::EdgeDetect, "threshold").unwrap(), 42.0);
        assert_eq!(store.get(FilterVariant::FisheyeWarp, "strength").unwrap(), 7.0);
    }

    #[test]
    fn test_unknown_parameter_fails_fast() {
        let mut store = store();
        let err = store.set(FilterVariant::EdgeDetect, "sigma", 1.0).unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownParameter {
                variant: FilterVariant::EdgeDetect,
                name: "sigma".to_string(),
            }
        );
        assert!(store.set(FilterVariant::Cartoonize, "threshold", 1.0).is_err());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_unregistered_variant() {
        let mut catalog = FilterCatalog::with_builtins();
        catalog.unregister(FilterVariant::FisheyeWarp);
        let store = ParameterStore::new(Arc::new(catalog));

        assert_eq!(
            store.values(FilterVariant::FisheyeWarp).unwrap_err(),
            CatalogError::UnregisteredVariant(FilterVariant::FisheyeWarp)
        );
    }

    #[test]
    fn test_values_in_declaration_order() {
        let mut store = store();
        store.set(FilterVariant::EdgeDetect, "threshold", 123.0).unwrap();

        let values = store.values(FilterVariant::EdgeDetect).unwrap();
        assert_eq!(values.iter().collect::<Vec<_>>(), vec![("threshold", 123.0)]);
        assert!(store.values(FilterVariant::None).unwrap().is_empty());
    }

    #[test]
    fn test_reset() {
        let mut store = store();
        store.set(FilterVariant::EdgeDetect, "threshold", 10.0).unwrap();
        store.set(FilterVariant::FisheyeWarp, "strength", 10.0).unwrap();
        store.reset(FilterVariant::EdgeDetect).unwrap();

        assert_eq!(store.get(FilterVariant::EdgeDetect, "threshold").unwrap(), 200.0);
        assert_eq!(store.get(FilterVariant::FisheyeWarp, "strength").unwrap(), 10.0);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut store = store();
        store.set(FilterVariant::FisheyeWarp, "strength", 99.0).unwrap();
        store.set(FilterVariant::EdgeDetect, "threshold", 11.0).unwrap();

        let snapshot = store.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"edge_detect":{"threshold":11.0},"fisheye_warp":{"strength":99.0}}"#);

        let mut restored = self::store();
        restored.restore(&snapshot).unwrap();
        assert_eq!(restored, store);
    }

    #[test]
    fn test_store_report() {
        let report = StoreReport::from_store(&store()).unwrap();
        assert_eq!(report.filters.len(), 5);
        assert_eq!(report.filters[&FilterVariant::EdgeDetect]["threshold"], 200.0);
    }

    proptest! {
        #[test]
        fn prop_get_after_set_is_clamped(x in -1.0e6f64..1.0e6) {
            let mut store = store();
            for variant in FilterVariant::ALL {
                for spec in store.catalog().spec_for(variant).unwrap().to_vec() {
                    store.set(variant, &spec.name, x).unwrap();
                    prop_assert_eq!(store.get(variant, &spec.name).unwrap(), x.clamp(spec.min, spec.max));
                }
            }
        }

        #[test]
        fn prop_out_of_range_hits_bounds(excess in 0.0001f64..1.0e6) {
            let mut store = store();
            let spec = store.catalog().parameter(FilterVariant::ContourTrace, "thickness").unwrap().clone();

            prop_assert_eq!(store.set(FilterVariant::ContourTrace, "thickness", spec.min - excess).unwrap(), spec.min);
            prop_assert_eq!(store.set(FilterVariant::ContourTrace, "thickness", spec.max + excess).unwrap(), spec.max);
        }

        #[test]
        fn prop_switching_preserves_values(a in 1.0f64..300.0, b in 0.0f64..0.15) {
            let mut store = store();
            store.set(FilterVariant::EdgeDetect, "threshold", a).unwrap();
            store.set(FilterVariant::ContourTrace, "thickness", b).unwrap();
            store.reset(FilterVariant::FisheyeWarp).unwrap();

            prop_assert_eq!(store.get(FilterVariant::EdgeDetect, "threshold").unwrap(), a);
            prop_assert_eq!(store.get(FilterVariant::ContourTrace, "thickness").unwrap(), b);
        }
    }
}
