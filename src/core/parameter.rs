//! Parameter specifications for filter knobs.
//!
//! A spec declares the valid range and default of one numeric parameter.
//! Specs are fixed once registered; only the values held by the
//! parameter store change at runtime.

use crate::core::error::CatalogError;
use crate::core::variant::FilterVariant;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How a stored value is presented to the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DisplayScale {
    /// Shown as stored, with one decimal place
    Raw,
    /// Stored as a fraction, shown as a rounded integer percentage
    Percent,
}

/// UI hints for parameter display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "widget", content = "options")]
pub enum UiHint {
    /// Slider between min and max
    Slider {
        /// Number of discrete steps between min and max (0 = continuous)
        steps: u32,
    },
}

/// Definition of a filter parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterSpec {
    /// Unique name within the filter
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// Smallest accepted value
    pub min: f64,
    /// Largest accepted value
    pub max: f64,
    /// Value used until the user adjusts the parameter
    pub default: f64,
    /// Description for documentation and tooltips
    pub description: String,
    /// How the value is presented
    pub display: DisplayScale,
    /// UI widget hint
    pub ui_hint: UiHint,
}

// ============================================================================
// ParameterSpec Builder Pattern
// ============================================================================

impl ParameterSpec {
    /// Create a new parameter spec with a default value and a degenerate
    /// range around it. Use [`ParameterSpec::with_range`] to widen it.
    pub fn new(name: impl Into<String>, default: f64) -> Self {
        let name = name.into();
        Self {
            display_name: name_to_display(&name),
            name,
            min: default,
            max: default,
            default,
            description: String::new(),
            display: DisplayScale::Raw,
            ui_hint: UiHint::Slider { steps: 0 },
        }
    }

    /// Set the valid range.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Present the value as a percentage of its fraction.
    pub fn as_percent(mut self) -> Self {
        self.display = DisplayScale::Percent;
        self
    }

    /// Set the UI hint.
    pub fn with_ui_hint(mut self, ui_hint: UiHint) -> Self {
        self.ui_hint = ui_hint;
        self
    }

    /// Check the `min <= default <= max` invariant.
    pub fn validate(&self, variant: FilterVariant) -> Result<(), CatalogError> {
        let ordered = self.min <= self.default && self.default <= self.max;
        if !ordered || !self.min.is_finite() || !self.max.is_finite() {
            return Err(CatalogError::InvalidSpec {
                variant,
                name: self.name.clone(),
                min: self.min,
                max: self.max,
                default: self.default,
            });
        }
        Ok(())
    }

    /// Clamp a value into `[min, max]`. NaN falls back to the default.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Check whether a value is within range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Format a value the way the UI shows it.
    pub fn format_value(&self, value: f64) -> String {
        match self.display {
            DisplayScale::Raw => format!("{:.1}", value),
            DisplayScale::Percent => format!("{}", (value * 100.0).round() as i64),
        }
    }
}

/// Convert snake_case name to Title Case display name.
fn name_to_display(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolved parameter values of one filter, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterValues {
    variant: FilterVariant,
    values: IndexMap<String, f64>,
}

impl ParameterValues {
    /// Create an empty set for a variant.
    pub fn new(variant: FilterVariant) -> Self {
        Self {
            variant,
            values: IndexMap::new(),
        }
    }

    /// Add a resolved value.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// The variant these values belong to.
    pub fn variant(&self) -> FilterVariant {
        self.variant
    }

    /// Get a value by name.
    pub fn get(&self, name: &str) -> Result<f64, CatalogError> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::UnknownParameter {
                variant: self.variant,
                name: name.to_string(),
            })
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the filter has no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
