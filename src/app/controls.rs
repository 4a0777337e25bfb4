//! Slider models for the active filter's parameters.

use crate::app::state::{AppState, FilterState};
use crate::core::parameter::{ParameterSpec, UiHint};
use crate::core::variant::FilterVariant;
use crate::filters::catalog::FilterCatalog;
use serde::{Deserialize, Serialize};

/// Everything a UI needs to draw one parameter slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderModel {
    /// Parameter name, sent back in `AdjustParameter`
    pub name: String,
    /// Label shown next to the slider
    pub label: String,
    /// Slider minimum
    pub min: f64,
    /// Slider maximum
    pub max: f64,
    /// Current stored value
    pub value: f64,
    /// Value as the user reads it
    pub display: String,
    /// Discrete steps, 0 for continuous
    pub steps: u32,
}

impl SliderModel {
    fn new(spec: &ParameterSpec, value: f64) -> Self {
        let UiHint::Slider { steps } = spec.ui_hint;
        Self {
            name: spec.name.clone(),
            label: spec.display_name.clone(),
            min: spec.min,
            max: spec.max,
            value,
            display: spec.format_value(value),
            steps,
        }
    }

    /// Position of the value within the range, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            0.0
        } else {
            ((self.value - self.min) / span).clamp(0.0, 1.0)
        }
    }
}

/// The adjuster panel of the active filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterControls {
    /// Filter the sliders belong to
    pub variant: FilterVariant,
    /// One slider per parameter, in declaration order
    pub sliders: Vec<SliderModel>,
}

impl FilterControls {
    /// Build the panel, or `None` when adjusters are hidden.
    pub fn for_state(state: &AppState, catalog: &FilterCatalog) -> Option<Self> {
        let FilterState::FilterSelected(variant) = state.filter else {
            return None;
        };
        let metadata = catalog.metadata(variant).ok()?;
        if !metadata.has_parameters() {
            return None;
        }

        let sliders = metadata
            .parameters
            .iter()
            .map(|spec| {
                let value = state.params.get(variant, &spec.name).unwrap_or(spec.default);
                SliderModel::new(spec, value)
            })
            .collect();

        Some(Self { variant, sliders })
    }

    /// Look up a slider by parameter name.
    pub fn slider(&self, name: &str) -> Option<&SliderModel> {
        self.sliders.iter().find(|s| s.name == name)
    }
}
