//! Apply engine: runs the selected filter on an image.
//!
//! Each call is a synchronous, stateless transform of a
//! `(variant, parameters, image)` triple. Bad input never escapes as an
//! error: it becomes the empty-image sentinel so the UI can fall back to
//! its "no image" state.

use crate::core::error::{ApplyError, StudioError, StudioResult};
use crate::core::types::ImageValue;
use crate::core::variant::FilterVariant;
use crate::execution::backend::{FilterSettings, ImageprocBackend, VisionBackend};
use crate::execution::store::ParameterStore;
use std::time::Instant;

/// Applies filters through a vision backend.
#[derive(Debug, Clone, Default)]
pub struct ApplyEngine<B: VisionBackend = ImageprocBackend> {
    backend: B,
}

impl ApplyEngine<ImageprocBackend> {
    /// Create an engine on the `imageproc` backend.
    pub fn new() -> Self {
        Self::with_backend(ImageprocBackend)
    }
}

impl<B: VisionBackend> ApplyEngine<B> {
    /// Create an engine on a custom backend.
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// The backend in use.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Apply `variant` with its current parameters from `store`.
    ///
    /// Configuration errors are logged and also yield the empty sentinel;
    /// use [`ApplyEngine::try_apply`] to receive them.
    pub fn apply(&self, variant: FilterVariant, store: &ParameterStore, input: &ImageValue) -> ImageValue {
        match self.try_apply(variant, store, input) {
            Ok(output) => output,
            Err(e) => {
                log::error!("Cannot apply '{}': {}", variant, e);
                ImageValue::empty()
            }
        }
    }

    /// Apply `variant`, surfacing catalog/store mismatches as errors.
    ///
    /// Input and processing failures still come back as `Ok(empty)`.
    pub fn try_apply(
        &self,
        variant: FilterVariant,
        store: &ParameterStore,
        input: &ImageValue,
    ) -> StudioResult<ImageValue> {
        let settings = FilterSettings::resolve(variant, store).map_err(StudioError::from)?;
        Ok(self.apply_settings(settings, input))
    }

    /// Apply already resolved settings.
    pub fn apply_settings(&self, settings: FilterSettings, input: &ImageValue) -> ImageValue {
        let Some(image) = input.get_image().filter(|_| !input.is_empty()) else {
            log::warn!("Cannot filter with '{}': {}", settings.variant(), ApplyError::InvalidInput);
            return ImageValue::empty();
        };

        if settings == FilterSettings::Identity {
            return input.clone();
        }

        let started = Instant::now();
        match self.backend.run(settings, image) {
            Ok(output) => {
                log::debug!(
                    "Applied {:?} to {}x{} in {}ms",
                    settings,
                    image.width(),
                    image.height(),
                    started.elapsed().as_millis()
                );
                ImageValue::new(output)
            }
            Err(e) => {
                log::warn!("Filter '{}' failed: {}", settings.variant(), e);
                ImageValue::empty()
            }
        }
    }
}
