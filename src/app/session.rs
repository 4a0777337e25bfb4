//! Interactive session: the state plus the effects it requests.

use crate::app::controls::FilterControls;
use crate::app::state::{AppState, Command, Message};
use crate::core::error::{StudioError, StudioResult};
use crate::core::types::ImageValue;
use crate::execution::backend::{ImageprocBackend, VisionBackend};
use crate::execution::engine::ApplyEngine;
use crate::execution::store::ParameterStore;
use crate::filters::catalog::FilterCatalog;
use std::path::Path;
use std::sync::Arc;

/// Drives [`AppState`] and performs loading, rendering and saving.
pub struct Session<B: VisionBackend = ImageprocBackend> {
    state: AppState,
    engine: ApplyEngine<B>,
    source: ImageValue,
    output: ImageValue,
}

impl Session<ImageprocBackend> {
    /// Session on the default backend with default parameters.
    pub fn new(catalog: Arc<FilterCatalog>) -> Self {
        Self::with_engine(ParameterStore::new(catalog), ApplyEngine::new())
    }
}

impl<B: VisionBackend> Session<B> {
    /// Session over an existing store and engine.
    pub fn with_engine(params: ParameterStore, engine: ApplyEngine<B>) -> Self {
        Self {
            state: AppState::with_store(params),
            engine,
            source: ImageValue::empty(),
            output: ImageValue::empty(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The decoded image, or the sentinel.
    pub fn source(&self) -> &ImageValue {
        &self.source
    }

    /// The last rendered image, or the sentinel.
    pub fn output(&self) -> &ImageValue {
        &self.output
    }

    /// Slider panel of the active filter.
    pub fn controls(&self) -> Option<FilterControls> {
        FilterControls::for_state(&self.state, self.state.params.catalog())
    }

    /// Handle one message and return the image to display.
    ///
    /// A rejected message leaves the session unchanged.
    pub fn dispatch(&mut self, message: Message) -> StudioResult<&ImageValue> {
        let transition = self.state.clone().update(message)?;
        self.state = transition.state;

        for command in transition.commands {
            self.execute(command)?;
        }
        Ok(&self.output)
    }

    fn execute(&mut self, command: Command) -> StudioResult<()> {
        match command {
            Command::Load(path) => {
                self.source = ImageValue::load_or_empty(&path);
                if !self.source.is_empty() {
                    let (w, h) = self.source.dimensions();
                    log::info!("Loaded {} ({}x{})", path.display(), w, h);
                }
            }
            Command::Render => self.render(),
            Command::Save(path) => self.save(&path)?,
        }
        Ok(())
    }

    fn render(&mut self) {
        if self.source.is_empty() {
            self.output = ImageValue::empty();
            return;
        }
        self.output = self
            .engine
            .apply(self.state.active_variant(), &self.state.params, &self.source);
    }

    fn save(&self, path: &Path) -> StudioResult<()> {
        if self.output.is_empty() {
            return Err(StudioError::NothingToSave);
        }
        self.output.save(path)?;
        log::info!("Saved {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::variant::FilterVariant;
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::fs;
    use std::path::PathBuf;

    fn write_sample(path: &Path) {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(32, 32, |x, y| {
            if (x as i32 - 16).pow(2) + (y as i32 - 16).pow(2) < 64 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        }));
        image.save(path).unwrap();
    }

    fn session() -> Session {
        Session::new(Arc::new(FilterCatalog::with_builtins()))
    }

    #[test]
    fn test_drop_select_save() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        write_sample(&input);

        let mut session = session();
        let shown = session.dispatch(Message::ImageDropped(vec![input.clone()])).unwrap();
        assert_eq!(shown.dimensions(), (32, 32));
        assert!(session.output().shares_pixels_with(session.source()));
        assert!(session.state().menu_visible());

        session.dispatch(Message::SelectFilter(FilterVariant::EdgeDetect)).unwrap();
        assert!(!session.output().is_empty());
        assert!(!session.output().shares_pixels_with(session.source()));
        assert!(session.controls().is_some());

        session.dispatch(Message::OpenSaveDialog).unwrap();
        session.dispatch(Message::DialogClosed(Some(output.clone()))).unwrap();
        assert_eq!(ImageValue::from_path(&output).unwrap().dimensions(), (32, 32));
    }

    #[test]
    fn test_undecodable_image_yields_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.jpg");
        fs::write(&input, b"not a jpeg").unwrap();

        let mut session = session();
        let shown = session.dispatch(Message::ImageDropped(vec![input])).unwrap();
        assert!(shown.is_empty());

        session.dispatch(Message::SelectFilter(FilterVariant::Cartoonize)).unwrap();
        assert!(session.output().is_empty());

        session.dispatch(Message::OpenSaveDialog).unwrap();
        let err = session
            .dispatch(Message::DialogClosed(Some(PathBuf::from("never.png"))))
            .unwrap_err();
        assert!(matches!(err, StudioError::NothingToSave));
    }

    #[test]
    fn test_rejected_message_keeps_state() {
        let mut session = session();
        session.dispatch(Message::SelectFilter(FilterVariant::FisheyeWarp)).unwrap();
        let before = session.state().clone();

        let result = session.dispatch(Message::AdjustParameter {
            name: "thickness".to_string(),
            value: 0.1,
        });
        assert!(result.is_err());
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_adjustment_rerenders() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        write_sample(&input);

        let mut session = session();
        session.dispatch(Message::ImageDropped(vec![input])).unwrap();
        session.dispatch(Message::SelectFilter(FilterVariant::ContourTrace)).unwrap();
        let thin = session.output().clone();

        session
            .dispatch(Message::AdjustParameter {
                name: "thickness".to_string(),
                value: 0.0,
            })
            .unwrap();
        let none = session.output().clone();

        // Zero thickness draws nothing over the source
        assert_eq!(
            none.get_image().unwrap().to_rgba8(),
            session.source().get_image().unwrap().to_rgba8()
        );
        assert_ne!(thin, none);
    }
}
