//! Application state and its transitions.
//!
//! UI events arrive as [`Message`]s. [`AppState::update`] consumes the
//! current state and returns the next one together with the side effects
//! the session has to perform. The function itself never touches the file
//! system or pixels.

use crate::core::error::StudioResult;
use crate::core::variant::FilterVariant;
use crate::execution::store::ParameterStore;
use crate::filters::catalog::FilterCatalog;
use std::path::PathBuf;
use std::sync::Arc;

/// Which file dialog, if any, is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    /// No dialog
    #[default]
    Closed,
    /// Choosing an image to load
    Load,
    /// Choosing where to save the rendered image
    Save,
}

/// Filter selection state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterState {
    /// Showing the image unchanged
    #[default]
    NoFilter,
    /// A filter other than `None` is active
    FilterSelected(FilterVariant),
}

impl FilterState {
    /// The variant the engine should run.
    pub fn variant(&self) -> FilterVariant {
        match self {
            FilterState::NoFilter => FilterVariant::None,
            FilterState::FilterSelected(variant) => *variant,
        }
    }

    fn select(variant: FilterVariant) -> Self {
        if variant.is_identity() {
            FilterState::NoFilter
        } else {
            FilterState::FilterSelected(variant)
        }
    }
}

/// Events delivered by the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// "Open File Picker" / "Load new image" pressed
    OpenLoadDialog,
    /// "Save image" pressed
    OpenSaveDialog,
    /// The open dialog finished; `None` means it was cancelled
    DialogClosed(Option<PathBuf>),
    /// Files dropped onto the window
    ImageDropped(Vec<PathBuf>),
    /// A filter menu button was pressed
    SelectFilter(FilterVariant),
    /// A slider of the active filter moved
    AdjustParameter {
        /// Parameter name
        name: String,
        /// Raw slider value, clamped on store
        value: f64,
    },
    /// Restore the active filter's defaults
    ResetParameters,
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Decode the image at this path
    Load(PathBuf),
    /// Re-run the active filter on the current image
    Render,
    /// Write the rendered image to this path
    Save(PathBuf),
}

/// The result of [`AppState::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The next state
    pub state: AppState,
    /// Effects to perform, in order
    pub commands: Vec<Command>,
}

impl Transition {
    fn unchanged(state: AppState) -> Self {
        Self {
            state,
            commands: Vec::new(),
        }
    }
}

/// Everything the UI renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Path of the image being shown
    pub image_path: Option<PathBuf>,
    /// Open dialog
    pub dialog: DialogState,
    /// Active filter
    pub filter: FilterState,
    /// Parameter values of every filter
    pub params: ParameterStore,
}

impl AppState {
    /// Initial state: no image, no dialog, no filter, default parameters.
    pub fn new(catalog: Arc<FilterCatalog>) -> Self {
        Self::with_store(ParameterStore::new(catalog))
    }

    /// Initial state over an existing (e.g. preset) store.
    pub fn with_store(params: ParameterStore) -> Self {
        Self {
            image_path: None,
            dialog: DialogState::Closed,
            filter: FilterState::NoFilter,
            params,
        }
    }

    /// The filter menu is shown once an image is loaded.
    pub fn menu_visible(&self) -> bool {
        self.image_path.is_some()
    }

    /// Sliders are shown when the active filter has parameters.
    pub fn adjusters_visible(&self) -> bool {
        match self.filter {
            FilterState::NoFilter => false,
            FilterState::FilterSelected(variant) => self
                .params
                .catalog()
                .metadata(variant)
                .map(|m| m.has_parameters())
                .unwrap_or(false),
        }
    }

    /// The variant the engine should run.
    pub fn active_variant(&self) -> FilterVariant {
        self.filter.variant()
    }

    /// Compute the next state.
    ///
    /// Only catalog mismatches fail: selecting an unregistered variant or
    /// adjusting a parameter the active filter does not have.
    pub fn update(mut self, message: Message) -> StudioResult<Transition> {
        log::trace!("update: {:?}", message);

        let commands = match message {
            Message::OpenLoadDialog => {
                self.dialog = DialogState::Load;
                Vec::new()
            }
            Message::OpenSaveDialog => {
                if self.image_path.is_none() {
                    log::debug!("Ignoring save request without an image");
                    return Ok(Transition::unchanged(self));
                }
                self.dialog = DialogState::Save;
                Vec::new()
            }
            Message::DialogClosed(choice) => {
                let dialog = std::mem::take(&mut self.dialog);
                match (dialog, choice) {
                    (DialogState::Load, Some(path)) => self.show_image(path),
                    (DialogState::Save, Some(path)) => vec![Command::Save(path)],
                    (_, None) | (DialogState::Closed, Some(_)) => Vec::new(),
                }
            }
            Message::ImageDropped(paths) => match paths.into_iter().next() {
                Some(path) => self.show_image(path),
                None => Vec::new(),
            },
            Message::SelectFilter(variant) => {
                self.params.catalog().metadata(variant)?;
                self.filter = FilterState::select(variant);
                vec![Command::Render]
            }
            Message::AdjustParameter { name, value } => match self.filter {
                FilterState::NoFilter => {
                    log::debug!("Ignoring '{}' adjustment with no filter selected", name);
                    Vec::new()
                }
                FilterState::FilterSelected(variant) => {
                    self.params.set(variant, &name, value)?;
                    vec![Command::Render]
                }
            },
            Message::ResetParameters => match self.filter {
                FilterState::NoFilter => Vec::new(),
                FilterState::FilterSelected(variant) => {
                    self.params.reset(variant)?;
                    vec![Command::Render]
                }
            },
        };

        Ok(Transition {
            state: self,
            commands,
        })
    }

    fn show_image(&mut self, path: PathBuf) -> Vec<Command> {
        self.image_path = Some(path.clone());
        vec![Command::Load(path), Command::Render]
    }
}
