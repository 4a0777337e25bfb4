//! Interactive application layer.
//!
//! Holds the state a front end renders from, the messages it sends, and a
//! [`Session`] that turns messages into loaded, filtered and saved images.

pub mod controls;
pub mod session;
pub mod state;

pub use controls::{FilterControls, SliderModel};
pub use session::Session;
pub use state::{AppState, Command, DialogState, FilterState, Message, Transition};
