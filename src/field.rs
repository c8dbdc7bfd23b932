//!
//! Host events and the interface shared by both field variants.
//!

use crate::event::{HandleEvent, MaskOutcome, Regular};
use crate::mask_engine::MaskSnapshot;
use crate::surface::SurfaceError;
use crate::MaskError;
use crossterm::event::KeyEvent;

/// Events the host surface reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// The surface has already changed its string.
    Change,
    /// Raw key, before any default handling.
    KeyDown(KeyEvent),
    /// Character key.
    KeyPress(KeyEvent),
    /// Text about to be inserted, for hosts where the character key
    /// event is unreliable.
    BeforeInput(String),
    /// Clipboard text.
    Paste(String),
}

/// Which event carries the typed characters.
///
/// Decided once by the host integration when the field is created.
/// Events of the other kind are not consumed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CharInputSource {
    #[default]
    KeyPress,
    BeforeInput,
}

/// Change notification for the owner.
pub type ChangeFn = Box<dyn FnMut(&FieldEvent, &MaskSnapshot)>;

/// Shared interface of the plain and the fixed placeholder field.
pub trait MaskedField: HandleEvent<FieldEvent, Regular, MaskOutcome> {
    /// Value as displayed. The empty value is `""`.
    fn value(&self) -> String;

    /// Copy of the engine state.
    fn snapshot(&self) -> MaskSnapshot;

    /// Owner supplied pattern and value.
    fn set_props(&mut self, pattern: &str, value: &str) -> Result<(), MaskError>;

    /// Set the change notification.
    fn set_on_change(&mut self, on_change: Option<ChangeFn>);

    /// Focus the surface.
    fn focus(&mut self) -> Result<(), SurfaceError>;

    /// Unfocus the surface.
    fn blur(&mut self);

    /// Run deferred caret restoration. Returns the number of tasks run.
    fn flush_deferred(&mut self) -> usize;
}
