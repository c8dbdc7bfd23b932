//!
//! Masked input with a fixed placeholder overlay.
//!
//! The live field uses a blank placeholder and a revealing mask, so
//! it only ever shows what has been typed. The rest of the pattern is
//! shown by an overlay drawn beneath it, built from a fixed template.
//!
//! ```rust ignore
//! let mut field = FixedPlaceholderInput::new(
//!     LineSurface::new(),
//!     FixedOptions::new("(111) 111-1111", "(___) ___-____"),
//! )?;
//!
//! field.handle(&FieldEvent::KeyPress(key), Regular);
//! assert_eq!(field.overlay().as_deref(), Some("(1__) ___-____"));
//! ```
//!
//! Every committed edit is normalized. The placeholder blanks are
//! removed from the raw value and the result is fed back to the
//! engine as a fresh value.
//!

use crate::event::{HandleEvent, MaskOutcome, Regular};
use crate::field::{ChangeFn, FieldEvent, MaskedField};
use crate::input_mask::InputMask;
use crate::mask_engine::{EditEngine, MaskOptions, MaskSnapshot};
use crate::masked_input::MaskedInput;
use crate::observer::EditKind;
use crate::placeholder::{derive_overlay, normalize_value};
use crate::surface::{SurfaceError, TextSurface};
use crate::MaskError;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// Placeholder of the live field.
pub const FIXED_PLACEHOLDER: char = ' ';

/// Configuration of the fixed placeholder variant.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixedOptions {
    /// Options of the live field.
    pub mask: MaskOptions,
    /// Overlay template. Should be at least as long as the pattern.
    pub template: String,
    /// Don't show the overlay.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hide_overlay: bool,
}

impl FixedOptions {
    /// Blank placeholder and revealing mask.
    pub fn new(pattern: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            mask: MaskOptions::new(pattern)
                .placeholder_char(FIXED_PLACEHOLDER)
                .revealing_mask(true),
            template: template.into(),
            hide_overlay: false,
        }
    }

    /// Initial value.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.mask.value = value.into();
        self
    }

    /// Placeholder of the live field.
    pub fn placeholder_char(mut self, c: char) -> Self {
        self.mask.placeholder_char = Some(c);
        self
    }

    /// Hide the overlay.
    pub fn hide_overlay(mut self, hide: bool) -> Self {
        self.hide_overlay = hide;
        self
    }

    /// Other options of the live field.
    pub fn mask(mut self, mask: MaskOptions) -> Self {
        self.mask = mask;
        self
    }
}

/// Masked input with overlay.
pub struct FixedPlaceholderInput<S, E = InputMask>
where
    S: TextSurface,
    E: EditEngine,
{
    inner: MaskedInput<S, E>,
    template: String,
    hide_overlay: bool,
    // last committed value.
    val: String,
    on_change: Option<ChangeFn>,
}

impl<S, E> Debug for FixedPlaceholderInput<S, E>
where
    S: TextSurface,
    E: EditEngine,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedPlaceholderInput")
            .field("inner", &self.inner)
            .field("template", &self.template)
            .field("hide_overlay", &self.hide_overlay)
            .field("val", &self.val)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl<S> FixedPlaceholderInput<S, InputMask>
where
    S: TextSurface,
{
    /// New field with the default engine.
    pub fn new(surface: S, options: FixedOptions) -> Result<Self, MaskError> {
        let engine = InputMask::new(&options.mask)?;
        Ok(Self::with_engine(surface, engine, options))
    }
}

impl<S, E> FixedPlaceholderInput<S, E>
where
    S: TextSurface,
    E: EditEngine,
{
    /// New field with a configured engine.
    pub fn with_engine(surface: S, engine: E, options: FixedOptions) -> Self {
        let val = options.mask.value.clone();
        Self {
            inner: MaskedInput::with_engine(surface, engine, options.mask),
            template: options.template,
            hide_overlay: options.hide_overlay,
            val,
            on_change: None,
        }
    }

    /// Change notification.
    pub fn on_change(mut self, f: impl FnMut(&FieldEvent, &MaskSnapshot) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Wrapped controller.
    pub fn inner(&self) -> &MaskedInput<S, E> {
        &self.inner
    }

    /// Wrapped controller.
    ///
    /// Don't change props this way, use [set_props](Self::set_props).
    pub fn inner_mut(&mut self) -> &mut MaskedInput<S, E> {
        &mut self.inner
    }

    /// Overlay template.
    pub fn template(&self) -> &str {
        self.template.as_str()
    }

    /// Change the overlay template.
    pub fn set_template(&mut self, template: impl Into<String>) {
        self.template = template.into();
    }

    /// Overlay hidden.
    pub fn is_overlay_hidden(&self) -> bool {
        self.hide_overlay
    }

    /// Overlay hidden.
    pub fn set_overlay_hidden(&mut self, hide: bool) {
        self.hide_overlay = hide;
    }

    /// Last committed value.
    pub fn committed(&self) -> &str {
        self.val.as_str()
    }

    /// Overlay text. The committed value followed by the template.
    ///
    /// None if the overlay is hidden.
    pub fn overlay(&self) -> Option<String> {
        if self.hide_overlay {
            None
        } else {
            Some(derive_overlay(&self.val, &self.template))
        }
    }

    /// Owner supplied new props.
    ///
    /// An empty value keeps the committed value.
    pub fn set_props(&mut self, pattern: &str, value: &str) -> Result<(), MaskError> {
        if !value.is_empty() {
            self.val = value.to_string();
        }
        let val = self.val.clone();
        self.inner.set_props(pattern, &val)
    }

    /// Focus the surface.
    pub fn focus(&mut self) -> Result<(), SurfaceError> {
        self.inner.focus()
    }

    /// Unfocus the surface.
    pub fn blur(&mut self) {
        self.inner.blur()
    }

    /// Run the deferred caret restoration.
    pub fn flush_deferred(&mut self) -> usize {
        self.inner.flush_deferred()
    }

    /// Normalize after a committed edit.
    ///
    /// The owner is notified with the event the inner controller
    /// committed.
    fn commit(&mut self, r: MaskOutcome) -> MaskOutcome {
        let Some(event) = self.inner.take_committed_event() else {
            return r;
        };
        if r != MaskOutcome::TextChanged {
            return r;
        }

        let engine = self.inner.engine_mut();
        let raw = normalize_value(&engine.raw_value(), engine.placeholder_char());
        engine.set_value(&raw);
        self.val = engine.value();
        self.inner.observe(&EditKind::Normalize, true);

        let pattern = self.inner.pattern().to_string();
        let val = self.val.clone();
        // same pattern never fails.
        _ = self.inner.set_props(&pattern, &val);

        let snapshot = MaskSnapshot {
            value: self.val.clone(),
            ..self.inner.engine().snapshot()
        };
        if let Some(on_change) = &mut self.on_change {
            on_change(&event, &snapshot);
        }
        r
    }
}

impl<S, E> HandleEvent<FieldEvent, Regular, MaskOutcome> for FixedPlaceholderInput<S, E>
where
    S: TextSurface,
    E: EditEngine,
{
    fn handle(&mut self, event: &FieldEvent, qualifier: Regular) -> MaskOutcome {
        self.inner.take_committed_event();
        let r = self.inner.handle(event, qualifier);
        self.commit(r)
    }
}

impl<S, E> HandleEvent<crossterm::event::Event, Regular, MaskOutcome>
    for FixedPlaceholderInput<S, E>
where
    S: TextSurface,
    E: EditEngine,
{
    fn handle(&mut self, event: &crossterm::event::Event, qualifier: Regular) -> MaskOutcome {
        self.inner.take_committed_event();
        let r = self.inner.handle(event, qualifier);
        self.commit(r)
    }
}

impl<S, E> MaskedField for FixedPlaceholderInput<S, E>
where
    S: TextSurface,
    E: EditEngine,
{
    fn value(&self) -> String {
        self.inner.display_value()
    }

    fn snapshot(&self) -> MaskSnapshot {
        self.inner.engine().snapshot()
    }

    fn set_props(&mut self, pattern: &str, value: &str) -> Result<(), MaskError> {
        FixedPlaceholderInput::set_props(self, pattern, value)
    }

    fn set_on_change(&mut self, on_change: Option<ChangeFn>) {
        self.on_change = on_change;
    }

    fn focus(&mut self) -> Result<(), SurfaceError> {
        FixedPlaceholderInput::focus(self)
    }

    fn blur(&mut self) {
        FixedPlaceholderInput::blur(self)
    }

    fn flush_deferred(&mut self) -> usize {
        FixedPlaceholderInput::flush_deferred(self)
    }
}
