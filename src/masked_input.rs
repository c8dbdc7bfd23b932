//!
//! Masked input controller.
//!
//! Keeps a [TextSurface] and an [EditEngine] in sync.
//!
//! * Every edit captures the surface selection into the engine
//!   immediately before the engine is called.
//! * The caret is always restored from the engine's selection,
//!   never from what the surface reports after the event.
//! * Rejected edits change nothing and don't notify the owner,
//!   but the event is still consumed.
//!
//! ```rust ignore
//! let mut field = MaskedInput::new(
//!     LineSurface::new(),
//!     MaskOptions::new("11/11/1111"),
//! )?
//! .on_change(|_event, snapshot| println!("{}", snapshot.value));
//!
//! // from the event-loop
//! match field.handle(&event, Regular) {
//!     MaskOutcome::Continue => { /* not ours */ }
//!     _ => { /* repaint */ }
//! }
//! field.flush_deferred();
//! ```
//!
//! Event handling for crossterm events is included. A key press is
//! run as key-down, then as character input, and if both don't want
//! it the surface's default action is applied.
//!

use crate::deferred::{DeferredQueue, DeferredTask};
use crate::event::{flow, HandleEvent, MaskOutcome, Regular};
use crate::field::{ChangeFn, CharInputSource, FieldEvent, MaskedField};
use crate::input_mask::InputMask;
use crate::mask_engine::{EditEngine, MaskOptions, MaskSnapshot};
use crate::observer::{EditKind, EditObserver};
use crate::selection::{read_selection, write_selection};
use crate::surface::{DefaultAction, SurfaceAttrs, SurfaceError, TextSurface};
use crate::{MaskError, SelectionRange};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::fmt::{Debug, Formatter};

/// Controller for a masked single-line field.
pub struct MaskedInput<S, E = InputMask>
where
    S: TextSurface,
    E: EditEngine,
{
    surface: S,
    engine: E,

    // last props given by the owner.
    pattern: String,
    value: String,
    size: Option<usize>,
    placeholder: Option<String>,

    char_input: CharInputSource,
    on_change: Option<ChangeFn>,
    observer: Option<Box<dyn EditObserver>>,
    deferred: DeferredQueue,
    // the event of the last commit.
    committed_event: Option<FieldEvent>,
    log: bool,
}

impl<S, E> Debug for MaskedInput<S, E>
where
    S: TextSurface,
    E: EditEngine,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaskedInput")
            .field("surface", &self.surface)
            .field("engine", &self.engine)
            .field("pattern", &self.pattern)
            .field("value", &self.value)
            .field("char_input", &self.char_input)
            .field("on_change", &self.on_change.is_some())
            .field("observer", &self.observer)
            .field("deferred", &self.deferred)
            .field("log", &self.log)
            .finish()
    }
}

impl<S> MaskedInput<S, InputMask>
where
    S: TextSurface,
{
    /// New field with the default engine.
    pub fn new(surface: S, options: MaskOptions) -> Result<Self, MaskError> {
        let engine = InputMask::new(&options)?;
        Ok(Self::with_engine(surface, engine, options))
    }
}

impl<S, E> MaskedInput<S, E>
where
    S: TextSurface,
    E: EditEngine,
{
    /// New field with a configured engine.
    ///
    /// The engine must already be set up with the pattern and value
    /// of the options. The surface is initialized with the display
    /// value and attributes.
    pub fn with_engine(surface: S, engine: E, options: MaskOptions) -> Self {
        let mut s = Self {
            surface,
            engine,
            pattern: options.pattern,
            value: options.value,
            size: options.size,
            placeholder: options.placeholder,
            char_input: Default::default(),
            on_change: None,
            observer: None,
            deferred: Default::default(),
            committed_event: None,
            log: false,
        };
        s.apply_attrs();
        let value = s.display_value();
        s.surface.set_value(&value);
        s
    }

    /// Which event carries typed characters.
    pub fn char_input(mut self, source: CharInputSource) -> Self {
        self.char_input = source;
        self
    }

    /// Change notification.
    pub fn on_change(mut self, f: impl FnMut(&FieldEvent, &MaskSnapshot) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Diagnostics.
    pub fn observer(mut self, observer: impl EditObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Log event handling.
    pub fn log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// Log event handling.
    pub fn set_log(&mut self, log: bool) {
        self.log = log;
    }

    /// Which event carries typed characters.
    pub fn char_input_source(&self) -> CharInputSource {
        self.char_input
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Pattern as last given by the owner.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Value as last given by the owner.
    pub fn value_prop(&self) -> &str {
        self.value.as_str()
    }

    /// Deferred tasks waiting.
    pub fn deferred(&self) -> &DeferredQueue {
        &self.deferred
    }

    /// Formatted value, or `""` if the engine is empty.
    pub fn display_value(&self) -> String {
        if self.engine.is_empty() {
            String::new()
        } else {
            self.engine.value()
        }
    }

    /// Owner supplied new props.
    ///
    /// Compares with the props given last time.
    ///
    /// * Both changed: if the engine is still empty the new value is
    ///   used with the new pattern, otherwise the engine's raw value is
    ///   kept. A value arriving together with a pattern may be older
    ///   than an edit that is still in flight.
    /// * Pattern changed: the raw value and the surface selection are
    ///   carried over.
    /// * Value changed: the engine gets the new value.
    ///
    /// The caret is synced afterwards if the pattern changed and the
    /// selection doesn't start at 0, or if the value changed.
    pub fn set_props(&mut self, pattern: &str, value: &str) -> Result<(), MaskError> {
        let pattern_changed = self.pattern != pattern;
        let value_changed = self.value != value;

        if pattern_changed {
            let selection = read_selection(&mut self.surface);
            let carry = if value_changed && self.engine.is_empty() {
                mask_debug!(self.log, "new pattern {:?} with new value {:?}", pattern, value);
                value.to_string()
            } else {
                mask_debug!(self.log, "new pattern {:?} keeps value", pattern);
                self.engine.raw_value()
            };
            self.engine.set_pattern(pattern, Some(&carry), selection)?;
            self.pattern = pattern.to_string();
            self.apply_attrs();
            self.observe(&EditKind::Pattern(pattern.to_string()), true);
        } else if value_changed {
            mask_debug!(self.log, "new value {:?}", value);
            self.engine.set_value(value);
            self.observe(&EditKind::Value, true);
        }
        self.value = value.to_string();

        if pattern_changed || value_changed {
            let display = self.display_value();
            self.surface.set_value(&display);
        }
        if (pattern_changed && self.engine.selection().start != 0) || value_changed {
            self.restore_selection();
        }
        Ok(())
    }

    /// Owner supplied a new pattern, the value prop is unchanged.
    pub fn set_pattern(&mut self, pattern: &str) -> Result<(), MaskError> {
        let value = self.value.clone();
        self.set_props(pattern, &value)
    }

    /// Owner supplied a new value, the pattern is unchanged.
    pub fn set_value(&mut self, value: &str) {
        let pattern = self.pattern.clone();
        // same pattern never fails.
        _ = self.set_props(&pattern, value);
    }

    /// Focus the surface.
    pub fn focus(&mut self) -> Result<(), SurfaceError> {
        self.surface.focus()
    }

    /// Unfocus the surface.
    pub fn blur(&mut self) {
        self.surface.blur()
    }

    /// Run the deferred caret restoration.
    pub fn flush_deferred(&mut self) -> usize {
        self.deferred.flush(&mut self.surface)
    }

    fn apply_attrs(&mut self) {
        let len = self.engine.pattern_len();
        let attrs = SurfaceAttrs::new(
            len,
            self.size.unwrap_or(len),
            self.placeholder
                .clone()
                .unwrap_or_else(|| self.engine.empty_value().to_string()),
        );
        self.surface.set_attrs(&attrs);
    }

    /// Surface selection -> engine.
    fn capture_selection(&mut self) {
        if let Some(selection) = read_selection(&mut self.surface) {
            self.engine.set_selection(selection);
        }
    }

    /// Engine selection -> surface.
    fn restore_selection(&mut self) {
        write_selection(&mut self.surface, self.engine.selection());
    }

    pub(crate) fn observe(&mut self, kind: &EditKind, accepted: bool) {
        mask_debug!(
            self.log,
            "{:?} {} -> {:?} {:?}",
            kind,
            accepted,
            self.engine.value(),
            self.engine.selection()
        );
        if let Some(observer) = &mut self.observer {
            let snapshot = self.engine.snapshot();
            observer.observe(kind, accepted, &snapshot);
        }
    }

    /// The event that committed the last edit.
    ///
    /// For crossterm events this is the field event that was
    /// actually dispatched.
    pub fn committed_event(&self) -> Option<&FieldEvent> {
        self.committed_event.as_ref()
    }

    pub(crate) fn take_committed_event(&mut self) -> Option<FieldEvent> {
        self.committed_event.take()
    }

    /// Normalize the engine value and notify the owner.
    fn commit(&mut self, event: &FieldEvent) -> MaskOutcome {
        let value = self.engine.value();
        self.engine.set_value(&value);
        self.committed_event = Some(event.clone());
        if let Some(on_change) = &mut self.on_change {
            let snapshot = self.engine.snapshot();
            on_change(event, &snapshot);
        }
        MaskOutcome::TextChanged
    }

    /// The surface changed its string on its own.
    pub fn on_surface_change(&mut self, event: &FieldEvent) -> MaskOutcome {
        let surface_value = self.surface.value();
        let mask_value = self.engine.value();

        if surface_value != mask_value {
            let surface_len = surface_value.chars().count();
            let mask_len = mask_value.chars().count();
            // cut, delete, os-level replace ...
            if surface_len < mask_len {
                let diff = mask_len - surface_len;
                self.capture_selection();
                let start = self.engine.selection().start;
                self.engine
                    .set_selection(SelectionRange::new(start, start + diff));
                let r = self.engine.backspace();
                self.observe(&EditKind::SurfaceDelete(diff), r);
            }

            let value = self.display_value();
            self.surface.set_value(&value);
            if !value.is_empty() {
                self.restore_selection();
            }
        }

        self.commit(event)
    }

    /// Undo, redo and backspace.
    pub fn on_key_down(&mut self, event: &FieldEvent, key: &KeyEvent) -> MaskOutcome {
        if key.kind == KeyEventKind::Release {
            return MaskOutcome::Continue;
        }

        if is_undo(key) {
            let r = self.engine.undo();
            self.observe(&EditKind::Undo, r);
            if r {
                self.refresh(true);
                return self.commit(event);
            }
            MaskOutcome::Unchanged
        } else if is_redo(key) {
            let r = self.engine.redo();
            self.observe(&EditKind::Redo, r);
            if r {
                self.refresh(true);
                return self.commit(event);
            }
            MaskOutcome::Unchanged
        } else if key.code == KeyCode::Backspace {
            self.capture_selection();
            let r = self.engine.backspace();
            self.observe(&EditKind::Backspace, r);
            if r {
                self.refresh(false);
                return self.commit(event);
            }
            MaskOutcome::Unchanged
        } else {
            MaskOutcome::Continue
        }
    }

    /// Typed character.
    ///
    /// Modified keys and Enter are left to the host.
    pub fn on_key_press(&mut self, event: &FieldEvent, key: &KeyEvent) -> MaskOutcome {
        if key.kind == KeyEventKind::Release || has_command_modifier(key.modifiers) {
            return MaskOutcome::Continue;
        }
        match key.code {
            KeyCode::Char(c) => self.input(event, c),
            _ => MaskOutcome::Continue,
        }
    }

    /// Text about to be inserted.
    ///
    /// A single char is input, longer text is entered like a paste
    /// but without deferring the caret.
    pub fn on_before_input(&mut self, event: &FieldEvent, data: &str) -> MaskOutcome {
        let mut chars = data.chars();
        match (chars.next(), chars.next()) {
            (None, _) => MaskOutcome::Continue,
            (Some('\n' | '\r'), None) => MaskOutcome::Continue,
            (Some(c), None) => self.input(event, c),
            (Some(_), Some(_)) => {
                self.capture_selection();
                let r = self.engine.paste(data);
                self.observe(&EditKind::Paste, r);
                if r {
                    let value = self.engine.value();
                    self.surface.set_value(&value);
                    self.restore_selection();
                    return self.commit(event);
                }
                MaskOutcome::Unchanged
            }
        }
    }

    /// Clipboard paste. Always consumed.
    ///
    /// The caret is restored by a deferred task.
    pub fn on_paste(&mut self, event: &FieldEvent, text: &str) -> MaskOutcome {
        self.capture_selection();
        let r = self.engine.paste(text);
        self.observe(&EditKind::Paste, r);
        if r {
            let value = self.engine.value();
            self.surface.set_value(&value);
            self.deferred
                .push(DeferredTask::RestoreSelection(self.engine.selection()));
            return self.commit(event);
        }
        MaskOutcome::Unchanged
    }

    fn input(&mut self, event: &FieldEvent, c: char) -> MaskOutcome {
        self.capture_selection();
        let r = self.engine.input(c);
        self.observe(&EditKind::Input(c), r);
        if r {
            let value = self.engine.value();
            self.surface.set_value(&value);
            self.restore_selection();
            return self.commit(event);
        }
        MaskOutcome::Unchanged
    }

    /// Display value -> surface, then the caret.
    fn refresh(&mut self, always_caret: bool) {
        let value = self.display_value();
        self.surface.set_value(&value);
        if always_caret || !value.is_empty() {
            self.restore_selection();
        }
    }
}

fn has_command_modifier(modifiers: KeyModifiers) -> bool {
    modifiers.intersects(
        KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER | KeyModifiers::META,
    )
}

/// ctrl/cmd + char, with the state of shift.
fn command_char(key: &KeyEvent) -> Option<(char, bool)> {
    if !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::META)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => {
            let shift = key.modifiers.contains(KeyModifiers::SHIFT) || c.is_ascii_uppercase();
            Some((c.to_ascii_lowercase(), shift))
        }
        _ => None,
    }
}

/// ctrl/cmd+Z or ctrl/cmd+Shift+Y
fn is_undo(key: &KeyEvent) -> bool {
    matches!(command_char(key), Some(('z', false)) | Some(('y', true)))
}

/// ctrl/cmd+Shift+Z or ctrl/cmd+Y
fn is_redo(key: &KeyEvent) -> bool {
    matches!(command_char(key), Some(('z', true)) | Some(('y', false)))
}

impl<S, E> HandleEvent<FieldEvent, Regular, MaskOutcome> for MaskedInput<S, E>
where
    S: TextSurface,
    E: EditEngine,
{
    fn handle(&mut self, event: &FieldEvent, _qualifier: Regular) -> MaskOutcome {
        // anything deferred from the last event runs first.
        self.flush_deferred();

        let r = match event {
            FieldEvent::Change => self.on_surface_change(event),
            FieldEvent::KeyDown(key) => self.on_key_down(event, key),
            FieldEvent::KeyPress(key) => match self.char_input {
                CharInputSource::KeyPress => self.on_key_press(event, key),
                CharInputSource::BeforeInput => MaskOutcome::Continue,
            },
            FieldEvent::BeforeInput(data) => match self.char_input {
                CharInputSource::BeforeInput => self.on_before_input(event, data),
                CharInputSource::KeyPress => MaskOutcome::Continue,
            },
            FieldEvent::Paste(text) => self.on_paste(event, text),
        };
        mask_debug!(self.log, "handle {:?} -> {:?}", event, r);
        r
    }
}

impl<S, E> HandleEvent<crossterm::event::Event, Regular, MaskOutcome> for MaskedInput<S, E>
where
    S: TextSurface,
    E: EditEngine,
{
    fn handle(&mut self, event: &crossterm::event::Event, _qualifier: Regular) -> MaskOutcome {
        match event {
            crossterm::event::Event::Key(key) if key.kind != KeyEventKind::Release => {
                flow!(self.handle(&FieldEvent::KeyDown(*key), Regular));
                flow!(match self.char_input {
                    CharInputSource::KeyPress => self.handle(&FieldEvent::KeyPress(*key), Regular),
                    CharInputSource::BeforeInput => match key.code {
                        KeyCode::Char(c) if !has_command_modifier(key.modifiers) => {
                            self.handle(&FieldEvent::BeforeInput(c.to_string()), Regular)
                        }
                        _ => MaskOutcome::Continue,
                    },
                });
                match self.surface.default_action(key) {
                    DefaultAction::None => MaskOutcome::Continue,
                    DefaultAction::Moved => MaskOutcome::Changed,
                    DefaultAction::Edited => self.handle(&FieldEvent::Change, Regular),
                }
            }
            crossterm::event::Event::Paste(text) => {
                self.handle(&FieldEvent::Paste(text.clone()), Regular)
            }
            _ => MaskOutcome::Continue,
        }
    }
}

impl<S, E> MaskedField for MaskedInput<S, E>
where
    S: TextSurface,
    E: EditEngine,
{
    fn value(&self) -> String {
        self.display_value()
    }

    fn snapshot(&self) -> MaskSnapshot {
        self.engine.snapshot()
    }

    fn set_props(&mut self, pattern: &str, value: &str) -> Result<(), MaskError> {
        MaskedInput::set_props(self, pattern, value)
    }

    fn set_on_change(&mut self, on_change: Option<ChangeFn>) {
        self.on_change = on_change;
    }

    fn focus(&mut self) -> Result<(), SurfaceError> {
        MaskedInput::focus(self)
    }

    fn blur(&mut self) {
        MaskedInput::blur(self)
    }

    fn flush_deferred(&mut self) -> usize {
        MaskedInput::flush_deferred(self)
    }
}
