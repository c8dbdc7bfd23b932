//!
//! The text-input surface.
//!
//! A surface is whatever shows the field to the user and reports
//! back a flat string and a selection. It may edit its own string
//! (delete, cut, os-level replace), the controller picks that up
//! with a [FieldEvent::Change](crate::FieldEvent::Change).
//!
//! There are two ways to access the selection:
//!
//! * Native offsets via [TextSurface::native_selection] and
//!   [TextSurface::set_native_selection].
//! * Legacy range objects via [TextSurface::create_text_range] and
//!   [TextSurface::active_range]. These only know about bookmarks
//!   and relative moves, the offsets must be measured.
//!
//! [LineSurface] is an in-memory single-line surface with native
//! offsets. It is used for terminal frontends.
//!

use crate::_private::NonExhaustive;
use crate::SelectionRange;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use dyn_clone::DynClone;
use log::debug;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Failure of the selection api.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    /// The surface can't take the focus.
    NotFocusable,
    /// The surface is not visible.
    NotVisible,
    /// The surface doesn't support this api.
    Unsupported,
}

impl Display for SurfaceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for SurfaceError {}

/// Opaque position token of a legacy range.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Bookmark(pub String);

/// Which end points [TextRangeObject::set_end_point] connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndPoint {
    StartToStart,
    StartToEnd,
    EndToStart,
    EndToEnd,
}

/// Range object of a legacy surface.
///
/// Positions are never exposed, only the covered text, bookmarks
/// and relative moves.
pub trait TextRangeObject: DynClone + Debug {
    /// Text covered by the range.
    fn text(&self) -> String;

    /// Position token of this range.
    fn bookmark(&self) -> Bookmark;

    /// Move this range to the bookmarked position.
    fn move_to_bookmark(&mut self, bookmark: &Bookmark) -> Result<(), SurfaceError>;

    /// Set one end point of this range to one end point of the other.
    fn set_end_point(&mut self, how: EndPoint, other: &dyn TextRangeObject);

    /// Collapse to the start or to the end.
    fn collapse(&mut self, to_start: bool);

    /// Move the start by a number of chars.
    fn move_start(&mut self, chars: isize);

    /// Move the end by a number of chars.
    fn move_end(&mut self, chars: isize);

    /// Make this range the active selection of the surface.
    fn select(&mut self) -> Result<(), SurfaceError>;
}

impl Clone for Box<dyn TextRangeObject> {
    fn clone(&self) -> Self {
        dyn_clone::clone_box(self.as_ref())
    }
}

/// Attributes the controller sets on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceAttrs {
    /// Maximum number of chars the user can enter.
    pub max_length: usize,
    /// Display width in chars.
    pub size: usize,
    /// Text shown while the value is empty.
    pub placeholder: String,

    pub non_exhaustive: NonExhaustive,
}

impl SurfaceAttrs {
    pub(crate) fn new(max_length: usize, size: usize, placeholder: String) -> Self {
        Self {
            max_length,
            size,
            placeholder,
            non_exhaustive: NonExhaustive,
        }
    }
}

/// What the surface did on its own for an event the controller
/// didn't intercept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAction {
    /// Nothing.
    None,
    /// The selection changed.
    Moved,
    /// The string changed.
    Edited,
}

/// Text-input surface.
pub trait TextSurface: Debug {
    /// Current string.
    fn value(&self) -> String;

    /// Replace the string. Doesn't touch the selection api.
    fn set_value(&mut self, value: &str);

    /// Take the focus.
    fn focus(&mut self) -> Result<(), SurfaceError>;

    /// Give up the focus.
    fn blur(&mut self);

    /// Native selection offsets.
    /// None if the surface has no native range api.
    fn native_selection(&self) -> Option<SelectionRange>;

    /// Set the native selection.
    fn set_native_selection(&mut self, _selection: SelectionRange) -> Result<(), SurfaceError> {
        Err(SurfaceError::Unsupported)
    }

    /// Legacy range covering the whole string.
    fn create_text_range(&mut self) -> Result<Box<dyn TextRangeObject>, SurfaceError> {
        Err(SurfaceError::Unsupported)
    }

    /// Legacy range of the active selection.
    fn active_range(&self) -> Result<Box<dyn TextRangeObject>, SurfaceError> {
        Err(SurfaceError::Unsupported)
    }

    /// Apply display attributes.
    fn set_attrs(&mut self, _attrs: &SurfaceAttrs) {}

    /// Default behaviour for a key the controller didn't intercept.
    fn default_action(&mut self, _key: &KeyEvent) -> DefaultAction {
        DefaultAction::None
    }
}

/// In-memory single-line surface.
#[derive(Debug, Clone)]
pub struct LineSurface {
    value: Vec<char>,
    anchor: usize,
    cursor: usize,
    focused: bool,
    visible: bool,
    attrs: Option<SurfaceAttrs>,
    cut: String,
}

impl Default for LineSurface {
    fn default() -> Self {
        Self {
            value: Default::default(),
            anchor: 0,
            cursor: 0,
            focused: false,
            visible: true,
            attrs: None,
            cut: Default::default(),
        }
    }
}

impl LineSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Has the focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Invisible surfaces can't take the focus.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.focused = false;
        }
    }

    /// Attributes set by the controller.
    pub fn attrs(&self) -> Option<&SurfaceAttrs> {
        self.attrs.as_ref()
    }

    /// Cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Selection as the user made it.
    pub fn selection(&self) -> SelectionRange {
        SelectionRange::new(self.anchor, self.cursor)
    }

    /// Text removed by the last cut.
    pub fn last_cut(&self) -> &str {
        self.cut.as_str()
    }

    /// Text for display. The placeholder is shown for an empty value.
    pub fn display_text(&self) -> String {
        if self.value.is_empty() {
            if let Some(attrs) = &self.attrs {
                return attrs.placeholder.clone();
            }
        }
        self.value.iter().collect()
    }

    /// Edit the string as a host would, e.g. for os-level text replacement.
    /// The caret is placed after the replaced text.
    pub fn replace_range(&mut self, range: SelectionRange, text: &str) {
        let range = range.clamp(self.value.len());
        let text = text.chars().collect::<Vec<_>>();
        let n = text.len();
        self.value.splice(range.start..range.end, text);
        self.anchor = range.start + n;
        self.cursor = range.start + n;
    }

    fn move_to(&mut self, pos: usize, extend: bool) -> DefaultAction {
        let pos = pos.min(self.value.len());
        let (anchor, cursor) = (self.anchor, self.cursor);
        self.cursor = pos;
        if !extend {
            self.anchor = pos;
        }
        if (anchor, cursor) != (self.anchor, self.cursor) {
            DefaultAction::Moved
        } else {
            DefaultAction::None
        }
    }

    fn remove_selection(&mut self) -> Option<String> {
        let sel = self.selection().clamp(self.value.len());
        if sel.is_empty() {
            return None;
        }
        let removed = self.value.drain(sel.start..sel.end).collect::<String>();
        self.anchor = sel.start;
        self.cursor = sel.start;
        Some(removed)
    }
}

impl TextSurface for LineSurface {
    fn value(&self) -> String {
        self.value.iter().collect()
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.chars().collect();
        self.anchor = self.anchor.min(self.value.len());
        self.cursor = self.cursor.min(self.value.len());
    }

    fn focus(&mut self) -> Result<(), SurfaceError> {
        if !self.visible {
            return Err(SurfaceError::NotVisible);
        }
        self.focused = true;
        Ok(())
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn native_selection(&self) -> Option<SelectionRange> {
        Some(self.selection())
    }

    fn set_native_selection(&mut self, selection: SelectionRange) -> Result<(), SurfaceError> {
        let selection = selection.clamp(self.value.len());
        self.anchor = selection.start;
        self.cursor = selection.end;
        Ok(())
    }

    fn set_attrs(&mut self, attrs: &SurfaceAttrs) {
        self.attrs = Some(attrs.clone());
    }

    fn default_action(&mut self, key: &KeyEvent) -> DefaultAction {
        if key.kind == KeyEventKind::Release {
            return DefaultAction::None;
        }

        let extend = key.modifiers.contains(KeyModifiers::SHIFT);
        let len = self.value.len();
        let r = match key.code {
            KeyCode::Left => self.move_to(self.cursor.saturating_sub(1), extend),
            KeyCode::Right => self.move_to(self.cursor + 1, extend),
            KeyCode::Home => self.move_to(0, extend),
            KeyCode::End => self.move_to(len, extend),
            KeyCode::Char('a') if key.modifiers == KeyModifiers::CONTROL => {
                self.anchor = 0;
                self.move_to(len, true)
            }
            KeyCode::Char('x') if key.modifiers == KeyModifiers::CONTROL => {
                match self.remove_selection() {
                    Some(cut) => {
                        self.cut = cut;
                        DefaultAction::Edited
                    }
                    None => DefaultAction::None,
                }
            }
            KeyCode::Delete => {
                if self.remove_selection().is_some() {
                    DefaultAction::Edited
                } else if self.cursor < len {
                    self.value.remove(self.cursor);
                    self.anchor = self.cursor;
                    DefaultAction::Edited
                } else {
                    DefaultAction::None
                }
            }
            _ => DefaultAction::None,
        };
        if r != DefaultAction::None {
            debug!("line-surface {:?} -> {:?}", key.code, r);
        }
        r
    }
}
