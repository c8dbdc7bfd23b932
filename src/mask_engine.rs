//!
//! The edit engine seam.
//!
//! The controller never edits text itself. It hands every edit to an
//! [EditEngine] together with the selection it captured from the
//! surface, and afterwards copies the engine's value and selection
//! back to the surface.
//!
//! [InputMask](crate::InputMask) is the engine shipped with this crate.
//!

use crate::format_chars::FormatChars;
use crate::{MaskError, SelectionRange};
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::fmt::Debug;

/// Pattern driven value/selection transformer.
///
/// Every mutating call returns whether anything changed.
/// Offsets are char offsets into the formatted value.
pub trait EditEngine: Debug {
    /// Replace the pattern.
    ///
    /// The value is formatted with the new pattern, the selection is
    /// clamped to the new pattern length. Defaults are the empty value
    /// and a caret at 0. Resets the undo history.
    fn set_pattern(
        &mut self,
        pattern: &str,
        value: Option<&str>,
        selection: Option<SelectionRange>,
    ) -> Result<(), MaskError>;

    /// Current pattern.
    fn pattern(&self) -> &str;

    /// Length of the pattern in chars. Escapes don't count.
    fn pattern_len(&self) -> usize;

    /// Set the value. Accepts raw or formatted values.
    /// Doesn't touch the undo history.
    fn set_value(&mut self, value: &str);

    /// Formatted value.
    fn value(&self) -> String;

    /// Chars at the editable slots, including placeholders.
    fn raw_value(&self) -> String;

    /// Formatted value of the empty input.
    fn empty_value(&self) -> &str;

    /// Placeholder for unfilled slots.
    fn placeholder_char(&self) -> char;

    /// Current selection.
    fn selection(&self) -> SelectionRange;

    /// Set the selection the next edit applies to.
    fn set_selection(&mut self, selection: SelectionRange);

    /// Enter a char at the selection.
    ///
    /// Returns true if the value or the selection changed. Typing the
    /// next literal only moves the caret and counts as a change.
    fn input(&mut self, c: char) -> bool;

    /// Delete the selection or the char before the caret.
    ///
    /// Returns true if the value or the selection changed. A selection
    /// that covers only literals collapses to its start without
    /// touching the value, and this is reported as a change too. The
    /// controller commits and notifies the owner in that case.
    fn backspace(&mut self) -> bool;

    /// Enter a string at the selection. All or nothing.
    fn paste(&mut self, text: &str) -> bool;

    /// Undo the last edit.
    fn undo(&mut self) -> bool;

    /// Redo the last undo.
    fn redo(&mut self) -> bool;

    /// The value equals the empty sentinel.
    fn is_empty(&self) -> bool {
        self.value() == self.empty_value()
    }

    /// Copy of the current state.
    fn snapshot(&self) -> MaskSnapshot {
        MaskSnapshot {
            value: self.value(),
            raw_value: self.raw_value(),
            selection: self.selection(),
            empty: self.is_empty(),
        }
    }
}

/// Engine state handed to the owner after each committed edit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaskSnapshot {
    /// Formatted value.
    pub value: String,
    /// Raw value with placeholders.
    pub raw_value: String,
    /// Selection after the edit.
    pub selection: SelectionRange,
    /// The value equals the empty sentinel.
    pub empty: bool,
}

impl MaskSnapshot {
    /// Value as it should be displayed. The empty value shows as `""`.
    pub fn display_value(&self) -> &str {
        if self.empty {
            ""
        } else {
            self.value.as_str()
        }
    }
}

/// Configuration of a masked field.
///
/// ```rust ignore
/// let options = MaskOptions::new("(111) 111-1111")
///     .value("555")
///     .placeholder_char('_');
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MaskOptions {
    /// Pattern.
    pub pattern: String,
    /// Initial value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: String,
    /// Placeholder for unfilled slots. Uses the engine default if None.
    #[cfg_attr(feature = "serde", serde(default))]
    pub placeholder_char: Option<char>,
    /// Hide unfilled slots at the end of the value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub revealing_mask: bool,
    /// Width of the surface. Defaults to the pattern length.
    #[cfg_attr(feature = "serde", serde(default))]
    pub size: Option<usize>,
    /// Placeholder text of the surface. Defaults to the empty value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub placeholder: Option<String>,
    /// Character classes. Uses the defaults if None.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub format_chars: Option<FormatChars>,
}

impl MaskOptions {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            value: Default::default(),
            placeholder_char: None,
            revealing_mask: false,
            size: None,
            placeholder: None,
            format_chars: None,
        }
    }

    /// Initial value.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Placeholder for unfilled slots.
    pub fn placeholder_char(mut self, c: char) -> Self {
        self.placeholder_char = Some(c);
        self
    }

    /// Placeholder for unfilled slots, given as a string.
    /// Must be exactly one char.
    pub fn placeholder_str(mut self, s: &str) -> Result<Self, MaskError> {
        let mut it = s.chars();
        match (it.next(), it.next()) {
            (Some(c), None) => {
                self.placeholder_char = Some(c);
                Ok(self)
            }
            _ => Err(MaskError::InvalidPlaceholder(s.to_string())),
        }
    }

    /// Hide unfilled slots at the end.
    pub fn revealing_mask(mut self, revealing: bool) -> Self {
        self.revealing_mask = revealing;
        self
    }

    /// Width of the surface.
    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Placeholder text of the surface.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Character classes.
    pub fn format_chars(mut self, format_chars: FormatChars) -> Self {
        self.format_chars = Some(format_chars);
        self
    }
}
