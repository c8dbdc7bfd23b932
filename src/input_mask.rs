//!
//! Default pattern engine.
//!
//! The pattern is a string where every char that is a
//! [format char](crate::format_chars) is an editable slot and
//! everything else is a literal. A `\` escapes the next char
//! into a literal.
//!
//! ```rust ignore
//! let mut mask = InputMask::new(&MaskOptions::new("(111) 111-1111"))?;
//! mask.input('5');
//! assert_eq!(mask.value(), "(5__) ___-____");
//! assert_eq!(mask.selection(), SelectionRange::caret(2));
//! ```
//!
//! The value is kept as one char per slot. Unfilled slots hold the
//! placeholder char.
//!
//! History works per edit-kind. Consecutive inputs (or backspaces)
//! with a collapsed caret that continue where the last one stopped
//! are undone as one step.
//!

use crate::format_chars::FormatChars;
use crate::mask_engine::{EditEngine, MaskOptions};
use crate::{MaskError, SelectionRange};
use log::debug;

/// Placeholder used if none is configured.
pub const DEFAULT_PLACEHOLDER: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Literal(char),
    Edit(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditOp {
    Input,
    Backspace,
    Paste,
}

#[derive(Debug, Clone)]
struct HistoryEntry {
    value: Vec<char>,
    selection: SelectionRange,
    last_op: Option<EditOp>,
    // added by the first undo to make the state before undo redoable.
    start_undo: bool,
}

/// Everything a failed paste must restore.
#[derive(Debug, Clone, Default)]
struct EditState {
    value: Vec<char>,
    selection: SelectionRange,
    history: Vec<HistoryEntry>,
    history_idx: Option<usize>,
    last_op: Option<EditOp>,
    last_selection: Option<SelectionRange>,
}

/// Pattern engine.
#[derive(Debug, Clone)]
pub struct InputMask {
    pattern: String,
    slots: Vec<Slot>,
    first_editable: usize,
    last_editable: usize,
    format_chars: FormatChars,
    placeholder: char,
    revealing: bool,
    empty_value: String,

    state: EditState,
}

impl InputMask {
    /// New engine.
    pub fn new(options: &MaskOptions) -> Result<Self, MaskError> {
        let mut mask = Self {
            pattern: Default::default(),
            slots: Default::default(),
            first_editable: 0,
            last_editable: 0,
            format_chars: options.format_chars.clone().unwrap_or_default(),
            placeholder: options.placeholder_char.unwrap_or(DEFAULT_PLACEHOLDER),
            revealing: options.revealing_mask,
            empty_value: Default::default(),
            state: Default::default(),
        };
        mask.set_pattern(&options.pattern, Some(&options.value), None)?;
        Ok(mask)
    }

    /// New engine with default settings.
    pub fn with_pattern(pattern: &str) -> Result<Self, MaskError> {
        Self::new(&MaskOptions::new(pattern))
    }

    /// Unfilled slots at the end are hidden.
    pub fn is_revealing(&self) -> bool {
        self.revealing
    }

    /// First editable slot.
    pub fn first_editable(&self) -> usize {
        self.first_editable
    }

    /// Last editable slot.
    pub fn last_editable(&self) -> usize {
        self.last_editable
    }

    /// Is the slot at pos editable.
    pub fn is_editable(&self, pos: usize) -> bool {
        matches!(self.slots.get(pos), Some(Slot::Edit(_)))
    }

    /// Number of undo steps available.
    pub fn open_undo(&self) -> usize {
        match self.state.history_idx {
            None => self.state.history.len(),
            Some(idx) => idx,
        }
    }

    fn parse_pattern(pattern: &str, format_chars: &FormatChars) -> Result<Vec<Slot>, MaskError> {
        if pattern.is_empty() {
            return Err(MaskError::EmptyPattern);
        }

        let mut slots = Vec::new();
        let mut esc = false;
        for c in pattern.chars() {
            if esc {
                esc = false;
                slots.push(Slot::Literal(c));
            } else if c == '\\' {
                esc = true;
            } else if format_chars.is_format_char(c) {
                slots.push(Slot::Edit(c));
            } else {
                slots.push(Slot::Literal(c));
            }
        }
        if esc {
            slots.push(Slot::Literal('\\'));
        }

        if !slots.iter().any(|v| matches!(v, Slot::Edit(_))) {
            return Err(MaskError::NoEditableSlot(pattern.to_string()));
        }
        Ok(slots)
    }

    fn valid_at(&self, c: char, pos: usize) -> bool {
        match self.slots.get(pos) {
            Some(Slot::Edit(token)) => self
                .format_chars
                .get(*token)
                .map(|v| v.is_valid(c))
                .unwrap_or(false),
            _ => false,
        }
    }

    fn transform_at(&self, c: char, pos: usize) -> char {
        match self.slots.get(pos) {
            Some(Slot::Edit(token)) => self
                .format_chars
                .get(*token)
                .map(|v| v.apply(c))
                .unwrap_or(c),
            _ => c,
        }
    }

    /// Map a raw or formatted value to the slots.
    ///
    /// Each editable slot consumes one char of the value, which is
    /// kept if it is valid there. Literals consume a matching char.
    fn format(&self, value: &str) -> Vec<char> {
        let value = value.chars().collect::<Vec<_>>();
        let mut buf = Vec::with_capacity(self.slots.len());
        let mut idx = 0;
        for (pos, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Edit(_) => {
                    match value.get(idx) {
                        Some(c) if self.valid_at(*c, pos) => {
                            buf.push(self.transform_at(*c, pos));
                        }
                        _ => buf.push(self.placeholder),
                    }
                    idx += 1;
                }
                Slot::Literal(l) => {
                    buf.push(*l);
                    if value.get(idx) == Some(l) {
                        idx += 1;
                    }
                }
            }
        }
        buf
    }

    /// Formatted string for the slot values.
    fn display(&self, value: &[char]) -> String {
        if !self.revealing {
            return value.iter().collect();
        }

        let last_filled = (0..value.len())
            .rev()
            .find(|pos| self.is_editable(*pos) && value[*pos] != self.placeholder);
        let search_from = match last_filled {
            Some(pos) => pos + 1,
            None => 0,
        };
        let end = (search_from..value.len())
            .find(|pos| self.is_editable(*pos))
            .unwrap_or(value.len());
        value[..end].iter().collect()
    }

    /// Caret after skipping literals.
    fn skip_literals(&self, mut pos: usize) -> usize {
        while pos < self.slots.len() && !self.is_editable(pos) {
            pos += 1;
        }
        pos
    }

    /// Bookkeeping after a successful edit.
    fn push_history(&mut self, op: EditOp, value_before: Vec<char>, sel_before: SelectionRange) {
        let mut after_undo = false;
        if let Some(idx) = self.state.history_idx.take() {
            // new edits after undo drop the redo tail.
            self.state.history.truncate(idx);
            after_undo = true;
        }

        let continues = match self.state.last_selection {
            Some(last) => last.start == sel_before.start,
            None => true,
        };
        if after_undo || self.state.last_op != Some(op) || !sel_before.is_empty() || !continues {
            self.state.history.push(HistoryEntry {
                value: value_before,
                selection: sel_before,
                last_op: self.state.last_op,
                start_undo: false,
            });
        }
        self.state.last_op = Some(op);
        self.state.last_selection = Some(self.state.selection);
    }
}

impl EditEngine for InputMask {
    fn set_pattern(
        &mut self,
        pattern: &str,
        value: Option<&str>,
        selection: Option<SelectionRange>,
    ) -> Result<(), MaskError> {
        let slots = Self::parse_pattern(pattern, &self.format_chars)?;

        self.pattern = pattern.to_string();
        self.first_editable = slots
            .iter()
            .position(|v| matches!(v, Slot::Edit(_)))
            .unwrap_or_default();
        self.last_editable = slots
            .iter()
            .rposition(|v| matches!(v, Slot::Edit(_)))
            .unwrap_or_default();
        self.slots = slots;

        let empty = self.format("");
        self.empty_value = self.display(&empty);

        self.state = EditState {
            value: self.format(value.unwrap_or_default()),
            selection: selection.unwrap_or_default().clamp(self.slots.len()),
            ..Default::default()
        };
        debug!(
            "set_pattern {:?} -> {:?} {:?}",
            self.pattern,
            self.value(),
            self.state.selection
        );
        Ok(())
    }

    fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    fn pattern_len(&self) -> usize {
        self.slots.len()
    }

    fn set_value(&mut self, value: &str) {
        self.state.value = self.format(value);
    }

    fn value(&self) -> String {
        self.display(&self.state.value)
    }

    fn raw_value(&self) -> String {
        self.state
            .value
            .iter()
            .enumerate()
            .filter(|(pos, _)| self.is_editable(*pos))
            .map(|(_, c)| *c)
            .collect()
    }

    fn empty_value(&self) -> &str {
        self.empty_value.as_str()
    }

    fn placeholder_char(&self) -> char {
        self.placeholder
    }

    fn selection(&self) -> SelectionRange {
        self.state.selection
    }

    fn set_selection(&mut self, selection: SelectionRange) {
        self.state.selection = selection.clamp(self.slots.len());
    }

    fn input(&mut self, c: char) -> bool {
        let sel_before = self.state.selection;
        let len = self.slots.len();
        if sel_before.is_empty() && sel_before.start == len {
            return false;
        }

        let mut pos = sel_before.start.max(self.first_editable);
        if let Some(Slot::Literal(l)) = self.slots.get(pos) {
            if *l == c && sel_before.is_empty() {
                // typing the literal steps over it.
                let value_before = self.state.value.clone();
                self.state.selection = SelectionRange::caret(self.skip_literals(pos + 1));
                self.push_history(EditOp::Input, value_before, sel_before);
                return true;
            }
            pos = self.skip_literals(pos);
        }
        if pos >= len || !self.valid_at(c, pos) {
            return false;
        }

        let value_before = self.state.value.clone();
        self.state.value[pos] = self.transform_at(c, pos);
        // the rest of the selection is cleared.
        for i in pos + 1..sel_before.end.min(len) {
            if self.is_editable(i) {
                self.state.value[i] = self.placeholder;
            }
        }
        self.state.selection = SelectionRange::caret(self.skip_literals(pos + 1));
        self.push_history(EditOp::Input, value_before, sel_before);
        true
    }

    fn backspace(&mut self) -> bool {
        let sel_before = self.state.selection;
        if sel_before == SelectionRange::caret(0) {
            return false;
        }

        let value_before = self.state.value.clone();
        if sel_before.is_empty() {
            let Some(pos) = (0..sel_before.start).rev().find(|v| self.is_editable(*v)) else {
                return false;
            };
            self.state.value[pos] = self.placeholder;
            self.state.selection = SelectionRange::caret(pos);
        } else {
            for i in sel_before.start..sel_before.end.min(self.slots.len()) {
                if self.is_editable(i) {
                    self.state.value[i] = self.placeholder;
                }
            }
            self.state.selection = SelectionRange::caret(sel_before.start);
        }

        if self.state.value == value_before && self.state.selection == sel_before {
            return false;
        }
        self.push_history(EditOp::Backspace, value_before, sel_before);
        true
    }

    fn paste(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }

        let initial = self.state.clone();
        let mut text = text.chars().collect::<Vec<_>>();

        // caret inside the leading literals. the paste has to start
        // with a copy of them, which is stepped over.
        let sel = self.state.selection;
        if sel.start < self.first_editable {
            let prefix = &self.slots[sel.start..self.first_editable];
            let matches = prefix.len() <= text.len()
                && prefix
                    .iter()
                    .zip(text.iter())
                    .all(|(s, c)| *s == Slot::Literal(*c));
            if !matches {
                debug!("paste rejected, leading literals differ");
                self.state = initial;
                return false;
            }
            text.drain(..prefix.len());
            self.state.selection =
                SelectionRange::new(self.first_editable, sel.end.max(self.first_editable));
        }

        for c in text {
            if self.state.selection.start > self.last_editable {
                break;
            }
            if !self.input(c) {
                // accept literals that have just been skipped.
                let mut pos = self.state.selection.start;
                let mut skipped = false;
                while pos > 0 {
                    match self.slots[pos - 1] {
                        Slot::Literal(l) if l == c => {
                            skipped = true;
                            break;
                        }
                        Slot::Literal(_) => pos -= 1,
                        Slot::Edit(_) => break,
                    }
                }
                if !skipped {
                    debug!("paste rejected {:?}", c);
                    self.state = initial;
                    return false;
                }
            }
        }

        if self.state.value == initial.value && self.state.selection == initial.selection {
            self.state = initial;
            return false;
        }

        // the whole paste is one undo step.
        let mut history = initial.history;
        if let Some(idx) = initial.history_idx {
            history.truncate(idx);
        }
        history.push(HistoryEntry {
            value: initial.value,
            selection: initial.selection,
            last_op: initial.last_op,
            start_undo: false,
        });
        self.state.history = history;
        self.state.history_idx = None;
        self.state.last_op = Some(EditOp::Paste);
        self.state.last_selection = Some(self.state.selection);
        true
    }

    fn undo(&mut self) -> bool {
        if self.state.history.is_empty() || self.state.history_idx == Some(0) {
            return false;
        }

        let entry = match self.state.history_idx {
            None => {
                let idx = self.state.history.len() - 1;
                self.state.history_idx = Some(idx);
                let entry = self.state.history[idx].clone();
                if entry.value != self.state.value || entry.selection != self.state.selection {
                    // keep the current state for redo.
                    self.state.history.push(HistoryEntry {
                        value: self.state.value.clone(),
                        selection: self.state.selection,
                        last_op: self.state.last_op,
                        start_undo: true,
                    });
                }
                entry
            }
            Some(idx) => {
                self.state.history_idx = Some(idx - 1);
                self.state.history[idx - 1].clone()
            }
        };

        self.state.value = entry.value;
        self.state.selection = entry.selection;
        self.state.last_op = entry.last_op;
        true
    }

    fn redo(&mut self) -> bool {
        let Some(idx) = self.state.history_idx else {
            return false;
        };
        if idx + 1 >= self.state.history.len() {
            return false;
        }

        let idx = idx + 1;
        let entry = if idx == self.state.history.len() - 1 {
            self.state.history_idx = None;
            let entry = self.state.history[idx].clone();
            if entry.start_undo {
                self.state.history.pop();
            }
            entry
        } else {
            self.state.history_idx = Some(idx);
            self.state.history[idx].clone()
        };

        self.state.value = entry.value;
        self.state.selection = entry.selection;
        self.state.last_op = entry.last_op;
        true
    }
}
