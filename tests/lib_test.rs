#![allow(dead_code, unreachable_pub)]

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use rat_mask_field::mask_engine::MaskSnapshot;
use rat_mask_field::observer::{EditKind, EditObserver};
use rat_mask_field::surface::{
    Bookmark, EndPoint, SurfaceAttrs, SurfaceError, TextRangeObject, TextSurface,
};
use rat_mask_field::{FieldEvent, SelectionRange};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Log to stderr while testing.
pub fn init_log() {
    _ = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stderr())
        .apply();
}

pub fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

pub fn ctrl_shift(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL | KeyModifiers::SHIFT)
}

pub fn code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn press(c: char) -> FieldEvent {
    FieldEvent::KeyPress(key(c))
}

pub fn down(key: KeyEvent) -> FieldEvent {
    FieldEvent::KeyDown(key)
}

pub fn ct(key: KeyEvent) -> Event {
    Event::Key(key)
}

/// Surface with only the legacy range api.
#[derive(Debug)]
pub struct LegacySurface {
    pub value: Vec<char>,
    pub selection: Rc<Cell<SelectionRange>>,
    pub focused: bool,
    pub visible: bool,
    pub attrs: Option<SurfaceAttrs>,
}

impl Default for LegacySurface {
    fn default() -> Self {
        Self {
            value: Default::default(),
            selection: Default::default(),
            focused: false,
            visible: true,
            attrs: None,
        }
    }
}

impl LegacySurface {
    pub fn new(value: &str, selection: SelectionRange) -> Self {
        Self {
            value: value.chars().collect(),
            selection: Rc::new(Cell::new(selection)),
            ..Default::default()
        }
    }

    pub fn invisible(value: &str, selection: SelectionRange) -> Self {
        Self {
            visible: false,
            ..Self::new(value, selection)
        }
    }

    pub fn selection(&self) -> SelectionRange {
        self.selection.get()
    }

    fn range(&self, start: usize, end: usize) -> MockRange {
        MockRange {
            field: self.value.clone(),
            start,
            end,
            selection: self.selection.clone(),
        }
    }
}

impl TextSurface for LegacySurface {
    fn value(&self) -> String {
        self.value.iter().collect()
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.chars().collect();
        self.selection
            .set(self.selection.get().clamp(self.value.len()));
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
        None
    }

    fn create_text_range(&mut self) -> Result<Box<dyn TextRangeObject>, SurfaceError> {
        Ok(Box::new(self.range(0, self.value.len())))
    }

    fn active_range(&self) -> Result<Box<dyn TextRangeObject>, SurfaceError> {
        if !self.focused {
            return Err(SurfaceError::NotFocusable);
        }
        let sel = self.selection.get();
        Ok(Box::new(self.range(sel.start, sel.end)))
    }

    fn set_attrs(&mut self, attrs: &SurfaceAttrs) {
        self.attrs = Some(attrs.clone());
    }
}

/// Range with offsets hidden behind bookmarks.
#[derive(Debug, Clone)]
pub struct MockRange {
    field: Vec<char>,
    start: usize,
    end: usize,
    selection: Rc<Cell<SelectionRange>>,
}

fn parse_bookmark(bookmark: &Bookmark) -> Option<(usize, usize)> {
    let (start, end) = bookmark.0.split_once(':')?;
    Some((start.parse().ok()?, end.parse().ok()?))
}

impl MockRange {
    fn moved(&self, pos: usize, chars: isize) -> usize {
        (pos as isize + chars).clamp(0, self.field.len() as isize) as usize
    }
}

impl TextRangeObject for MockRange {
    fn text(&self) -> String {
        self.field[self.start..self.end].iter().collect()
    }

    fn bookmark(&self) -> Bookmark {
        Bookmark(format!("{}:{}", self.start, self.end))
    }

    fn move_to_bookmark(&mut self, bookmark: &Bookmark) -> Result<(), SurfaceError> {
        let (start, end) = parse_bookmark(bookmark).ok_or(SurfaceError::Unsupported)?;
        self.start = start;
        self.end = end;
        Ok(())
    }

    fn set_end_point(&mut self, how: EndPoint, other: &dyn TextRangeObject) {
        let Some((start, end)) = parse_bookmark(&other.bookmark()) else {
            return;
        };
        match how {
            EndPoint::StartToStart => self.start = start,
            EndPoint::StartToEnd => self.start = end,
            EndPoint::EndToStart => self.end = start,
            EndPoint::EndToEnd => self.end = end,
        }
        if self.end < self.start {
            self.start = self.end;
        }
    }

    fn collapse(&mut self, to_start: bool) {
        if to_start {
            self.end = self.start;
        } else {
            self.start = self.end;
        }
    }

    fn move_start(&mut self, chars: isize) {
        self.start = self.moved(self.start, chars);
        if self.end < self.start {
            self.end = self.start;
        }
    }

    fn move_end(&mut self, chars: isize) {
        self.end = self.moved(self.end, chars);
        if self.end < self.start {
            self.start = self.end;
        }
    }

    fn select(&mut self) -> Result<(), SurfaceError> {
        self.selection.set(SelectionRange::new(self.start, self.end));
        Ok(())
    }
}

/// Records every observation.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub seen: Rc<RefCell<Vec<(EditKind, bool, String)>>>,
}

impl Recorder {
    pub fn kinds(&self) -> Vec<EditKind> {
        self.seen.borrow().iter().map(|v| v.0.clone()).collect()
    }
}

impl EditObserver for Recorder {
    fn observe(&mut self, kind: &EditKind, accepted: bool, snapshot: &MaskSnapshot) {
        self.seen
            .borrow_mut()
            .push((kind.clone(), accepted, snapshot.value.clone()));
    }
}

/// Records change notifications.
#[derive(Debug, Default, Clone)]
pub struct Changes {
    pub seen: Rc<RefCell<Vec<String>>>,
    pub events: Rc<RefCell<Vec<FieldEvent>>>,
}

impl Changes {
    pub fn callback(&self) -> impl FnMut(&FieldEvent, &MaskSnapshot) + 'static {
        let seen = self.seen.clone();
        let events = self.events.clone();
        move |event, snapshot| {
            seen.borrow_mut().push(snapshot.value.clone());
            events.borrow_mut().push(event.clone());
        }
    }

    pub fn events(&self) -> Vec<FieldEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.seen.borrow().len()
    }

    pub fn last(&self) -> Option<String> {
        self.seen.borrow().last().cloned()
    }
}
