//!
//! Read and write the selection of a [TextSurface].
//!
//! Surfaces with native offsets are used directly. For legacy
//! surfaces the offsets are measured with range objects.
//!
//! All failures are swallowed. A surface that is not focusable
//! or not visible simply keeps its selection, and reading returns
//! None so the caller keeps what it had.
//!

use crate::surface::{EndPoint, SurfaceError, TextSurface};
use crate::SelectionRange;
use log::debug;

/// Current selection of the surface.
pub fn read_selection(surface: &mut dyn TextSurface) -> Option<SelectionRange> {
    if let Some(selection) = surface.native_selection() {
        return Some(selection);
    }
    match read_legacy(surface) {
        Ok(selection) => Some(selection),
        Err(e) => {
            debug!("read selection failed {:?}", e);
            None
        }
    }
}

/// Set the selection of the surface.
pub fn write_selection(surface: &mut dyn TextSurface, selection: SelectionRange) {
    let r = if surface.native_selection().is_some() {
        surface
            .focus()
            .and_then(|_| surface.set_native_selection(selection))
    } else {
        write_legacy(surface, selection)
    };
    if let Err(e) = r {
        debug!("write selection {:?} failed {:?}", selection, e);
    }
}

fn read_legacy(surface: &mut dyn TextSurface) -> Result<SelectionRange, SurfaceError> {
    surface.focus()?;

    let mut range = surface.create_text_range()?;
    let mut before = range.clone();
    let active = surface.active_range()?;

    range.move_to_bookmark(&active.bookmark())?;
    // everything from the start of the field to the start of the selection.
    before.set_end_point(EndPoint::EndToStart, range.as_ref());

    let start = before.text().chars().count();
    let end = start + range.text().chars().count();
    Ok(SelectionRange::new(start, end))
}

fn write_legacy(surface: &mut dyn TextSurface, selection: SelectionRange) -> Result<(), SurfaceError> {
    surface.focus()?;

    let mut range = surface.create_text_range()?;
    range.collapse(true);
    range.move_start(selection.start as isize);
    range.move_end(selection.len() as isize);
    range.select()
}
