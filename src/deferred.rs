//!
//! Tasks that run after the current event.
//!
//! Some surfaces haven't finished applying a paste while the paste
//! event is still being handled. Restoring the caret then is lost,
//! so it is queued here and run after the event handler returns.
//!
//! The host calls `flush_deferred()` once its event turn is over.
//! The controller also flushes before it handles the next event, so
//! the tasks always run before the next user event is processed.
//!

use crate::selection::write_selection;
use crate::surface::TextSurface;
use crate::SelectionRange;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Deferred work for a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Restore the caret. The selection is captured when the task
    /// is queued.
    RestoreSelection(SelectionRange),
}

impl DeferredTask {
    /// Run the task. Only touches the selection, never the value.
    pub fn run(&self, surface: &mut dyn TextSurface) {
        match self {
            DeferredTask::RestoreSelection(selection) => write_selection(surface, *selection),
        }
    }
}

/// Queue of deferred tasks.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    queue: RefCell<VecDeque<DeferredTask>>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// is empty
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Number of waiting tasks.
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    /// push a new task.
    pub fn push(&self, task: DeferredTask) {
        self.queue.borrow_mut().push_back(task);
    }

    /// take the first task.
    pub fn take(&self) -> Option<DeferredTask> {
        self.queue.borrow_mut().pop_front()
    }

    /// Run all waiting tasks in order. Returns the number of tasks run.
    pub fn flush(&self, surface: &mut dyn TextSurface) -> usize {
        let mut n = 0;
        while let Some(task) = self.take() {
            task.run(surface);
            n += 1;
        }
        n
    }
}
