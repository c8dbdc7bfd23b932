//!
//! Diagnostics hook.
//!
//! Attach an [EditObserver] to a controller to watch every engine
//! call it makes. [LogObserver] writes them to the log.
//!

use crate::mask_engine::MaskSnapshot;
use std::fmt::Debug;

/// Engine call made by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    /// Char entered.
    Input(char),
    /// Backspace key.
    Backspace,
    /// Deletion detected in a change event.
    SurfaceDelete(usize),
    /// Paste.
    Paste,
    /// Undo.
    Undo,
    /// Redo.
    Redo,
    /// Pattern replaced by the owner.
    Pattern(String),
    /// Value replaced by the owner.
    Value,
    /// Value normalized by the fixed placeholder variant.
    Normalize,
}

/// Watches the controller.
pub trait EditObserver: Debug {
    /// Called after each engine call. `accepted` is the engine's result.
    fn observe(&mut self, kind: &EditKind, accepted: bool, snapshot: &MaskSnapshot);
}

/// Writes observations to the log.
#[derive(Debug, Default, Clone)]
pub struct LogObserver {
    name: String,
}

impl LogObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name used in the log.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl EditObserver for LogObserver {
    fn observe(&mut self, kind: &EditKind, accepted: bool, snapshot: &MaskSnapshot) {
        log::debug!(
            "{} {:?} {} -> {:?} {:?}",
            self.name,
            kind,
            if accepted { "ok" } else { "rejected" },
            snapshot.value,
            snapshot.selection
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SelectionRange;

    #[test]
    fn test_log_observer() {
        let mut o = LogObserver::named("date");
        let snapshot = MaskSnapshot {
            value: "1_".into(),
            raw_value: "1_".into(),
            selection: SelectionRange::caret(1),
            empty: false,
        };
        o.observe(&EditKind::Input('1'), true, &snapshot);
        o.observe(&EditKind::Backspace, false, &snapshot);
        assert_eq!(o.name, "date");
    }
}
