#![doc = include_str!("../readme.md")]
#![allow(clippy::uninlined_format_args)]
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Range;

macro_rules! mask_debug {
    ($log:expr, $($arg:tt)+) => {
        if $log {
            log::debug!($($arg)+);
        }
    }
}

pub mod deferred;
pub mod field;
pub mod fixed_input;
pub mod format_chars;
pub mod input_mask;
pub mod mask_engine;
pub mod masked_input;
pub mod observer;
pub mod placeholder;
pub mod selection;
pub mod surface;

pub use field::{CharInputSource, FieldEvent, MaskedField};
pub use fixed_input::{FixedOptions, FixedPlaceholderInput};
pub use input_mask::InputMask;
pub use mask_engine::{EditEngine, MaskOptions, MaskSnapshot};
pub use masked_input::MaskedInput;
pub use placeholder::{derive_overlay, normalize_value};

pub mod event {
    //!
    //! Event-handler traits and the outcome of masked editing.
    //!

    pub use rat_event::*;

    /// Result of event handling.
    ///
    /// Everything except `Continue` means the host must suppress
    /// its own default handling of the event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum MaskOutcome {
        /// The event is not intercepted. The host surface may
        /// apply its default behaviour.
        Continue,
        /// The event has been intercepted, but the engine rejected
        /// it. Nothing changed.
        Unchanged,
        /// The event has been intercepted and the caret moved.
        Changed,
        /// The value has been committed and the owner notified.
        TextChanged,
    }

    impl ConsumedEvent for MaskOutcome {
        fn is_consumed(&self) -> bool {
            *self != MaskOutcome::Continue
        }
    }

    impl From<bool> for MaskOutcome {
        fn from(value: bool) -> Self {
            if value {
                MaskOutcome::TextChanged
            } else {
                MaskOutcome::Unchanged
            }
        }
    }

    impl From<Outcome> for MaskOutcome {
        fn from(value: Outcome) -> Self {
            match value {
                Outcome::Continue => MaskOutcome::Continue,
                Outcome::Unchanged => MaskOutcome::Unchanged,
                Outcome::Changed => MaskOutcome::Changed,
            }
        }
    }

    impl From<MaskOutcome> for Outcome {
        fn from(value: MaskOutcome) -> Self {
            match value {
                MaskOutcome::Continue => Outcome::Continue,
                MaskOutcome::Unchanged => Outcome::Unchanged,
                MaskOutcome::Changed => Outcome::Changed,
                MaskOutcome::TextChanged => Outcome::Changed,
            }
        }
    }
}

/// Errors while setting up a mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// The pattern is empty.
    EmptyPattern,
    /// The pattern has no slot that accepts input.
    NoEditableSlot(String),
    /// The placeholder must be exactly one character.
    InvalidPlaceholder(String),
}

impl Display for MaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MaskError::EmptyPattern => write!(f, "pattern is empty"),
            MaskError::NoEditableSlot(p) => {
                write!(f, "pattern {:?} has no editable slot", p)
            }
            MaskError::InvalidPlaceholder(p) => {
                write!(f, "placeholder {:?} must be a single char", p)
            }
        }
    }
}

impl Error for MaskError {}

/// Selection as char offsets into the formatted value.
///
/// Start is always less or equal to end. Use [SelectionRange::new]
/// which orders the offsets.
#[derive(Default, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl Debug for SelectionRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl From<Range<usize>> for SelectionRange {
    fn from(value: Range<usize>) -> Self {
        Self::new(value.start, value.end)
    }
}

impl From<SelectionRange> for Range<usize> {
    fn from(value: SelectionRange) -> Self {
        value.start..value.end
    }
}

impl SelectionRange {
    /// New range. Swaps start and end if necessary.
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Collapsed range.
    pub const fn caret(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// No characters selected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of selected chars.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Limit both offsets to `max`.
    #[inline]
    pub fn clamp(&self, max: usize) -> Self {
        Self {
            start: self.start.min(max),
            end: self.end.min(max),
        }
    }
}

mod _private {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct NonExhaustive;
}
