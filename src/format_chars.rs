//!
//! Character classes for the editable slots of a pattern.
//!
//! Every char of a pattern that is a key of [FormatChars] becomes an
//! editable slot, everything else is a literal.
//!
//! The defaults are
//!
//! * `1`: digit
//! * `a`: letter
//! * `A`: letter, converted to uppercase
//! * `*`: letter or digit
//! * `#`: letter or digit, converted to uppercase
//!

use rustc_hash::FxHashMap;
use std::fmt::{Debug, Formatter};

/// Validator and transform for one placeholder token.
#[derive(Clone, Copy)]
pub struct FormatChar {
    /// Is the char acceptable for this slot.
    pub validate: fn(char) -> bool,
    /// Converts an accepted char before it is stored.
    pub transform: Option<fn(char) -> char>,
}

impl Debug for FormatChar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatChar")
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

impl FormatChar {
    /// Validation only.
    pub const fn new(validate: fn(char) -> bool) -> Self {
        Self {
            validate,
            transform: None,
        }
    }

    /// Validation plus transform.
    pub const fn with_transform(validate: fn(char) -> bool, transform: fn(char) -> char) -> Self {
        Self {
            validate,
            transform: Some(transform),
        }
    }

    #[inline]
    pub fn is_valid(&self, c: char) -> bool {
        (self.validate)(c)
    }

    #[inline]
    pub fn apply(&self, c: char) -> char {
        match self.transform {
            Some(t) => t(c),
            None => c,
        }
    }
}

/// Mapping from placeholder token to character class.
#[derive(Debug, Clone)]
pub struct FormatChars {
    chars: FxHashMap<char, FormatChar>,
}

impl Default for FormatChars {
    fn default() -> Self {
        let mut chars = FxHashMap::default();
        chars.insert('1', FormatChar::new(|c| c.is_ascii_digit()));
        chars.insert('a', FormatChar::new(char::is_alphabetic));
        chars.insert(
            'A',
            FormatChar::with_transform(char::is_alphabetic, to_upper),
        );
        chars.insert('*', FormatChar::new(char::is_alphanumeric));
        chars.insert(
            '#',
            FormatChar::with_transform(char::is_alphanumeric, to_upper),
        );
        Self { chars }
    }
}

fn to_upper(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}

impl FormatChars {
    /// The default set.
    pub fn new() -> Self {
        Self::default()
    }

    /// No format chars at all.
    pub fn empty() -> Self {
        Self {
            chars: FxHashMap::default(),
        }
    }

    /// Add or replace a token. Use `None` to remove a default token,
    /// so the char becomes a literal.
    pub fn with(mut self, token: char, format: Option<FormatChar>) -> Self {
        self.set(token, format);
        self
    }

    /// Add or replace a token.
    pub fn set(&mut self, token: char, format: Option<FormatChar>) {
        match format {
            Some(f) => {
                self.chars.insert(token, f);
            }
            None => {
                self.chars.remove(&token);
            }
        }
    }

    /// Character class for the token.
    #[inline]
    pub fn get(&self, token: char) -> Option<&FormatChar> {
        self.chars.get(&token)
    }

    /// Is the char a placeholder token.
    #[inline]
    pub fn is_format_char(&self, token: char) -> bool {
        self.chars.contains_key(&token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let f = FormatChars::default();
        assert!(f.get('1').expect("digit").is_valid('7'));
        assert!(!f.get('1').expect("digit").is_valid('x'));
        assert_eq!(f.get('A').expect("upper").apply('q'), 'Q');
        assert_eq!(f.get('#').expect("upper").apply('7'), '7');
        assert!(!f.is_format_char('-'));
    }

    #[test]
    fn test_override() {
        let f = FormatChars::default()
            .with('1', None)
            .with('h', Some(FormatChar::new(|c| c.is_ascii_hexdigit())));
        assert!(!f.is_format_char('1'));
        assert!(f.get('h').expect("hex").is_valid('f'));
    }
}
