//!
//! Fixed placeholder overlay and value normalization.
//!
//! The overlay is a non-interactive backdrop rendered beneath the
//! live field. It shows what the user entered followed by the rest
//! of a fixed template.
//!
//! ```rust ignore
//! assert_eq!(derive_overlay("12", "(___) ___-____"), "12__) ___-____");
//! assert_eq!(normalize_value("1 2 3", ' '), "123");
//! ```
//!

/// Live value followed by the template from `len(live)` onwards.
///
/// The template is expected to be at least as long as the live
/// value. If it isn't, the live value is returned unchanged.
pub fn derive_overlay(live: &str, template: &str) -> String {
    let n = live.chars().count();
    let mut overlay = String::with_capacity(live.len().max(template.len()));
    overlay.push_str(live);
    overlay.extend(template.chars().skip(n));
    overlay
}

/// Remove every placeholder char.
///
/// Used when a value that has been merged with placeholder filler
/// must be fed back to the engine as a fresh raw value.
pub fn normalize_value(raw: &str, placeholder: char) -> String {
    raw.split(placeholder).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay() {
        assert_eq!(derive_overlay("12", "(___) ___-____"), "12__) ___-____");
        assert_eq!(derive_overlay("", "__/__"), "__/__");
        assert_eq!(derive_overlay("12/34", "__/__"), "12/34");
        assert_eq!(derive_overlay("äö", "dd.mm"), "äö.mm");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_value("12   ", ' '), "12");
        assert_eq!(normalize_value("1 2 3", ' '), "123");
        assert_eq!(normalize_value("", ' '), "");
        let once = normalize_value("_1_2", '_');
        assert_eq!(normalize_value(&once, '_'), once);
    }
}
