use rat_mask_field::format_chars::{FormatChar, FormatChars};
use rat_mask_field::{EditEngine, InputMask, MaskError, MaskOptions, SelectionRange};

fn filled(mask: &InputMask) -> usize {
    mask.raw_value()
        .chars()
        .filter(|c| *c != mask.placeholder_char())
        .count()
}

#[test]
fn test_pattern() {
    let m = InputMask::with_pattern("11/11/1111").expect("ok");
    assert_eq!(m.pattern(), "11/11/1111");
    assert_eq!(m.pattern_len(), 10);
    assert_eq!(m.empty_value(), "__/__/____");
    assert_eq!(m.value(), "__/__/____");
    assert_eq!(m.raw_value(), "________");
    assert_eq!(m.first_editable(), 0);
    assert_eq!(m.last_editable(), 9);
    assert!(m.is_empty());
    assert!(!m.is_editable(2));

    let m = InputMask::with_pattern("+\\1 (111)").expect("ok");
    assert_eq!(m.empty_value(), "+1 (___)");
    assert_eq!(m.first_editable(), 4);
    assert_eq!(m.last_editable(), 6);

    assert_eq!(InputMask::with_pattern("").unwrap_err(), MaskError::EmptyPattern);
    assert_eq!(
        InputMask::with_pattern("--/--").unwrap_err(),
        MaskError::NoEditableSlot("--/--".into())
    );
    assert!(MaskOptions::new("111").placeholder_str("__").is_err());
    assert!(MaskOptions::new("111").placeholder_str("").is_err());
}

#[test]
fn test_initial_value() {
    let m = InputMask::new(&MaskOptions::new("11/11/1111").value("12252020")).expect("ok");
    assert_eq!(m.value(), "12/25/2020");
    assert_eq!(m.raw_value(), "12252020");

    // formatted values are accepted too.
    let m = InputMask::new(&MaskOptions::new("11/11/1111").value("12/25/2020")).expect("ok");
    assert_eq!(m.value(), "12/25/2020");

    // invalid chars leave their slot empty.
    let m = InputMask::new(&MaskOptions::new("1111").value("1x3")).expect("ok");
    assert_eq!(m.value(), "1_3_");
}

#[test]
fn test_input() {
    let mut m = InputMask::with_pattern("11/11/1111").expect("ok");
    assert!(m.input('1'));
    assert_eq!(m.value(), "1_/__/____");
    assert_eq!(m.selection(), SelectionRange::caret(1));
    assert!(m.input('2'));
    assert_eq!(m.value(), "12/__/____");
    assert_eq!(m.selection(), SelectionRange::caret(3));

    assert!(!m.input('x'));
    assert_eq!(m.value(), "12/__/____");
    assert_eq!(m.selection(), SelectionRange::caret(3));

    for c in "252020".chars() {
        assert!(m.input(c));
    }
    assert_eq!(m.value(), "12/25/2020");
    assert_eq!(m.selection(), SelectionRange::caret(10));
    // no room left.
    assert!(!m.input('1'));
}

#[test]
fn test_input_count() {
    let mut m = InputMask::with_pattern("(111) 111-1111").expect("ok");
    let mut accepted = 0;
    for c in "5x5a5-1b2".chars() {
        if m.input(c) {
            accepted += 1;
        }
        assert_eq!(m.value().chars().count(), m.pattern_len());
    }
    // '-' is not the literal at the caret, the digit slot rejects it.
    assert_eq!(accepted, 5);
    assert_eq!(filled(&m), accepted);
    assert_eq!(m.value(), "(555) 12_-____");
}

#[test]
fn test_input_literals() {
    let mut m = InputMask::with_pattern("(111) 111-1111").expect("ok");
    // caret before the first slot.
    assert!(m.input('5'));
    assert_eq!(m.value(), "(5__) ___-____");
    assert_eq!(m.selection(), SelectionRange::caret(2));

    assert!(m.input('5'));
    assert!(m.input('5'));
    assert_eq!(m.selection(), SelectionRange::caret(6));

    // caret on a literal moves to the next slot.
    m.set_selection(SelectionRange::caret(9));
    assert!(m.input('1'));
    assert_eq!(m.value(), "(555) ___-1___");
    assert_eq!(m.selection(), SelectionRange::caret(11));

    // typing the literal steps over it.
    m.set_selection(SelectionRange::caret(4));
    assert!(m.input(')'));
    assert_eq!(m.selection(), SelectionRange::caret(6));
    assert_eq!(m.value(), "(555) ___-1___");
}

#[test]
fn test_input_selection() {
    let mut m = InputMask::new(&MaskOptions::new("11/11/1111").value("12252020")).expect("ok");
    m.set_selection(SelectionRange::new(0, 5));
    assert!(m.input('9'));
    assert_eq!(m.value(), "9_/__/2020");
    assert_eq!(m.selection(), SelectionRange::caret(1));
}

#[test]
fn test_format_chars() {
    let mut m = InputMask::with_pattern("AA-##").expect("ok");
    for c in "ab1c".chars() {
        assert!(m.input(c));
    }
    assert_eq!(m.value(), "AB-1C");

    let mut m = InputMask::with_pattern("aa").expect("ok");
    assert!(!m.input('1'));
    assert!(m.input('x'));
    assert_eq!(m.value(), "x_");

    let hex = FormatChars::new()
        .with('h', Some(FormatChar::new(|c| c.is_ascii_hexdigit())))
        .with('1', None);
    let mut m =
        InputMask::new(&MaskOptions::new("#hh1").format_chars(hex)).expect("ok");
    assert_eq!(m.empty_value(), "___1");
    assert!(m.input('q'));
    assert!(!m.input('g'));
    assert!(m.input('f'));
    assert!(m.input('0'));
    assert_eq!(m.value(), "Qf01");
}

#[test]
fn test_placeholder() {
    let mut m = InputMask::new(&MaskOptions::new("11-11").placeholder_char('.')).expect("ok");
    assert_eq!(m.empty_value(), "..-..");
    assert!(m.input('1'));
    assert_eq!(m.value(), "1.-..");
    assert_eq!(m.raw_value(), "1...");
}

#[test]
fn test_revealing() {
    let mut m =
        InputMask::new(&MaskOptions::new("11/11/1111").revealing_mask(true)).expect("ok");
    assert!(m.is_revealing());
    assert_eq!(m.empty_value(), "");
    assert_eq!(m.value(), "");
    assert!(m.input('1'));
    assert_eq!(m.value(), "1");
    assert!(m.input('2'));
    assert_eq!(m.value(), "12/");
    assert!(m.input('2'));
    assert_eq!(m.value(), "12/2");

    let m = InputMask::new(&MaskOptions::new("(111)").revealing_mask(true)).expect("ok");
    assert_eq!(m.empty_value(), "(");
}

#[test]
fn test_backspace() {
    let mut m = InputMask::new(&MaskOptions::new("11/11/1111").value("1225")).expect("ok");
    assert_eq!(m.value(), "12/25/____");

    // nothing before the caret.
    assert!(!m.backspace());

    m.set_selection(SelectionRange::caret(6));
    // skips back over the literal.
    assert!(m.backspace());
    assert_eq!(m.value(), "12/2_/____");
    assert_eq!(m.selection(), SelectionRange::caret(4));

    m.set_selection(SelectionRange::caret(3));
    assert!(m.backspace());
    assert_eq!(m.value(), "1_/2_/____");
    assert_eq!(m.selection(), SelectionRange::caret(1));

    m.set_selection(SelectionRange::new(0, 4));
    assert!(m.backspace());
    assert_eq!(m.value(), "__/__/____");
    assert_eq!(m.selection(), SelectionRange::caret(0));
    assert!(m.is_empty());
}

#[test]
fn test_backspace_literals_only() {
    let mut m = InputMask::new(&MaskOptions::new("11/11/1111").value("12252020")).expect("ok");
    m.set_selection(SelectionRange::new(2, 3));
    // nothing to delete, the selection collapses.
    assert!(m.backspace());
    assert_eq!(m.value(), "12/25/2020");
    assert_eq!(m.selection(), SelectionRange::caret(2));

    // and can be undone.
    assert!(m.undo());
    assert_eq!(m.selection(), SelectionRange::new(2, 3));
}

#[test]
fn test_backspace_never_grows() {
    let mut m = InputMask::new(&MaskOptions::new("(111) 111-1111").value("5551234567"))
        .expect("ok");
    m.set_selection(SelectionRange::caret(m.pattern_len()));
    let mut last = filled(&m);
    for _ in 0..20 {
        let ok = m.backspace();
        let now = filled(&m);
        assert_eq!(m.value().chars().count(), m.pattern_len());
        if ok {
            assert_eq!(now + 1, last);
        } else {
            assert_eq!(now, last);
        }
        last = now;
    }
    assert_eq!(m.value(), m.empty_value());
}

#[test]
fn test_paste() {
    let mut m = InputMask::with_pattern("11/11/1111").expect("ok");
    assert!(m.paste("12252020"));
    assert_eq!(m.value(), "12/25/2020");
    assert_eq!(m.selection(), SelectionRange::caret(10));

    let mut m = InputMask::with_pattern("11/11/1111").expect("ok");
    assert!(m.paste("12/25/2020"));
    assert_eq!(m.value(), "12/25/2020");

    // truncated to the remaining slots.
    let mut m = InputMask::with_pattern("11/11/1111").expect("ok");
    m.set_selection(SelectionRange::caret(6));
    assert!(m.paste("20201234"));
    assert_eq!(m.value(), "__/__/2020");
    assert_eq!(m.selection(), SelectionRange::caret(10));

    // leading literals are stepped over.
    let mut m = InputMask::with_pattern("(111) 111-1111").expect("ok");
    assert!(m.paste("(555) 123-4567"));
    assert_eq!(m.value(), "(555) 123-4567");
}

#[test]
fn test_paste_rejected() {
    let mut m = InputMask::new(&MaskOptions::new("11/11/1111").value("1")).expect("ok");
    m.set_selection(SelectionRange::caret(1));
    assert!(!m.paste("2x"));
    assert_eq!(m.value(), "1_/__/____");
    assert_eq!(m.selection(), SelectionRange::caret(1));

    assert!(!m.paste(""));
    assert_eq!(m.value(), "1_/__/____");

    // a rejected paste is not in the history.
    assert!(!m.undo());

    // the caret sits before the leading literals, the paste doesn't
    // start with them.
    let mut m = InputMask::with_pattern("(111) 111-1111").expect("ok");
    m.set_selection(SelectionRange::caret(0));
    assert!(!m.paste("5551234567"));
    assert_eq!(m.value(), "(___) ___-____");
    assert_eq!(m.selection(), SelectionRange::caret(0));
    assert!(!m.paste("5"));
    assert!(!m.undo());

    // with the literals it goes through.
    assert!(m.paste("(555"));
    assert_eq!(m.value(), "(555) ___-____");
}

#[test]
fn test_undo_redo() {
    let mut m = InputMask::with_pattern("11/11/1111").expect("ok");
    assert!(!m.undo());
    assert!(!m.redo());

    assert!(m.input('1'));
    assert!(m.input('2'));
    m.set_selection(SelectionRange::caret(6));
    assert!(m.input('9'));
    assert_eq!(m.value(), "12/__/9___");
    assert_eq!(m.open_undo(), 2);

    assert!(m.undo());
    assert_eq!(m.value(), "12/__/____");
    assert!(m.undo());
    assert_eq!(m.value(), m.empty_value());
    assert!(!m.undo());

    assert!(m.redo());
    assert_eq!(m.value(), "12/__/____");
    assert!(m.redo());
    assert_eq!(m.value(), "12/__/9___");
    assert_eq!(m.selection(), SelectionRange::caret(7));
    assert!(!m.redo());
}

#[test]
fn test_undo_round_trip() {
    let mut m = InputMask::with_pattern("(111) 111-1111").expect("ok");
    assert!(m.input('5'));
    assert!(m.input('5'));
    assert!(m.backspace());
    assert!(m.paste("123"));
    m.set_selection(SelectionRange::caret(1));
    assert!(m.input('9'));

    let value = m.value();
    let selection = m.selection();
    let n = m.open_undo();
    assert!(n > 0);

    for _ in 0..n {
        assert!(m.undo());
    }
    assert_eq!(m.value(), m.empty_value());
    for _ in 0..n {
        assert!(m.redo());
    }
    assert_eq!(m.value(), value);
    assert_eq!(m.selection(), selection);
}

#[test]
fn test_undo_then_edit() {
    let mut m = InputMask::with_pattern("1111").expect("ok");
    assert!(m.input('1'));
    assert!(m.input('2'));
    assert!(m.undo());
    assert_eq!(m.value(), "____");

    assert!(m.input('7'));
    assert_eq!(m.value(), "7___");
    // the redo tail is gone.
    assert!(!m.redo());
    assert!(m.undo());
    assert_eq!(m.value(), "____");
}

#[test]
fn test_set_pattern() {
    let mut m = InputMask::new(&MaskOptions::new("11/11/1111").value("1225")).expect("ok");
    assert!(m.input('1'));
    let raw = m.raw_value();
    m.set_pattern("11-11-1111", Some(&raw), Some(SelectionRange::caret(3)))
        .expect("ok");
    assert_eq!(m.value(), "12-25-____");
    assert_eq!(m.selection(), SelectionRange::caret(3));
    // history is reset.
    assert!(!m.undo());

    m.set_pattern("11", None, Some(SelectionRange::caret(20)))
        .expect("ok");
    assert_eq!(m.value(), "__");
    assert_eq!(m.selection(), SelectionRange::caret(2));

    assert!(m.set_pattern("", None, None).is_err());
    assert_eq!(m.pattern(), "11");
}
