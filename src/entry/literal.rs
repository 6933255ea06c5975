//! Escaping of arbitrary text into a single-line Rust string literal.
//!
//! Rust's own literal decoding is the inverse of [`escape_literal`], so the compiled constant
//! equals the input exactly. Line breaks are always written as escapes, never as raw newlines,
//! and no raw string syntax is used.

use std::fmt::Write as _;

/// Codepoints that change text direction; the compiler denies them inside literals.
fn is_bidi_control(c: char) -> bool {
    matches!(c, '\u{202a}'..='\u{202e}' | '\u{2066}'..='\u{2069}')
}

/// Quote and escape `text` as a Rust string literal.
pub fn escape_literal(text: &str) -> String {
    let mut literal = String::with_capacity(text.len() + 2);
    literal.push('"');

    for c in text.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            '\0' => literal.push_str("\\0"),
            c if c.is_control() || is_bidi_control(c) => {
                let _ = write!(literal, "\\u{{{:x}}}", c as u32);
            }
            c => literal.push(c),
        }
    }

    literal.push('"');
    literal
}
