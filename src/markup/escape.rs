//! Output escaping
//!
//! Escapes `&`, `<` and `>` for the markup output. An `&` that already starts a character
//! or entity reference is kept, so escaping escaped text is a no-op.

use once_cell::sync::Lazy;
use regex::Regex;

static REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#[xX][0-9A-Fa-f]+);")
        .expect("reference pattern is valid")
});

/// Escape text content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        match c {
            '&' if REFERENCE.is_match(&text[i..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape an attribute value, which is always written inside double quotes
pub fn escape_attribute(value: &str) -> String {
    escape(value).replace('"', "&quot;")
}
