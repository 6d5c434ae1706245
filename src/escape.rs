use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a complete character reference at the start of the input
static ENTITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#[xX][0-9A-Fa-f]+);")
        .expect("entity pattern compiles")
});

/// Escape a value for use inside a double-quoted HTML attribute.
///
/// Existing character references are left alone, so escaping an already
/// escaped value returns it unchanged. Shortcode re-serialization relies on
/// this to stay idempotent across repeated migrations.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (idx, ch) in value.char_indices() {
        match ch {
            '&' if ENTITY_PATTERN.is_match(&value[idx..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape text content. Same rules as [`escape_attr`].
pub fn escape_html(value: &str) -> String {
    escape_attr(value)
}

/// Escape a decoded string (text or attribute value taken from a parsed DOM).
/// Every `&` is encoded since the input holds no character references.
pub fn encode_strict(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}
