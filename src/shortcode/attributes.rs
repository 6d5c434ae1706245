use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{EmbedError, Result};
use crate::escape::escape_attr;

/// Parsed shortcode attributes in source order.
///
/// Positional (key-less) values are stored under their zero-based position
/// among positional values ("0", "1", ...).
pub type Attributes = IndexMap<String, String>;

/// Attribute grammar: `k="v"`, `k='v'`, `k=v`, `"v"`, `'v'`, then bare words
static ATTRIBUTE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"([\w-]+)\s*=\s*"([^"]*)"(?:\s|$)"#,
        r#"|([\w-]+)\s*=\s*'([^']*)'(?:\s|$)"#,
        r#"|([\w-]+)\s*=\s*([^\s'"]+)(?:\s|$)"#,
        r#"|"([^"]*)"(?:\s|$)"#,
        r#"|'([^']*)'(?:\s|$)"#,
        r#"|(\S+)(?:\s|$)"#,
    ))
    .expect("attribute pattern compiles")
});

/// Parse the raw attribute text of a shortcode.
///
/// Keys are lowercased and a repeated key keeps its first position with the
/// last value. Fails when nothing parses or a token carries a dangling quote,
/// e.g. `marker_address="Main St` without the closing quote.
pub fn parse_attributes(text: &str) -> Result<Attributes> {
    let (attributes, malformed) = scan_attributes(text);
    if let Some(token) = malformed.first() {
        return Err(EmbedError::AttributeParse {
            message: format!("dangling quote in `{}`", token),
        });
    }
    if attributes.is_empty() {
        return Err(EmbedError::AttributeParse {
            message: format!("no attributes in `{}`", text.trim()),
        });
    }
    Ok(attributes)
}

/// Parse attribute text, dropping malformed tokens instead of failing.
/// Well-formed attributes around a bad token are kept.
pub fn parse_attributes_lenient(text: &str) -> Attributes {
    let (attributes, malformed) = scan_attributes(text);
    for token in malformed {
        debug!("Ignoring malformed shortcode attribute `{}`", token);
    }
    attributes
}

/// Well-formed attributes plus the tokens that carried a dangling quote
fn scan_attributes(text: &str) -> (Attributes, Vec<String>) {
    let normalized = text.replace(['\u{00a0}', '\u{200b}'], " ");
    let mut attributes = Attributes::new();
    let mut malformed = Vec::new();
    let mut positional = 0usize;

    for caps in ATTRIBUTE_PATTERN.captures_iter(&normalized) {
        let named = [(1, 2), (3, 4), (5, 6)]
            .into_iter()
            .find_map(|(k, v)| Some((caps.get(k)?, caps.get(v)?)));

        if let Some((key, value)) = named {
            attributes.insert(key.as_str().to_lowercase(), value.as_str().to_string());
            continue;
        }

        let value = if let Some(quoted) = caps.get(7).or_else(|| caps.get(8)) {
            quoted.as_str()
        } else if let Some(bare) = caps.get(9) {
            if bare.as_str().contains(['"', '\'']) {
                malformed.push(bare.as_str().to_string());
                continue;
            }
            bare.as_str()
        } else {
            continue;
        };
        attributes.insert(positional.to_string(), value.to_string());
        positional += 1;
    }

    (attributes, malformed)
}

/// Serialize attributes as `key="value"` pairs separated by single spaces.
/// Positional values are written back as bare quoted values.
pub fn to_attribute_string(attributes: &Attributes) -> String {
    attributes
        .iter()
        .map(|(key, value)| {
            if is_positional(key) {
                format!("\"{}\"", escape_attr(value))
            } else {
                format!("{}=\"{}\"", key, escape_attr(value))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_positional(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}
