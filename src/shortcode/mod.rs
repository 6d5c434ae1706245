//! Bracketed shortcode markup: locating tags in free text, parsing their
//! attributes and writing them back.

use std::ops::Range;

pub mod attributes;

pub use attributes::{parse_attributes, parse_attributes_lenient, to_attribute_string, Attributes};

/// Extra brackets around a shortcode: `[[tag]` / `[tag]]`.
///
/// Both together (`[[tag]]`) is the escape form: the tag is printed
/// literally instead of being expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Brackets {
    pub open: bool,
    pub close: bool,
}

impl Brackets {
    pub fn is_escaped(&self) -> bool {
        self.open && self.close
    }
}

/// One shortcode occurrence found in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcodeMatch<'a> {
    /// Byte range of the whole occurrence, extra brackets and closing tag included
    pub span: Range<usize>,
    /// Byte range of the opening tag, up to and including its `]`
    pub opening: Range<usize>,
    pub brackets: Brackets,
    /// Tag name as written in the source
    pub tag: &'a str,
    /// Everything between the tag name and the closing `]` / `/]`
    pub raw_attributes: &'a str,
    pub self_closing: bool,
    /// Text between the opening and the closing tag; `None` when there is no closing tag
    pub content: Option<&'a str>,
}

/// Find every occurrence of the given tags, left to right and non-overlapping.
///
/// A tag name only matches when it is not followed by a word character or a
/// hyphen, so `sbs_marker` does not match `[sbs_markers]`. The content of an
/// enclosing tag runs up to the first matching closing tag; occurrences inside
/// that content are not reported separately.
pub fn find_shortcodes<'a>(
    text: &'a str,
    tags: &[&str],
    case_insensitive: bool,
) -> Vec<ShortcodeMatch<'a>> {
    let mut matches = Vec::new();
    let mut pos = 0;
    while let Some(rel) = text[pos..].find('[') {
        let start = pos + rel;
        match match_at(text, start, tags, case_insensitive) {
            Some(found) => {
                pos = found.span.end;
                matches.push(found);
            }
            None => pos = start + 1,
        }
    }
    matches
}

fn match_at<'a>(
    text: &'a str,
    start: usize,
    tags: &[&str],
    case_insensitive: bool,
) -> Option<ShortcodeMatch<'a>> {
    let bytes = text.as_bytes();
    let mut idx = start + 1;
    let open = bytes.get(idx) == Some(&b'[');
    if open {
        idx += 1;
    }

    let tag_len = tags.iter().find_map(|tag| {
        let candidate = text.get(idx..idx + tag.len())?;
        let same = if case_insensitive {
            candidate.eq_ignore_ascii_case(tag)
        } else {
            candidate == *tag
        };
        let boundary = text[idx + tag.len()..]
            .chars()
            .next()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_' || c == '-'));
        (same && boundary).then_some(tag.len())
    })?;
    let tag = &text[idx..idx + tag_len];

    // Attributes run up to `]` or `/]`; a `/` not followed by `]` is attribute text
    let attr_start = idx + tag_len;
    let mut cursor = attr_start;
    let self_closing = loop {
        match bytes.get(cursor)? {
            b']' => break false,
            b'/' if bytes.get(cursor + 1) == Some(&b']') => break true,
            _ => cursor += 1,
        }
    };
    let raw_attributes = &text[attr_start..cursor];
    let opening_end = if self_closing { cursor + 2 } else { cursor + 1 };

    let (content, mut end) = if self_closing {
        (None, opening_end)
    } else {
        match find_closing_tag(text, opening_end, tag, case_insensitive) {
            Some((close_start, close_end)) => (Some(&text[opening_end..close_start]), close_end),
            None => (None, opening_end),
        }
    };

    let close = bytes.get(end) == Some(&b']');
    if close {
        end += 1;
    }

    Some(ShortcodeMatch {
        span: start..end,
        opening: start..opening_end,
        brackets: Brackets { open, close },
        tag,
        raw_attributes,
        self_closing,
        content,
    })
}

/// Locate `[/tag]` at or after `from`, returning its byte range
fn find_closing_tag(
    text: &str,
    from: usize,
    tag: &str,
    case_insensitive: bool,
) -> Option<(usize, usize)> {
    let needle_len = tag.len() + 3;
    let mut pos = from;
    while let Some(rel) = text[pos..].find("[/") {
        let at = pos + rel;
        if let Some(candidate) = text.get(at + 2..at + 2 + tag.len()) {
            let same = if case_insensitive {
                candidate.eq_ignore_ascii_case(tag)
            } else {
                candidate == tag
            };
            if same && text.as_bytes().get(at + 2 + tag.len()) == Some(&b']') {
                return Some((at, at + needle_len));
            }
        }
        pos = at + 2;
    }
    None
}

/// Serialize a shortcode as `[name attrs]content[/name]`, keeping extra brackets.
pub fn to_shortcode_string(
    name: &str,
    attributes: &Attributes,
    content: &str,
    brackets: Brackets,
) -> String {
    let attrs = if attributes.is_empty() {
        String::new()
    } else {
        format!(" {}", to_attribute_string(attributes))
    };
    format!(
        "{open}[{name}{attrs}]{content}[/{name}]{close}",
        open = if brackets.open { "[" } else { "" },
        close = if brackets.close { "]" } else { "" },
    )
}

/// A replacement of one byte range of a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Range<usize>,
    pub replacement: String,
}

/// Apply non-overlapping edits, given in ascending span order, in one pass.
/// Text outside the edited spans is copied byte for byte.
pub fn apply_edits(text: &str, edits: &[Edit]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for edit in edits {
        out.push_str(&text[last..edit.span.start]);
        out.push_str(&edit.replacement);
        last = edit.span.end;
    }
    out.push_str(&text[last..]);
    out
}
