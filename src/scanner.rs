//! Extraction of marker sub-blocks from map content.
//!
//! Matching is strictly left to right and non-overlapping. A marker nested
//! inside another marker of the same tag is swallowed by the outer one.

use crate::constants::MARKER_TAGS;
use crate::merge::merge_marker_attributes;
use crate::model::MarkerConfig;
use crate::shortcode::{find_shortcodes, parse_attributes_lenient};

/// Raw pieces of one marker occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerMatch<'a> {
    /// Text between the tag name and the opening tag's `]`
    pub attributes: &'a str,
    /// Text after the opening tag up to the next `[`
    pub text: &'a str,
}

/// Find marker tags (any case) in a map's content. Closing tags and escaped
/// `[[...]]` occurrences are skipped.
pub fn extract_markers(fragment: &str) -> Vec<MarkerMatch<'_>> {
    find_shortcodes(fragment, MARKER_TAGS, true)
        .into_iter()
        .filter(|m| !m.brackets.is_escaped())
        .map(|m| {
            let rest = &fragment[m.opening.end..];
            let text = rest.find('[').map_or(rest, |end| &rest[..end]);
            MarkerMatch {
                attributes: m.raw_attributes,
                text,
            }
        })
        .collect()
}

/// Marker configs for every marker in `fragment`, in order.
/// Malformed attribute tokens are skipped; missing fields take marker defaults.
pub fn scan_markers(fragment: &str) -> Vec<MarkerConfig> {
    extract_markers(fragment)
        .into_iter()
        .map(|found| {
            let attributes = parse_attributes_lenient(found.attributes);
            let mut marker = merge_marker_attributes(&attributes);
            if !found.text.is_empty() {
                marker.marker_text = Some(found.text.to_string());
            }
            marker
        })
        .collect()
}
