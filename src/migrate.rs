//! Rewriting of legacy map shortcodes into the current schema.
//!
//! Legacy maps carried their single marker as inline `marker_*` attributes
//! and their tile credential as `api_key` / `access_token`. The migration
//! moves the marker into a nested marker tag and the credential into
//! `map_style_key`. Every occurrence is rewritten independently; text
//! outside rewritten occurrences is copied unchanged.

use std::borrow::Cow;
use tracing::{debug, warn};

use crate::catalog::{resolve_deprecated, StyleCatalog};
use crate::constants::{marker_tag_for, DEFAULT_MAP_STYLE, LEGACY_TAG_PREFIX, MAP_TAGS};
use crate::error::Result;
use crate::model::to_bool;
use crate::shortcode::{
    apply_edits, find_shortcodes, parse_attributes, to_shortcode_string, Attributes, Brackets,
    Edit, ShortcodeMatch,
};

const MARKER_PREFIX: &str = "marker_";

pub struct Migrator<'c> {
    catalog: &'c StyleCatalog,
}

impl<'c> Migrator<'c> {
    pub fn new(catalog: &'c StyleCatalog) -> Self {
        Self { catalog }
    }

    /// Migrate every legacy map shortcode in `document`.
    ///
    /// Returns the input borrowed when nothing needed rewriting, so an
    /// already migrated document comes back untouched.
    pub fn migrate<'a>(&self, document: &'a str) -> Cow<'a, str> {
        if !document.contains(LEGACY_TAG_PREFIX) {
            return Cow::Borrowed(document);
        }

        let mut edits = Vec::new();
        for occurrence in find_shortcodes(document, MAP_TAGS, false) {
            if occurrence.brackets.is_escaped() {
                debug!("Skipping escaped [{}] at byte {}", occurrence.tag, occurrence.span.start);
                continue;
            }
            match self.migrate_occurrence(&occurrence) {
                Ok(Some(replacement)) => {
                    debug!("Migrated [{}] at byte {}", occurrence.tag, occurrence.span.start);
                    edits.push(Edit {
                        span: occurrence.span.clone(),
                        replacement,
                    });
                }
                Ok(None) => {}
                Err(e) => warn!(
                    "Leaving [{}] at byte {} unmigrated: {}",
                    occurrence.tag, occurrence.span.start, e
                ),
            }
        }

        if edits.is_empty() {
            return Cow::Borrowed(document);
        }
        Cow::Owned(apply_edits(document, &edits))
    }

    /// Migrate a stored post body in place; empty bodies are left alone.
    pub fn migrate_post(&self, content: &mut String) {
        if content.is_empty() {
            return;
        }
        let migrated = match self.migrate(content) {
            Cow::Borrowed(_) => return,
            Cow::Owned(migrated) => migrated,
        };
        *content = migrated;
    }

    /// Replacement text for one occurrence, or `None` if it is already current
    fn migrate_occurrence(&self, occurrence: &ShortcodeMatch<'_>) -> Result<Option<String>> {
        let raw = occurrence.raw_attributes;
        let has_markers = raw.contains(MARKER_PREFIX);
        let has_credentials = raw.contains("api_") || raw.contains("access_");
        if !has_markers && !has_credentials {
            return Ok(None);
        }

        let mut attributes = parse_attributes(raw)?;
        let mut content = Cow::Borrowed(occurrence.content.unwrap_or_default());
        let mut changed = false;

        if let Some(marker_attributes) = extract_marker_attributes(&mut attributes) {
            let marker_tag = marker_tag_for(occurrence.tag).unwrap_or(occurrence.tag);
            content = Cow::Owned(to_shortcode_string(
                marker_tag,
                &marker_attributes,
                &content,
                Brackets::default(),
            ));
            changed = true;
        }

        if migrate_credentials(&mut attributes, self.catalog) {
            changed = true;
        }

        if !changed {
            return Ok(None);
        }
        Ok(Some(to_shortcode_string(
            occurrence.tag,
            &attributes,
            &content,
            occurrence.brackets,
        )))
    }
}

/// Move `marker_*` attributes out of a map's attributes.
///
/// A falsy `marker_center` turns into the map-level `center_marker="0"`.
/// Returns `None` when the map has no marker attributes at all.
fn extract_marker_attributes(attributes: &mut Attributes) -> Option<Attributes> {
    let keys: Vec<String> = attributes
        .keys()
        .filter(|key| key.starts_with(MARKER_PREFIX))
        .cloned()
        .collect();
    if keys.is_empty() {
        return None;
    }

    let mut marker_attributes = Attributes::new();
    for key in keys {
        let Some(value) = attributes.shift_remove(&key) else {
            continue;
        };
        if key == "marker_center" && !to_bool(&value) {
            attributes.insert("center_marker".to_string(), "0".to_string());
        } else {
            marker_attributes.insert(key, value);
        }
    }
    Some(marker_attributes)
}

/// Copy the legacy credential matching the style's dependency into
/// `map_style_key`, removing the attribute it came from.
///
/// Maps that already have a non-empty `map_style_key`, and credentials the
/// style does not use, are left as they are. Returns whether anything changed.
fn migrate_credentials(attributes: &mut Attributes, catalog: &StyleCatalog) -> bool {
    let has_style_key = attributes
        .get("map_style_key")
        .is_some_and(|key| !key.is_empty());
    if has_style_key {
        return false;
    }

    let style = attributes
        .get("map_style")
        .map_or(DEFAULT_MAP_STYLE, String::as_str);
    let Some(dependency) = catalog.dependency_of(resolve_deprecated(style)) else {
        return false;
    };
    let source = dependency.legacy_attribute();
    if !attributes.get(source).is_some_and(|value| !value.is_empty()) {
        return false;
    }

    let Some(credential) = attributes.shift_remove(source) else {
        return false;
    };
    attributes.insert("map_style_key".to_string(), credential);
    true
}
