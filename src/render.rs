//! HTML rendering of map and marker shortcodes.

use tracing::debug;
use uuid::Uuid;

use crate::catalog::{resolve_deprecated, StyleCatalog};
use crate::constants::{BLOCK_ID_PREFIX, MAP_TAGS, MARKER_TAGS};
use crate::escape::{escape_attr, escape_html};
use crate::merge::{merge_map_attributes_with_markers, merge_marker_attributes};
use crate::migrate::Migrator;
use crate::model::{MapConfig, MarkerConfig};
use crate::sanitize::sanitize_post_html;
use crate::scanner::scan_markers;
use crate::shortcode::{
    apply_edits, find_shortcodes, parse_attributes_lenient, Attributes, Brackets, Edit,
};

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Render the map container. `inner_html` must already be sanitized.
pub fn render_map_markup(config: &MapConfig, inner_html: &str) -> String {
    // Serializing plain strings, numbers and enums cannot fail
    let marker_list = serde_json::to_string(&config.marker_list).unwrap_or_else(|_| "[]".to_string());
    format!(
        concat!(
            r#"<div id="{id}" class="sbs_openstreetmap_module""#,
            r#" data-map-style="{map_style}""#,
            r#" data-map-style-key="{map_style_key}""#,
            r#" data-zoom="{zoom}""#,
            r#" data-ctrl-mouse-zoom="{ctrl_mouse_zoom}""#,
            r#" data-latitude="{latitude:.6}""#,
            r#" data-longitude="{longitude:.6}""#,
            r#" data-routing="{routing}""#,
            r#" data-destination-marker="{destination_marker}""#,
            r#" data-router="{router}""#,
            r#" data-router-key="{router_key}""#,
            r#" data-show-attribution="{show_attribution}""#,
            r#" data-geocoder="{geocoder}""#,
            r#" data-geocoder-key="{geocoder_key}""#,
            r#" data-center-marker="{center_marker}""#,
            r#" data-marker-list="{marker_list}">"#,
            r#"<div class="sbs_openstreetmap_container" style="padding-bottom: {map_height}%"></div>"#,
            r#"<div class="marker_list">{inner}</div>"#,
            "</div>"
        ),
        id = escape_attr(&format!("{}{}", BLOCK_ID_PREFIX, config.block_id)),
        map_style = escape_attr(&config.map_style),
        map_style_key = escape_attr(config.map_style_key.as_deref().unwrap_or_default()),
        zoom = config.zoom,
        ctrl_mouse_zoom = bool_str(config.ctrl_mouse_zoom),
        latitude = config.center.lat,
        longitude = config.center.lng,
        routing = bool_str(config.routing),
        destination_marker = config.destination_marker_index,
        router = escape_attr(&config.router),
        router_key = escape_attr(config.router_key.as_deref().unwrap_or_default()),
        show_attribution = bool_str(config.show_attribution),
        geocoder = escape_attr(&config.geocoder),
        geocoder_key = escape_attr(config.geocoder_key.as_deref().unwrap_or_default()),
        center_marker = config.center_marker_index,
        marker_list = escape_attr(&marker_list),
        map_height = config.map_height,
        inner = inner_html,
    )
}

/// Render one marker element with its popup text and position summary.
pub fn render_marker_markup(config: &MarkerConfig, popup_text: &str) -> String {
    format!(
        concat!(
            r#"<div class="marker_element""#,
            r#" data-marker-source="{source}""#,
            r#" data-marker-address="{address}""#,
            r#" data-marker-latitude="{latitude:.6}""#,
            r#" data-marker-longitude="{longitude:.6}""#,
            r#" data-marker-icon="{icon}""#,
            r#" data-marker-color="{color}""#,
            r#" data-marker-text="{text}">"#,
            r#"Marker <span class="marker_number"></span> ({summary})</div>"#
        ),
        source = config.marker_source.as_str(),
        address = escape_attr(&config.marker_address),
        latitude = config.marker_latitude,
        longitude = config.marker_longitude,
        icon = escape_attr(&config.marker_icon),
        color = config.marker_color.as_str(),
        text = escape_attr(popup_text),
        summary = escape_html(&config.summary()),
    )
}

/// Expands map shortcodes in documents into HTML.
pub struct Renderer<'c> {
    catalog: &'c StyleCatalog,
    migrate: bool,
}

impl<'c> Renderer<'c> {
    /// `migrate` runs the legacy migration before expanding shortcodes
    pub fn new(catalog: &'c StyleCatalog, migrate: bool) -> Self {
        Self { catalog, migrate }
    }

    /// Render every map shortcode in `document`. Escaped `[[...]]` shortcodes
    /// lose one pair of brackets; all other text is copied unchanged.
    /// Malformed attribute tokens are skipped and the rest of the tag is used.
    pub fn render_document(&self, document: &str) -> String {
        let document = if self.migrate {
            Migrator::new(self.catalog).migrate(document)
        } else {
            document.into()
        };

        let edits: Vec<Edit> = find_shortcodes(&document, MAP_TAGS, false)
            .into_iter()
            .map(|found| {
                let replacement = if found.brackets.is_escaped() {
                    document[found.span.start + 1..found.span.end - 1].to_string()
                } else {
                    let attributes = parse_attributes_lenient(found.raw_attributes);
                    let html = self.render_map_shortcode(&attributes, found.content);
                    wrap_brackets(found.brackets, &html)
                };
                Edit {
                    span: found.span,
                    replacement,
                }
            })
            .collect();

        debug!("Rendered {} map shortcodes", edits.len());
        apply_edits(&document, &edits)
    }

    /// Render one map shortcode from its attributes and content.
    pub fn render_map_shortcode(&self, attributes: &Attributes, content: Option<&str>) -> String {
        let content = content.unwrap_or_default();
        let mut config = merge_map_attributes_with_markers(attributes, scan_markers(content));
        config.map_style = resolve_deprecated(&config.map_style).to_string();
        if config.block_id.is_empty() {
            config.block_id = Uuid::new_v4().simple().to_string();
        }
        if config.map_style_key.is_some() && self.catalog.dependency_of(&config.map_style).is_none() {
            debug!("Style {} does not use the configured map_style_key", config.map_style);
        }

        let inner = sanitize_post_html(&expand_markers(content));
        render_map_markup(&config, &inner)
    }
}

/// Put back a one-sided extra bracket the author wrote around a shortcode
fn wrap_brackets(brackets: Brackets, html: &str) -> String {
    format!(
        "{}{}{}",
        if brackets.open { "[" } else { "" },
        html,
        if brackets.close { "]" } else { "" }
    )
}

/// Replace marker shortcodes in map content with rendered marker elements
fn expand_markers(content: &str) -> String {
    let edits: Vec<Edit> = find_shortcodes(content, MARKER_TAGS, false)
        .into_iter()
        .map(|found| {
            let replacement = if found.brackets.is_escaped() {
                content[found.span.start + 1..found.span.end - 1].to_string()
            } else {
                let attributes = parse_attributes_lenient(found.raw_attributes);
                let marker = merge_marker_attributes(&attributes);
                let html = render_marker_markup(&marker, found.content.unwrap_or_default());
                wrap_brackets(found.brackets, &html)
            };
            Edit {
                span: found.span,
                replacement,
            }
        })
        .collect();
    apply_edits(content, &edits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_map_attributes;
    use crate::model::MarkerSource;

    fn catalog() -> StyleCatalog {
        StyleCatalog::embedded().unwrap()
    }

    #[test]
    fn test_render_map_markup_formats_fields() {
        let mut config = merge_map_attributes(&Attributes::new());
        config.block_id = "abc".to_string();
        config.map_style_key = Some(r#"k"ey"#.to_string());
        let html = render_map_markup(&config, "<p>x</p>");
        assert!(html.starts_with(r#"<div id="sbs-openstreetmap-block-abc" class="sbs_openstreetmap_module""#));
        assert!(html.contains(r#"data-map-style="OpenStreetMap.DE""#));
        assert!(html.contains(r#"data-map-style-key="k&quot;ey""#));
        assert!(html.contains(r#"data-zoom="15""#));
        assert!(html.contains(r#"data-latitude="52.467989""#));
        assert!(html.contains(r#"data-longitude="13.325793""#));
        assert!(html.contains(r#"data-routing="false""#));
        assert!(html.contains(r#"data-show-attribution="true""#));
        assert!(html.contains(r#"data-destination-marker="0""#));
        assert!(html.contains(r#"data-router-key="""#));
        assert!(html.contains(r#"style="padding-bottom: 50%""#));
        assert!(html.contains(r#"data-marker-list="[{&quot;marker_source&quot;:&quot;address&quot;"#));
        assert!(html.ends_with(r#"<div class="marker_list"><p>x</p></div></div>"#));
    }

    #[test]
    fn test_render_marker_markup_summaries() {
        let mut marker = merge_marker_attributes(&Attributes::new());
        marker.marker_address = "Unter den Linden 1 & 2".to_string();
        let html = render_marker_markup(&marker, "Say \"hi\"");
        assert!(html.contains(r#"data-marker-source="address""#));
        assert!(html.contains(r#"data-marker-text="Say &quot;hi&quot;""#));
        assert!(html.contains(r#"data-marker-color="dark_blue""#));
        assert!(html.ends_with("(Unter den Linden 1 &amp; 2)</div>"));

        marker.marker_source = MarkerSource::Coordinates;
        marker.marker_latitude = 48.5;
        marker.marker_longitude = 9.25;
        let html = render_marker_markup(&marker, "");
        assert!(html.contains(r#"data-marker-latitude="48.500000""#));
        assert!(html.ends_with("(lat: 48.5, lng: 9.25)</div>"));
    }

    #[test]
    fn test_render_document_expands_maps_and_markers() {
        let catalog = catalog();
        let doc = concat!(
            "<p>Before</p>",
            r#"[sbs_openstreetmap block_id="b1" map_style="stamen_toner" destination_marker="2"]"#,
            r#"[sbs_marker marker_address="A"]First[/sbs_marker]"#,
            r#"[sbs_marker marker_source="coordinates" marker_latitude="1" marker_longitude="2"]Second[/sbs_marker]"#,
            "[/sbs_openstreetmap]",
            "<p>After</p>"
        );
        let html = Renderer::new(&catalog, true).render_document(doc);
        assert!(html.starts_with(r#"<p>Before</p><div id="sbs-openstreetmap-block-b1""#));
        assert!(html.ends_with("</div><p>After</p>"));
        assert!(html.contains(r#"data-map-style="Stadia.StamenToner""#));
        assert!(html.contains(r#"data-destination-marker="1""#));
        assert_eq!(html.matches(r#"class="marker_element""#).count(), 2);
        assert!(html.contains("(lat: 1, lng: 2)"));
        assert!(!html.contains("[sbs_marker"));
    }

    #[test]
    fn test_render_document_migrates_legacy_maps() {
        let catalog = catalog();
        let doc = r#"[sbs_openstreetmap block_id="m" marker_address="Berlin"]Popup[/sbs_openstreetmap]"#;
        let html = Renderer::new(&catalog, true).render_document(doc);
        assert!(html.contains(r#"data-marker-address="Berlin""#));
        assert!(html.contains(r#"data-marker-text="Popup""#));
        assert!(html.contains(r#"data-destination-marker="0""#));

        let html = Renderer::new(&catalog, false).render_document(doc);
        assert!(!html.contains("marker_element"));
        assert!(html.contains(r#"data-destination-marker="-1""#));
    }

    #[test]
    fn test_render_document_unescapes_escaped_shortcodes() {
        let catalog = catalog();
        let html = Renderer::new(&catalog, true).render_document("Type [[sbs_openstreetmap]] to embed");
        assert_eq!(html, "Type [sbs_openstreetmap] to embed");
    }

    #[test]
    fn test_one_sided_brackets_are_kept() {
        let catalog = catalog();
        let renderer = Renderer::new(&catalog, false);

        let html = renderer.render_document(r#"x [[sbs_openstreetmap block_id="b"][/sbs_openstreetmap]"#);
        assert!(html.starts_with(r#"x [<div id="sbs-openstreetmap-block-b""#));

        let html = renderer.render_document(
            r#"[sbs_openstreetmap block_id="b"][[sbs_marker marker_address="A"]Hi[/sbs_marker][/sbs_openstreetmap]"#,
        );
        assert!(html.contains(r#"<div class="marker_list">[<div class="marker_element""#));
    }

    #[test]
    fn test_malformed_token_keeps_other_attributes() {
        let catalog = catalog();
        let html = Renderer::new(&catalog, false)
            .render_document(r#"[sbs_openstreetmap block_id="b" title="oops zoom="7"][/sbs_openstreetmap]"#);
        assert!(html.contains(r#"id="sbs-openstreetmap-block-b""#));
        assert!(html.contains(r#"data-zoom="7""#));
    }

    #[test]
    fn test_extreme_center_marker_still_renders() {
        let catalog = catalog();
        let html = Renderer::new(&catalog, false).render_document(
            r#"[sbs_openstreetmap center_marker="-99999999999999999999"][/sbs_openstreetmap]"#,
        );
        assert!(html.contains(r#"data-center-marker="-1""#));
    }

    #[test]
    fn test_empty_block_id_is_generated() {
        let catalog = catalog();
        let html = Renderer::new(&catalog, false).render_map_shortcode(&Attributes::new(), None);
        let id_start = html.find(BLOCK_ID_PREFIX).unwrap() + BLOCK_ID_PREFIX.len();
        let id: String = html[id_start..].chars().take_while(|c| *c != '"').collect();
        assert_eq!(id.len(), 32);
    }
}
