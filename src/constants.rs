/// Shortcode tag names and schema defaults shared across the crate.
/// Tag names are part of stored documents and must never change.

// Map tags (plain shortcode and page-builder element)
pub const MAP_TAG: &str = "sbs_openstreetmap";
pub const WPB_MAP_TAG: &str = "sbs_wpb_openstreetmap";

// Marker tags nested inside a map
pub const MARKER_TAG: &str = "sbs_marker";
pub const WPB_MARKER_TAG: &str = "sbs_wpb_marker";

pub const MAP_TAGS: &[&str] = &[WPB_MAP_TAG, MAP_TAG];
pub const MARKER_TAGS: &[&str] = &[WPB_MARKER_TAG, MARKER_TAG];

/// Every migratable tag starts with this; documents without it are never scanned
pub const LEGACY_TAG_PREFIX: &str = "[sbs";

/// Map tag -> marker tag synthesized when inline marker attributes are migrated
pub const MIGRATION_SHORTCODES: &[(&str, &str)] =
    &[(WPB_MAP_TAG, WPB_MARKER_TAG), (MAP_TAG, MARKER_TAG)];

/// Element id prefix of a rendered map block
pub const BLOCK_ID_PREFIX: &str = "sbs-openstreetmap-block-";

// Map defaults
pub const DEFAULT_MAP_STYLE: &str = "OpenStreetMap.DE";
pub const DEFAULT_MAP_HEIGHT: i64 = 50;
pub const DEFAULT_ZOOM: i64 = 15;
pub const DEFAULT_LATITUDE: f64 = 52.4679888;
pub const DEFAULT_LONGITUDE: f64 = 13.3257928;
pub const DEFAULT_ROUTER: &str = "osrmv1";
pub const DEFAULT_GEOCODER: &str = "nominatim";

/// Look up the marker tag a map tag migrates its inline marker attributes into
pub fn marker_tag_for(map_tag: &str) -> Option<&'static str> {
    MIGRATION_SHORTCODES
        .iter()
        .find(|(map, _)| *map == map_tag)
        .map(|(_, marker)| *marker)
}
