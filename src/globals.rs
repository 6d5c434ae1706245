use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::catalog::{geocoder_options, router_options, StyleCatalog, DEPRECATED_STYLES, MAPBOX_STYLES};
use crate::merge::{merge_map_attributes, merge_marker_attributes};
use crate::shortcode::Attributes;

/// Settings object handed to the front-end map script.
///
/// Map defaults here have destination and center markers switched off,
/// which is what a freshly inserted block starts with.
pub fn client_globals(catalog: &StyleCatalog) -> Value {
    let mut block_defaults = Attributes::new();
    block_defaults.insert("destination_marker".to_string(), "0".to_string());
    block_defaults.insert("center_marker".to_string(), "0".to_string());

    let deprecated: IndexMap<&str, &str> = DEPRECATED_STYLES.iter().copied().collect();
    let mapbox: IndexMap<&str, &str> = MAPBOX_STYLES.iter().copied().collect();

    json!({
        "defaults": merge_map_attributes(&block_defaults).to_attribute_json(),
        "defaults_marker": merge_marker_attributes(&Attributes::new()),
        "deprecated_styles": deprecated,
        "map_styles": catalog.styles(),
        "mapbox_styles": mapbox,
        "routers": router_options(),
        "geocoders": geocoder_options(),
        "icons": catalog.icons(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_globals_shape() {
        let catalog = StyleCatalog::embedded().unwrap();
        let globals = client_globals(&catalog);

        assert_eq!(globals["defaults"]["destination_marker"], 0);
        assert_eq!(globals["defaults"]["center_marker"], 0);
        assert_eq!(globals["defaults"]["zoom"], 15);
        assert_eq!(globals["defaults_marker"]["marker_color"], "dark_blue");
        assert_eq!(globals["defaults_marker"]["marker_icon"], "");
        assert_eq!(globals["deprecated_styles"]["wikimedia"], "OpenStreetMap.DE");
        assert_eq!(globals["map_styles"]["Mapbox.Satellite"]["dependency"], "apikey");
        assert_eq!(globals["map_styles"]["OpenTopoMap"]["label"], "OpenTopoMap");
        assert_eq!(globals["mapbox_styles"]["Dark"], "mapbox/dark-v10");
        assert_eq!(globals["routers"]["osrmv1"]["label"], "OSRM Demo Server");
        assert_eq!(globals["geocoders"]["mapbox"]["dependency"], "apikey");
        assert!(globals["icons"].is_array());
    }

    #[test]
    fn test_map_styles_keep_catalog_order() {
        let catalog = StyleCatalog::embedded().unwrap();
        let globals = client_globals(&catalog);
        let keys: Vec<&String> = globals["map_styles"].as_object().unwrap().keys().collect();
        let expected: Vec<&String> = catalog.styles().keys().collect();
        assert_eq!(keys, expected);
    }
}
