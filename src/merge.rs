//! Merging author-supplied shortcode attributes with the schema defaults.
//!
//! The schema is closed: keys that are not map or marker fields are ignored.

use crate::constants::{
    DEFAULT_GEOCODER, DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_STYLE,
    DEFAULT_ROUTER, DEFAULT_ZOOM,
};
use crate::model::{
    clamp_marker_index, to_bool, to_float, to_int, LatLng, MapConfig, MarkerColor, MarkerConfig,
    MarkerSource,
};
use crate::shortcode::Attributes;

fn get<'a>(attributes: &'a Attributes, key: &str) -> Option<&'a str> {
    attributes.get(key).map(String::as_str)
}

fn non_empty(attributes: &Attributes, key: &str) -> Option<String> {
    get(attributes, key)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Build a map config from partial attributes, with a single default marker.
pub fn merge_map_attributes(partial: &Attributes) -> MapConfig {
    merge_map_attributes_with_markers(partial, vec![merge_marker_attributes(&Attributes::new())])
}

/// Build a map config from partial attributes and an explicit marker list.
///
/// `destination_marker` and `center_marker` are one-based in the markup
/// (`0` disables them); indices outside `markers` become `-1`.
pub fn merge_map_attributes_with_markers(
    partial: &Attributes,
    markers: Vec<MarkerConfig>,
) -> MapConfig {
    let destination = get(partial, "destination_marker").map_or(1, to_int).saturating_sub(1);
    let center = get(partial, "center_marker").map_or(1, to_int).saturating_sub(1);

    MapConfig {
        block_id: get(partial, "block_id").unwrap_or_default().to_string(),
        map_style: get(partial, "map_style")
            .unwrap_or(DEFAULT_MAP_STYLE)
            .to_string(),
        map_style_key: non_empty(partial, "map_style_key"),
        map_height: get(partial, "map_height").map_or(DEFAULT_MAP_HEIGHT, to_int),
        zoom: get(partial, "zoom").map_or(DEFAULT_ZOOM, to_int),
        ctrl_mouse_zoom: get(partial, "ctrl_mouse_zoom").is_some_and(to_bool),
        center: LatLng {
            lat: get(partial, "latitude").map_or(DEFAULT_LATITUDE, to_float),
            lng: get(partial, "longitude").map_or(DEFAULT_LONGITUDE, to_float),
        },
        routing: get(partial, "routing").is_some_and(to_bool),
        router: get(partial, "router").unwrap_or(DEFAULT_ROUTER).to_string(),
        router_key: non_empty(partial, "router_key"),
        geocoder: get(partial, "geocoder")
            .unwrap_or(DEFAULT_GEOCODER)
            .to_string(),
        geocoder_key: non_empty(partial, "geocoder_key"),
        destination_marker_index: clamp_marker_index(destination, markers.len()),
        center_marker_index: clamp_marker_index(center, markers.len()),
        show_attribution: get(partial, "show_attribution").map_or(true, to_bool),
        marker_list: markers,
    }
}

/// Build a marker config from partial attributes.
pub fn merge_marker_attributes(partial: &Attributes) -> MarkerConfig {
    MarkerConfig {
        marker_source: get(partial, "marker_source").map_or(MarkerSource::Address, MarkerSource::from_attribute),
        marker_address: get(partial, "marker_address").unwrap_or_default().to_string(),
        marker_latitude: get(partial, "marker_latitude").map_or(DEFAULT_LATITUDE, to_float),
        marker_longitude: get(partial, "marker_longitude").map_or(DEFAULT_LONGITUDE, to_float),
        marker_center: get(partial, "marker_center").map_or(true, to_bool),
        marker_icon: get(partial, "marker_icon").unwrap_or_default().to_string(),
        marker_color: get(partial, "marker_color").map_or_else(MarkerColor::default, MarkerColor::from_attribute),
        marker_text: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcode::parse_attributes;

    #[test]
    fn test_empty_map_attributes_take_defaults() {
        let config = merge_map_attributes(&Attributes::new());
        assert_eq!(config.zoom, 15);
        assert_eq!(config.map_style, "OpenStreetMap.DE");
        assert_eq!(config.map_height, 50);
        assert_eq!(config.center, LatLng { lat: 52.4679888, lng: 13.3257928 });
        assert!(!config.routing);
        assert!(!config.ctrl_mouse_zoom);
        assert!(config.show_attribution);
        assert_eq!(config.router, "osrmv1");
        assert_eq!(config.geocoder, "nominatim");
        assert_eq!(config.map_style_key, None);
        assert_eq!(config.destination_marker_index, 0);
        assert_eq!(config.center_marker_index, 0);
        assert_eq!(config.marker_list.len(), 1);
        assert_eq!(config.marker_list[0], merge_marker_attributes(&Attributes::new()));
    }

    #[test]
    fn test_given_map_attributes_override_defaults() {
        let attrs = parse_attributes(
            r#"zoom="9" routing="true" map_style="Stadia.StamenToner" map_style_key="k" latitude="48.1" show_attribution="false" unknown="x""#,
        )
        .unwrap();
        let config = merge_map_attributes(&attrs);
        assert_eq!(config.zoom, 9);
        assert!(config.routing);
        assert_eq!(config.map_style, "Stadia.StamenToner");
        assert_eq!(config.map_style_key.as_deref(), Some("k"));
        assert_eq!(config.center.lat, 48.1);
        assert_eq!(config.center.lng, 13.3257928);
        assert!(!config.show_attribution);
    }

    #[test]
    fn test_marker_indices_are_zero_based_and_clamped() {
        let attrs = parse_attributes(r#"destination_marker="0" center_marker="2""#).unwrap();
        let markers = vec![
            merge_marker_attributes(&Attributes::new()),
            merge_marker_attributes(&Attributes::new()),
        ];
        let config = merge_map_attributes_with_markers(&attrs, markers);
        assert_eq!(config.destination_marker_index, -1);
        assert_eq!(config.center_marker_index, 1);

        let config = merge_map_attributes_with_markers(&attrs, Vec::new());
        assert_eq!(config.center_marker_index, -1);
    }

    #[test]
    fn test_extreme_marker_indices_are_disabled() {
        let attrs = parse_attributes(
            r#"destination_marker="-1e300" center_marker="-99999999999999999999""#,
        )
        .unwrap();
        let config = merge_map_attributes(&attrs);
        assert_eq!(config.destination_marker_index, -1);
        assert_eq!(config.center_marker_index, -1);
    }

    #[test]
    fn test_malformed_numbers_degrade_to_zero() {
        let attrs = parse_attributes(r#"zoom="close" latitude="n/a""#).unwrap();
        let config = merge_map_attributes(&attrs);
        assert_eq!(config.zoom, 0);
        assert_eq!(config.center.lat, 0.0);
    }

    #[test]
    fn test_marker_defaults_and_overrides() {
        let defaults = merge_marker_attributes(&Attributes::new());
        assert_eq!(defaults.marker_source, MarkerSource::Address);
        assert_eq!(defaults.marker_color, MarkerColor::DarkBlue);
        assert_eq!(defaults.marker_address, "");
        assert_eq!(defaults.marker_icon, "");
        assert!(defaults.marker_center);

        let attrs = parse_attributes(
            r#"marker_source="gps" marker_latitude="1.25" marker_color="red" marker_icon="home""#,
        )
        .unwrap();
        let marker = merge_marker_attributes(&attrs);
        assert_eq!(marker.marker_source, MarkerSource::Coordinates);
        assert_eq!(marker.marker_latitude, 1.25);
        assert_eq!(marker.marker_color, MarkerColor::Red);
        assert_eq!(marker.marker_icon, "home");
    }
}
