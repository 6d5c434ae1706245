use indexmap::IndexMap;
use serde::Serialize;

use super::Dependency;

/// Mapbox variant name -> Mapbox style path
pub const MAPBOX_STYLES: &[(&str, &str)] = &[
    ("Streets", "mapbox/streets-v11"),
    ("Outdoors", "mapbox/outdoors-v11"),
    ("Light", "mapbox/light-v10"),
    ("Dark", "mapbox/dark-v10"),
    ("Satellite", "mapbox/satellite-v9"),
];

/// A routing or geocoding backend offered to authors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceOption {
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency: Option<Dependency>,
    pub terms: &'static str,
}

pub fn router_options() -> IndexMap<&'static str, ServiceOption> {
    IndexMap::from([
        (
            "osrmv1",
            ServiceOption {
                label: "OSRM Demo Server",
                dependency: None,
                terms: "https://github.com/Project-OSRM/osrm-backend/wiki/Api-usage-policy",
            },
        ),
        (
            "mapbox",
            ServiceOption {
                label: "Mapbox",
                dependency: Some(Dependency::ApiKey),
                terms: "https://www.mapbox.com/legal/tos/",
            },
        ),
    ])
}

pub fn geocoder_options() -> IndexMap<&'static str, ServiceOption> {
    IndexMap::from([
        (
            "nominatim",
            ServiceOption {
                label: "Nominatim",
                dependency: None,
                terms: "https://operations.osmfoundation.org/policies/nominatim/",
            },
        ),
        (
            "mapbox",
            ServiceOption {
                label: "Mapbox",
                dependency: Some(Dependency::ApiKey),
                terms: "https://www.mapbox.com/legal/tos/",
            },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_GEOCODER, DEFAULT_ROUTER};

    #[test]
    fn test_defaults_are_offered_and_keyless() {
        let routers = router_options();
        let geocoders = geocoder_options();
        assert_eq!(routers.get_index(0).map(|(k, _)| *k), Some(DEFAULT_ROUTER));
        assert_eq!(routers[DEFAULT_ROUTER].dependency, None);
        assert_eq!(geocoders[DEFAULT_GEOCODER].dependency, None);
        assert_eq!(geocoders["mapbox"].dependency, Some(Dependency::ApiKey));
    }
}
