use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::json;

/// Leading numeric prefix of a string, e.g. `"15px"` -> `15`
static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("numeric prefix pattern compiles")
});

/// Best-effort float coercion: the leading numeric part, or `0.0`
pub fn to_float(value: &str) -> f64 {
    NUMERIC_PREFIX
        .find(value)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Best-effort integer coercion (truncating), or `0`
pub fn to_int(value: &str) -> i64 {
    to_float(value).trunc() as i64
}

/// `1`, `true`, `on` and `yes` (any case) are true; everything else is false
pub fn to_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

/// How a marker's position is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSource {
    Address,
    Coordinates,
}

impl MarkerSource {
    /// `"address"` selects geocoding; any other value means coordinates
    pub fn from_attribute(value: &str) -> Self {
        if value == "address" {
            MarkerSource::Address
        } else {
            MarkerSource::Coordinates
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerSource::Address => "address",
            MarkerSource::Coordinates => "coordinates",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerColor {
    Red,
    White,
    #[default]
    DarkBlue,
    Green,
    Black,
    Orange,
    Yellow,
}

impl MarkerColor {
    pub const ALL: [MarkerColor; 7] = [
        MarkerColor::Red,
        MarkerColor::White,
        MarkerColor::DarkBlue,
        MarkerColor::Green,
        MarkerColor::Black,
        MarkerColor::Orange,
        MarkerColor::Yellow,
    ];

    /// Unknown color names fall back to the default color
    pub fn from_attribute(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|color| color.as_str() == value)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerColor::Red => "red",
            MarkerColor::White => "white",
            MarkerColor::DarkBlue => "dark_blue",
            MarkerColor::Green => "green",
            MarkerColor::Black => "black",
            MarkerColor::Orange => "orange",
            MarkerColor::Yellow => "yellow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A single marker inside a map. Serializes with its attribute names, which
/// is the shape the front-end script reads from `data-marker-list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerConfig {
    pub marker_source: MarkerSource,
    pub marker_address: String,
    pub marker_latitude: f64,
    pub marker_longitude: f64,
    /// Legacy flag, only consulted by the migration
    pub marker_center: bool,
    /// Empty when the marker uses the default pin
    pub marker_icon: String,
    pub marker_color: MarkerColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_text: Option<String>,
}

impl MarkerConfig {
    /// Human-readable position shown in the rendered marker element
    pub fn summary(&self) -> String {
        match self.marker_source {
            MarkerSource::Address => self.marker_address.clone(),
            MarkerSource::Coordinates => format!(
                "lat: {}, lng: {}",
                self.marker_latitude, self.marker_longitude
            ),
        }
    }
}

/// Normalized map block.
///
/// Marker indices are zero-based positions in `marker_list`, or `-1` for none.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub block_id: String,
    pub map_style: String,
    pub map_style_key: Option<String>,
    /// Container height as a percentage of its width
    pub map_height: i64,
    pub zoom: i64,
    pub ctrl_mouse_zoom: bool,
    pub center: LatLng,
    pub routing: bool,
    pub router: String,
    pub router_key: Option<String>,
    pub geocoder: String,
    pub geocoder_key: Option<String>,
    pub destination_marker_index: i64,
    pub center_marker_index: i64,
    pub show_attribution: bool,
    pub marker_list: Vec<MarkerConfig>,
}

impl MapConfig {
    /// Attribute-schema view used by the front-end defaults object.
    /// Marker indices are written back one-based, `0` meaning none.
    pub fn to_attribute_json(&self) -> serde_json::Value {
        json!({
            "block_id": self.block_id,
            "map_style": self.map_style,
            "map_style_key": self.map_style_key,
            "map_height": self.map_height,
            "zoom": self.zoom,
            "ctrl_mouse_zoom": self.ctrl_mouse_zoom,
            "latitude": self.center.lat,
            "longitude": self.center.lng,
            "routing": self.routing,
            "destination_marker": self.destination_marker_index + 1,
            "router": self.router,
            "router_key": self.router_key,
            "show_attribution": self.show_attribution,
            "geocoder": self.geocoder,
            "geocoder_key": self.geocoder_key,
            "center_marker": self.center_marker_index + 1,
            "marker_list": self.marker_list,
        })
    }
}

/// Keep an index only if it points into a list of `len` items
pub fn clamp_marker_index(index: i64, len: usize) -> i64 {
    if index >= 0 && (index as usize) < len {
        index
    } else {
        -1
    }
}
