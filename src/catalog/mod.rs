//! Map style catalog built from the provider dataset.
//!
//! Loaded once at startup and read-only afterwards; callers receive it by
//! reference.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::DataSettings;
use crate::error::{EmbedError, Result};

pub mod options;

pub use options::{geocoder_options, router_options, ServiceOption, MAPBOX_STYLES};

const EMBEDDED_PROVIDERS: &str = include_str!("../../data/providers.json");
const EMBEDDED_ICONS: &str = include_str!("../../data/icons.json");

/// Provider whose variants always come from [`MAPBOX_STYLES`]
pub const MAPBOX_PROVIDER: &str = "Mapbox";

/// Retired style ids and their replacements.
///
/// Replacements are never deprecated themselves, so one lookup is enough.
pub const DEPRECATED_STYLES: &[(&str, &str)] = &[
    ("openstreetmap_de", "OpenStreetMap.DE"),
    ("opentopomap", "OpenTopoMap"),
    ("stamen_toner", "Stadia.StamenToner"),
    ("stamen_toner_light", "Stadia.StamenTonerLite"),
    ("stamen_terrain", "Stadia.StamenTerrain"),
    ("stamen_watercolor", "Stadia.StamenWatercolor"),
    ("wikimedia", "OpenStreetMap.DE"),
    ("Stamen.Toner", "Stadia.StamenToner"),
    ("Stamen.TonerLite", "Stadia.StamenTonerLite"),
    ("Stamen.Terrain", "Stadia.StamenTerrain"),
    ("Stamen.Watercolor", "Stadia.StamenWatercolor"),
];

/// Kind of credential a style or service needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dependency {
    ApiKey,
    AccessToken,
}

impl Dependency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dependency::ApiKey => "apikey",
            Dependency::AccessToken => "accesstoken",
        }
    }

    /// Legacy shortcode attribute that carried this credential
    pub fn legacy_attribute(&self) -> &'static str {
        match self {
            Dependency::ApiKey => "api_key",
            Dependency::AccessToken => "access_token",
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dependency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "apikey" => Ok(Dependency::ApiKey),
            "accesstoken" => Ok(Dependency::AccessToken),
            other => Err(format!("unknown dependency `{other}` (expected apikey or accesstoken)")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProviderData {
    #[serde(default)]
    dependency: Option<Dependency>,
    #[serde(default)]
    terms: Option<String>,
    #[serde(default)]
    variants: Option<Vec<String>>,
}

/// One tile provider from the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEntry {
    pub name: String,
    pub dependency: Option<Dependency>,
    pub terms: Option<String>,
    pub variants: Option<Vec<String>>,
}

/// One selectable map style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleEntry {
    #[serde(skip)]
    pub key: String,
    pub label: String,
    pub dependency: Option<Dependency>,
    pub terms: Option<String>,
    pub provider: String,
}

fn read_dataset(path: Option<&Path>, embedded: &'static str) -> Result<(String, String)> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|e| EmbedError::DataLoad {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            Ok((path.display().to_string(), content))
        }
        None => Ok(("<embedded>".to_string(), embedded.to_string())),
    }
}

/// Load the provider dataset from `path`, or the embedded copy when `None`.
pub fn load_providers(path: Option<&Path>) -> Result<Vec<ProviderEntry>> {
    let (origin, content) = read_dataset(path, EMBEDDED_PROVIDERS)?;
    parse_providers(&content, &origin)
}

/// Parse a provider dataset, keeping its order.
///
/// The Mapbox provider's variants are replaced by the static Mapbox style
/// table (and the provider is appended if the dataset lacks it).
pub fn parse_providers(source: &str, origin: &str) -> Result<Vec<ProviderEntry>> {
    let data: IndexMap<String, ProviderData> =
        serde_json::from_str(source).map_err(|e| EmbedError::DataLoad {
            path: origin.to_string(),
            message: e.to_string(),
        })?;

    if data.is_empty() {
        return Err(EmbedError::DataLoad {
            path: origin.to_string(),
            message: "dataset lists no providers".to_string(),
        });
    }

    let mut providers: Vec<ProviderEntry> = data
        .into_iter()
        .map(|(name, provider)| ProviderEntry {
            name,
            dependency: provider.dependency,
            terms: provider.terms,
            variants: provider.variants,
        })
        .collect();

    let mapbox_variants: Vec<String> = MAPBOX_STYLES.iter().map(|(name, _)| name.to_string()).collect();
    match providers.iter_mut().find(|p| p.name == MAPBOX_PROVIDER) {
        Some(mapbox) => mapbox.variants = Some(mapbox_variants),
        None => providers.push(ProviderEntry {
            name: MAPBOX_PROVIDER.to_string(),
            dependency: None,
            terms: None,
            variants: Some(mapbox_variants),
        }),
    }

    debug!("Parsed {} providers from {}", providers.len(), origin);
    Ok(providers)
}

/// Load the icon dataset. The content is passed through to the front-end as is.
pub fn load_icons(path: Option<&Path>) -> Result<serde_json::Value> {
    let (origin, content) = read_dataset(path, EMBEDDED_ICONS)?;
    serde_json::from_str(&content).map_err(|e| EmbedError::DataLoad {
        path: origin,
        message: e.to_string(),
    })
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Expand providers into the flat style registry, in dataset order.
///
/// A provider with variants yields `Provider.VariantWithoutSpaces` entries
/// labelled `Provider Variant`; one without yields a single entry keyed by
/// the provider name.
pub fn expand_styles(providers: &[ProviderEntry]) -> IndexMap<String, StyleEntry> {
    let mut styles = IndexMap::new();
    for provider in providers {
        let display_provider = capitalize(&provider.name);
        match &provider.variants {
            Some(variants) => {
                for variant in variants {
                    let key = format!("{}.{}", provider.name, variant.replace(' ', ""));
                    styles.insert(
                        key.clone(),
                        StyleEntry {
                            key,
                            label: format!("{} {}", provider.name, variant),
                            dependency: provider.dependency,
                            terms: provider.terms.clone(),
                            provider: display_provider.clone(),
                        },
                    );
                }
            }
            None => {
                styles.insert(
                    provider.name.clone(),
                    StyleEntry {
                        key: provider.name.clone(),
                        label: display_provider.clone(),
                        dependency: provider.dependency,
                        terms: provider.terms.clone(),
                        provider: display_provider,
                    },
                );
            }
        }
    }
    styles
}

/// Map a retired style id to its replacement; other ids are returned as is.
pub fn resolve_deprecated(id: &str) -> &str {
    DEPRECATED_STYLES
        .iter()
        .find(|(old, _)| *old == id)
        .map_or(id, |(_, current)| *current)
}

/// Immutable registry of map styles and icons.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    styles: IndexMap<String, StyleEntry>,
    icons: serde_json::Value,
}

impl StyleCatalog {
    /// Build the catalog from the configured datasets (embedded ones by default).
    pub fn load(settings: &DataSettings) -> Result<Self> {
        let providers = load_providers(settings.providers.as_deref())?;
        let icons = load_icons(settings.icons.as_deref())?;
        let catalog = Self::from_providers(&providers, icons);
        info!(
            "Style catalog loaded: {} providers, {} styles",
            providers.len(),
            catalog.styles.len()
        );
        Ok(catalog)
    }

    /// Catalog over the datasets compiled into the crate
    pub fn embedded() -> Result<Self> {
        Self::load(&DataSettings::default())
    }

    pub fn from_providers(providers: &[ProviderEntry], icons: serde_json::Value) -> Self {
        Self {
            styles: expand_styles(providers),
            icons,
        }
    }

    pub fn styles(&self) -> &IndexMap<String, StyleEntry> {
        &self.styles
    }

    pub fn get(&self, key: &str) -> Option<&StyleEntry> {
        self.styles.get(key)
    }

    /// Credential kind the style needs; `None` for unknown or keyless styles
    pub fn dependency_of(&self, key: &str) -> Option<Dependency> {
        self.styles.get(key).and_then(|style| style.dependency)
    }

    /// Style keys needing the given credential kind, in catalog order
    pub fn dependent_styles(&self, dependency: Dependency) -> Vec<&str> {
        self.styles
            .values()
            .filter(|style| style.dependency == Some(dependency))
            .map(|style| style.key.as_str())
            .collect()
    }

    pub fn icons(&self) -> &serde_json::Value {
        &self.icons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(name: &str, variants: Option<&[&str]>) -> ProviderEntry {
        ProviderEntry {
            name: name.to_string(),
            dependency: None,
            terms: None,
            variants: variants.map(|v| v.iter().map(|s| s.to_string()).collect()),
        }
    }

    #[test]
    fn test_expand_styles_with_variants() {
        let styles = expand_styles(&[provider("P", Some(&["A", "B"]))]);
        let keys: Vec<&str> = styles.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["P.A", "P.B"]);
        assert_eq!(styles["P.A"].label, "P A");
        assert_eq!(styles["P.B"].label, "P B");
        assert_eq!(styles["P.B"].provider, "P");
    }

    #[test]
    fn test_expand_styles_strips_spaces_and_capitalizes() {
        let styles = expand_styles(&[
            provider("Stadia", Some(&["Stamen Toner Lite"])),
            provider("openTopoMap", None),
        ]);
        assert_eq!(styles["Stadia.StamenTonerLite"].label, "Stadia Stamen Toner Lite");
        assert_eq!(styles["openTopoMap"].label, "OpenTopoMap");
        assert_eq!(styles["openTopoMap"].provider, "OpenTopoMap");
    }

    #[test]
    fn test_parse_providers_keeps_dataset_order() {
        let source = r#"{"Zeta": {}, "Alpha": {"dependency": "accesstoken", "variants": ["One"]}}"#;
        let providers = parse_providers(source, "test").unwrap();
        let names: Vec<&str> = providers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", MAPBOX_PROVIDER]);
        assert_eq!(providers[1].dependency, Some(Dependency::AccessToken));
    }

    #[test]
    fn test_parse_providers_injects_mapbox_variants() {
        let source = r#"{"Mapbox": {"dependency": "apikey", "variants": ["Old"]}}"#;
        let providers = parse_providers(source, "test").unwrap();
        let variants = providers[0].variants.clone().unwrap();
        assert_eq!(variants, vec!["Streets", "Outdoors", "Light", "Dark", "Satellite"]);
    }

    #[test]
    fn test_parse_providers_rejects_malformed_data() {
        for source in ["not json", "[]", "{}", r#"{"P": {"dependency": "password"}}"#] {
            let err = parse_providers(source, "bad.json").unwrap_err();
            assert!(matches!(err, EmbedError::DataLoad { .. }), "{source}");
        }
    }

    #[test]
    fn test_load_providers_missing_file() {
        let err = load_providers(Some(Path::new("/nonexistent/providers.json"))).unwrap_err();
        assert!(matches!(err, EmbedError::DataLoad { .. }));
    }

    #[test]
    fn test_resolve_deprecated() {
        assert_eq!(resolve_deprecated("stamen_toner"), "Stadia.StamenToner");
        assert_eq!(resolve_deprecated("Stamen.Watercolor"), "Stadia.StamenWatercolor");
        assert_eq!(resolve_deprecated("unknown_id"), "unknown_id");
    }

    #[test]
    fn test_deprecation_table_never_chains() {
        let catalog = StyleCatalog::embedded().unwrap();
        for (_, current) in DEPRECATED_STYLES {
            assert_eq!(resolve_deprecated(current), *current);
            assert!(catalog.get(current).is_some(), "{current} missing from catalog");
        }
    }

    #[test]
    fn test_embedded_catalog_dependencies() {
        let catalog = StyleCatalog::embedded().unwrap();
        assert_eq!(catalog.dependency_of("Mapbox.Streets"), Some(Dependency::ApiKey));
        assert_eq!(catalog.dependency_of("Jawg.Streets"), Some(Dependency::AccessToken));
        assert_eq!(catalog.dependency_of("OpenStreetMap.DE"), None);
        assert_eq!(catalog.dependency_of("missing"), None);

        let tokens = catalog.dependent_styles(Dependency::AccessToken);
        assert_eq!(tokens, vec!["Jawg.Streets", "Jawg.Terrain", "Jawg.Sunny", "Jawg.Dark", "Jawg.Light"]);
        assert!(catalog.icons().is_array());
    }

    #[test]
    fn test_dependency_from_str() {
        assert_eq!("apikey".parse::<Dependency>(), Ok(Dependency::ApiKey));
        assert!("token".parse::<Dependency>().is_err());
    }
}
