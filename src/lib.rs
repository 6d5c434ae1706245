//! Map embed shortcodes: parsing, legacy migration, normalization and rendering.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod escape;
pub mod globals;
pub mod logging;
pub mod merge;
pub mod migrate;
pub mod model;
pub mod render;
pub mod sanitize;
pub mod scanner;
pub mod shortcode;

// Re-export commonly used types
pub use catalog::{Dependency, StyleCatalog, StyleEntry};
pub use error::{EmbedError, Result};
pub use migrate::Migrator;
pub use model::{MapConfig, MarkerConfig};
pub use render::Renderer;
