use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load dataset {path}: {message}")]
    DataLoad { path: String, message: String },

    #[error("Malformed shortcode attributes: {message}")]
    AttributeParse { message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EmbedError>;
