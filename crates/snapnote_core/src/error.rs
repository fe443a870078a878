use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for snapnote operations
#[derive(Debug, Error)]
pub enum SnapnoteError {
    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // Frontmatter errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // Clipboard errors
    #[error("No image available: {0}")]
    ImageUnavailable(String),

    // Editing surface errors
    #[error("No active editor available")]
    NoActiveSurface,

    // Template errors (always recovered by the note store)
    #[error("Failed to read template '{path}': {reason}")]
    TemplateRead { path: String, reason: String },

    // Store errors
    #[error("Failed to write '{path}': {source}")]
    StoreWrite {
        path: String,
        source: std::io::Error,
    },

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Not an image: {0}")]
    NotAnImage(String),

    // Config errors
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Unknown config key '{0}'")]
    UnknownConfigKey(String),

    #[error("Invalid value '{value}' for config key '{key}'")]
    InvalidConfigValue { key: String, value: String },

    #[error("{0}")]
    Unknown(String),
}

/// Result type alias for snapnote operations
pub type Result<T> = std::result::Result<T, SnapnoteError>;

impl SnapnoteError {
    /// Name of the error class this error belongs to.
    ///
    /// Store failures of any shape report as `StoreWriteFailure`; everything
    /// without a dedicated class is `Unknown`.
    pub fn kind(&self) -> &'static str {
        match self {
            SnapnoteError::ImageUnavailable(_) => "ImageUnavailable",
            SnapnoteError::NoActiveSurface => "NoActiveSurface",
            SnapnoteError::TemplateRead { .. } => "TemplateReadFailure",
            SnapnoteError::StoreWrite { .. }
            | SnapnoteError::FileWrite { .. }
            | SnapnoteError::AlreadyExists(_) => "StoreWriteFailure",
            _ => "Unknown",
        }
    }

    /// Whether this error means "there was nothing to paste" rather than a failure.
    pub fn is_image_unavailable(&self) -> bool {
        matches!(self, SnapnoteError::ImageUnavailable(_))
    }
}
