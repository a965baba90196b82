//! Error types for configuration and seed loading.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration or seed loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unknown file type: {0}")]
    UnknownFileType(String),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("Failed to list files: {0}")]
    Glob(#[from] glob::GlobError),
    #[error("No seed files match '{0}'")]
    NoSeedFiles(String),
    #[error("Record #{index} of collection '{collection}' has no string or integer id")]
    InvalidSeedRecord { collection: String, index: usize },
    #[error("Collection '{collection}' contains id '{id}' more than once")]
    DuplicateSeedId { collection: String, id: String },
}
