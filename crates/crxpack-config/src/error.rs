//! Error types for configuration resolution and validation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The mode selector carried a value other than development/production.
    #[error("invalid build mode: {0:?} (expected \"development\" or \"production\")")]
    InvalidMode(String),

    /// An entry's source root does not resolve to an existing module.
    #[error("entry source not found for \"{name}\": {}", .path.display())]
    EntryNotFound { name: String, path: PathBuf },

    /// No entries configured: the pipeline has nothing to build.
    #[error("no entry points configured")]
    NoEntries,

    /// A required static input (manifest template, icon, HTML template) is missing.
    #[error("required input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The output directory path exists but is not a directory.
    #[error("output path exists but is not a directory: {}", .0.display())]
    OutputNotADirectory(PathBuf),

    /// Project metadata file was present but not valid JSON.
    #[error("failed to parse project metadata {}: {source}", .path.display())]
    InvalidMetadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
