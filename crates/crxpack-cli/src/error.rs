//! Error handling for the crxpack CLI.
//!
//! A hierarchical error type system using `thiserror`: domain errors from
//! the config and bundler crates convert automatically via `#[from]`, and
//! [`cli_error_to_miette`] turns the result into a diagnostic report for the
//! terminal. Every fatal condition ends the process with a non-zero exit and
//! a human-readable cause.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (invalid mode, missing entry, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] crxpack_config::ConfigError),

    /// Pipeline errors (transform failures, manifest corruption, cleanup)
    #[error("Build error: {0}")]
    Build(#[from] crxpack_bundler::Error),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An explicitly requested config file doesn't exist
    #[error("Config file not found: {}", .0.display())]
    ConfigFileNotFound(PathBuf),

    /// The config file exists but is not valid JSON
    #[error("Invalid config file {}: {source}", .path.display())]
    InvalidConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert a [`CliError`] to a miette report with an actionable hint where
/// one exists.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match &err {
        CliError::ConfigFileNotFound(path) => miette::miette!(
            help = "Create a crxpack.config.json or drop the --config flag",
            "Config file not found: {}",
            path.display()
        ),
        CliError::InvalidConfigFile { path, source } => miette::miette!(
            help = "Check the file for JSON syntax errors",
            "Invalid config file {}: {}",
            path.display(),
            source
        ),
        CliError::Config(config_err) => miette::miette!(
            help = "Check entry paths and the NODE_ENV / --mode value",
            "Configuration error: {}",
            config_err
        ),
        CliError::Build(crxpack_bundler::Error::Resolve { specifier, importer }) => {
            miette::miette!(
                help = "Check that the file exists and the specifier is correct",
                "Failed to resolve \"{}\" imported from {}",
                specifier,
                importer.display()
            )
        }
        _ => miette::miette!("{}", err),
    }
}
