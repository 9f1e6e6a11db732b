//! # crxpack-bundler
//!
//! Build pipeline core for the crxpack extension bundler.
//!
//! Compiles a multi-surface browser-extension source tree (popup, background,
//! editor) into a deployable bundle directory: multi-entry module resolution
//! and transformation on the oxc toolchain, asset classification and
//! emission, and manifest synthesis by merging project metadata into a static
//! template.
//!
//! ## Quick Start
//!
//! ```no_run
//! use crxpack_bundler::pipeline;
//! use crxpack_config::{BuildConfig, ProjectMetadata, environment};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = Path::new(".");
//! let env = environment::resolve(root, std::env::var("NODE_ENV").ok().as_deref())?;
//! let config = BuildConfig::for_project(root, env);
//! let metadata = ProjectMetadata::from_package_json(root)?.with_env_fallback();
//!
//! let report = pipeline::build(&config, &metadata)?;
//! for artifact in &report.artifacts {
//!     println!("wrote {}", artifact.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The pipeline is all-or-nothing: every fatal condition aborts the whole
//! build, and success is reported only once every artifact is on disk.

pub mod assets;
pub mod classify;
pub mod clean;
pub mod entries;
pub mod graph;
pub mod html;
pub mod manifest;
pub mod optimize;
pub mod pipeline;
pub mod resolver;
pub mod transform;

use std::path::PathBuf;

pub use classify::ContentType;
pub use entries::OutputArtifact;
pub use optimize::OptimizationPreset;
pub use pipeline::{BuildReport, build};

/// Error types for pipeline operations.
///
/// All variants are fatal for the build: correctness depends on outputs being
/// all-or-nothing, so no error is downgraded to a warning.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration surfaced below the config crate's own checks.
    #[error("configuration error: {0}")]
    Config(#[from] crxpack_config::ConfigError),

    /// A module failed to parse or transform; carries the offending path.
    #[error("transform error in {}: {message}", .path.display())]
    Transform { path: PathBuf, message: String },

    /// A module specifier resolved to nothing.
    #[error("failed to resolve \"{specifier}\" imported from {}", .importer.display())]
    Resolve {
        specifier: String,
        importer: PathBuf,
    },

    /// The manifest template was not valid structured data.
    #[error("manifest template {} is not valid JSON: {source}", .path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A stale artifact could not be removed; the output directory would
    /// drift from the intended state if the build proceeded.
    #[error("failed to remove stale artifact {}: {source}", .path.display())]
    Clean {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A write into the output directory failed after cleaning; the caller
    /// must treat the directory as a partial build.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Attach an offending module path to a transform-stage message.
    pub fn transform(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Transform {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
