//! Project metadata merged into the extension manifest.
//!
//! The `description` and `version` fields come from outside the pipeline:
//! the project's `package.json` when present, otherwise the
//! `npm_package_description` / `npm_package_version` variables a package
//! manager exports into build scripts.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// External metadata overlaid underneath the manifest template's own keys.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectMetadata {
    pub description: Option<String>,
    pub version: Option<String>,
}

impl ProjectMetadata {
    /// Load metadata from `<project_root>/package.json`.
    ///
    /// A missing file yields empty metadata; a present but unparseable file
    /// is an error (corrupt metadata must not silently produce an empty
    /// manifest).
    pub fn from_package_json(project_root: &Path) -> Result<Self> {
        let path = project_root.join("package.json");
        if !path.is_file() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)?;
        serde_json::from_str(&text).map_err(|source| ConfigError::InvalidMetadata { path, source })
    }

    /// Fill unset fields from `npm_package_*` process variables.
    pub fn with_env_fallback(mut self) -> Self {
        if self.description.is_none() {
            self.description = std::env::var("npm_package_description").ok();
        }
        if self.version.is_none() {
            self.version = std::env::var("npm_package_version").ok();
        }
        self
    }
}
