//! Output cleaning: remove recognized stale artifacts before emission.
//!
//! Runs to completion before any write of the new build, a hard ordering
//! barrier, not a race. Only files recognized as prior-build artifacts are
//! removed; hand-placed files unrelated to the build survive. A removal
//! failure is fatal build-wide, because a silently inconsistent output
//! directory would drift from the intended state.

use std::path::{Path, PathBuf};

use tracing::info;

use crxpack_config::BuildConfig;

use crate::classify::ASSET_EXTENSIONS;
use crate::{Error, Result};

/// Whether `name` is recognized as an artifact a previous build produced.
pub fn is_stale_artifact(config: &BuildConfig, name: &str) -> bool {
    if name.ends_with(".bundle.js") || name.ends_with(".bundle.js.map") {
        return true;
    }
    if name == crate::assets::MANIFEST_NAME {
        return true;
    }
    if name == format!("{}.html", config.html_entry) {
        return true;
    }
    if config
        .icons
        .iter()
        .any(|icon| icon.file_name().and_then(|n| n.to_str()) == Some(name))
    {
        return true;
    }
    // Emitted asset files keep their source base name, so any file with a
    // recognized asset extension in the output root is build-owned.
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ASSET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Remove every recognized stale artifact from the output directory.
///
/// Creates the directory when absent. Returns the removed paths; one log
/// line is emitted per removal.
///
/// # Errors
///
/// [`Error::Clean`] when a recognized artifact cannot be removed (for
/// example, permission denied).
pub fn clean(config: &BuildConfig) -> Result<Vec<PathBuf>> {
    let output_dir = &config.output_dir;
    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir)?;
        return Ok(Vec::new());
    }

    let mut removed = Vec::new();
    for entry in std::fs::read_dir(output_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !is_stale_artifact(config, name) {
            continue;
        }

        std::fs::remove_file(&path).map_err(|source| Error::Clean {
            path: path.clone(),
            source,
        })?;
        info!(artifact = %path.display(), "removed stale artifact");
        removed.push(path);
    }

    Ok(removed)
}
