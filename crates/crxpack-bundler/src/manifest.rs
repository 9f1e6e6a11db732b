//! Manifest synthesis: template plus project metadata.
//!
//! The merge is a pure function over parsed documents, independently
//! testable without the copy machinery: `description` and `version` from
//! project metadata are laid *underneath* the template, so template keys win
//! every tie. Read once, transformed once, written once per build.

use std::path::Path;

use serde_json::{Map, Value};

use crxpack_config::ProjectMetadata;

use crate::{Error, Result};

/// Overlay `description`/`version` underneath the template's own keys.
pub fn merge_manifest(template: Map<String, Value>, metadata: &ProjectMetadata) -> Map<String, Value> {
    let mut merged = Map::new();
    if let Some(description) = &metadata.description {
        merged.insert("description".to_string(), Value::from(description.clone()));
    }
    if let Some(version) = &metadata.version {
        merged.insert("version".to_string(), Value::from(version.clone()));
    }
    for (key, value) in template {
        merged.insert(key, value);
    }
    merged
}

/// Read the template, merge, and serialize the manifest output.
///
/// # Errors
///
/// [`Error::ManifestParse`] if the template is not a valid JSON object;
/// manifest corruption must not produce a partially-written package, so this
/// is fatal build-wide.
pub fn synthesize(template_path: &Path, metadata: &ProjectMetadata) -> Result<Vec<u8>> {
    let text = std::fs::read_to_string(template_path)?;
    let template: Map<String, Value> =
        serde_json::from_str(&text).map_err(|source| Error::ManifestParse {
            path: template_path.to_path_buf(),
            source,
        })?;

    let merged = merge_manifest(template, metadata);
    let mut bytes = serde_json::to_vec_pretty(&Value::Object(merged)).map_err(|source| {
        Error::ManifestParse {
            path: template_path.to_path_buf(),
            source,
        }
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}
