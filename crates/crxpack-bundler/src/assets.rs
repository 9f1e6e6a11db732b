//! Static asset emission: icon copies and the synthesized manifest.
//!
//! Three independent copy operations plus one transform-copy, idempotent and
//! order-independent relative to each other. Copies use force semantics:
//! an existing file of the same name is overwritten, never skipped.

use crxpack_config::{BuildConfig, ProjectMetadata};

use crate::entries::OutputArtifact;
use crate::manifest;
use crate::{Error, Result};

/// Output file name of the synthesized manifest.
pub const MANIFEST_NAME: &str = "manifest.json";

/// Stage the verbatim icon copies.
pub fn collect_icons(config: &BuildConfig) -> Result<Vec<OutputArtifact>> {
    config
        .icons
        .iter()
        .map(|icon| {
            let bytes = std::fs::read(icon)
                .map_err(|e| Error::transform(icon, format!("failed to read icon: {e}")))?;
            let name = icon
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| Error::transform(icon, "icon has no usable file name"))?;
            Ok(OutputArtifact::new(config, name, bytes))
        })
        .collect()
}

/// Stage the transform-copy of the manifest template.
pub fn collect_manifest(
    config: &BuildConfig,
    metadata: &ProjectMetadata,
) -> Result<OutputArtifact> {
    let bytes = manifest::synthesize(&config.manifest_template, metadata)?;
    Ok(OutputArtifact::new(config, MANIFEST_NAME, bytes))
}
