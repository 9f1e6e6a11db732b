//! Build orchestration.
//!
//! One orchestration thread coordinates the phases; per-module work runs on
//! the rayon pool. Ordering: validate (before any write), clean (hard
//! barrier), compile everything in memory, then emit. Compiling fully before
//! emitting keeps the build all-or-nothing: a transform failure aborts with
//! the output directory cleaned but never half-written, and that partial
//! state is surfaced as an error to the invoker, not accepted silently.

use std::path::PathBuf;

use indexmap::IndexMap;
use rayon::join;
use tracing::{debug, info};

use crxpack_config::{BuildConfig, Mode, ProjectMetadata};

use crate::entries::{self, OutputArtifact};
use crate::optimize::OptimizationPreset;
use crate::resolver::ModuleResolver;
use crate::{Error, Result, assets, clean, html};

/// Summary of one emitted artifact.
#[derive(Debug, Clone)]
pub struct ArtifactReport {
    pub name: String,
    pub path: PathBuf,
    pub size: usize,
}

/// What a completed build produced.
#[derive(Debug)]
pub struct BuildReport {
    pub mode: Mode,
    pub removed: Vec<PathBuf>,
    pub artifacts: Vec<ArtifactReport>,
}

/// Run the whole pipeline for one configuration.
///
/// Success means every artifact is on disk and the manifest merged validly;
/// every fatal condition returns an error naming a human-readable cause.
pub fn build(config: &BuildConfig, metadata: &ProjectMetadata) -> Result<BuildReport> {
    config.validate().map_err(Error::Config)?;

    // Hard barrier: cleaning completes before any write begins.
    let removed = clean::clean(config)?;

    let resolver = ModuleResolver::new(config);
    let preset = OptimizationPreset::for_mode(config.mode);
    debug!(mode = %config.mode, "build configuration resolved");

    // The composer references only the designated entry's bundle names and
    // runs independently of entry compilation.
    let shell_scripts: Vec<String> = config
        .entries
        .keys()
        .filter(|name| **name == config.html_entry)
        .map(|name| entries::bundle_name(name))
        .collect();

    let (entry_artifacts, static_artifacts) = join(
        || entries::map_entries(config, &resolver, preset),
        || -> Result<Vec<OutputArtifact>> {
            let mut artifacts = assets::collect_icons(config)?;
            artifacts.push(assets::collect_manifest(config, metadata)?);
            artifacts.extend(html::compose(config, &shell_scripts)?);
            Ok(artifacts)
        },
    );

    let staged = stage(entry_artifacts?.into_iter().chain(static_artifacts?))?;

    let mut reports = Vec::with_capacity(staged.len());
    for artifact in staged.values() {
        std::fs::write(&artifact.path, &artifact.bytes).map_err(|source| Error::Write {
            path: artifact.path.clone(),
            source,
        })?;
        info!(artifact = %artifact.name, bytes = artifact.bytes.len(), "wrote artifact");
        reports.push(ArtifactReport {
            name: artifact.name.clone(),
            path: artifact.path.clone(),
            size: artifact.bytes.len(),
        });
    }

    Ok(BuildReport {
        mode: config.mode,
        removed,
        artifacts: reports,
    })
}

/// Enforce the disjoint output-namespace invariant while deduplicating
/// identical emissions (the same asset imported from several entry graphs).
fn stage(artifacts: impl Iterator<Item = OutputArtifact>) -> Result<IndexMap<String, OutputArtifact>> {
    let mut staged: IndexMap<String, OutputArtifact> = IndexMap::new();
    for artifact in artifacts {
        match staged.get(&artifact.name) {
            None => {
                staged.insert(artifact.name.clone(), artifact);
            }
            Some(existing) if existing.bytes == artifact.bytes => {}
            Some(_) => {
                return Err(Error::transform(
                    &artifact.path,
                    format!(
                        "output name collision: two different artifacts both emit \"{}\"",
                        artifact.name
                    ),
                ));
            }
        }
    }
    Ok(staged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(name: &str, bytes: &[u8]) -> OutputArtifact {
        OutputArtifact {
            name: name.to_string(),
            path: PathBuf::from("/out").join(name),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn identical_duplicate_emissions_are_merged() {
        let staged = stage(
            vec![artifact("logo.png", b"png"), artifact("logo.png", b"png")].into_iter(),
        )
        .unwrap();
        assert_eq!(staged.len(), 1);
    }

    #[test]
    fn conflicting_emissions_violate_the_namespace_invariant() {
        let result = stage(
            vec![artifact("logo.png", b"one"), artifact("logo.png", b"two")].into_iter(),
        );
        assert!(result.is_err());
    }
}
