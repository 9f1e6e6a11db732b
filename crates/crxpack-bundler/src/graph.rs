//! Module-graph discovery for one entry point.
//!
//! Breadth-first traversal from the entry's root module. Each discovery wave
//! is transformed on the worker pool (no shared mutable state between
//! modules), then its dependencies are resolved sequentially so module
//! indices stay deterministic: modules are numbered in discovery order, entry
//! first.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::debug;

use crxpack_config::BuildConfig;

use crate::classify::{self, Classification, ContentType};
use crate::resolver::ModuleResolver;
use crate::transform::{self, CompiledModule};
use crate::{Error, Result};

/// One discovered module with its resolved dependency links.
#[derive(Debug)]
pub struct Module {
    pub compiled: CompiledModule,
    /// Import specifier → module index, in import order. Serialized into the
    /// bundle's dependency map.
    pub links: Vec<(String, usize)>,
}

/// The full graph of one entry. The entry module is index 0.
#[derive(Debug)]
pub struct ModuleGraph {
    pub modules: Vec<Module>,
}

impl ModuleGraph {
    /// Every standalone file emitted by the graph's modules.
    pub fn emitted_files(&self) -> impl Iterator<Item = &(String, Vec<u8>)> {
        self.modules
            .iter()
            .flat_map(|m| m.compiled.emitted_files.iter())
    }
}

/// Discover and transform the module graph rooted at `entry_path`.
pub fn discover(
    config: &BuildConfig,
    resolver: &ModuleResolver,
    entry_path: &Path,
) -> Result<ModuleGraph> {
    let entry_path = entry_path.to_path_buf().clean();
    let entry_class = classify_or_fail(config, &entry_path)?;
    if !matches!(
        entry_class,
        Classification::Include(ContentType::Script) | Classification::IncludeRaw(_)
    ) {
        return Err(Error::transform(
            &entry_path,
            "entry point must be a script module",
        ));
    }

    let mut index_of: FxHashMap<PathBuf, usize> = FxHashMap::default();
    let mut pending: Vec<(usize, PathBuf, Classification)> = Vec::new();
    let mut modules: Vec<Option<Module>> = Vec::new();

    index_of.insert(entry_path.clone(), 0);
    modules.push(None);
    pending.push((0, entry_path, entry_class));

    while !pending.is_empty() {
        let wave = std::mem::take(&mut pending);

        // Transform the whole wave on the worker pool.
        let compiled: Vec<(usize, CompiledModule)> = wave
            .par_iter()
            .map(|(index, path, classification)| {
                debug!(module = %path.display(), "transforming");
                transform::compile(config, path, *classification).map(|m| (*index, m))
            })
            .collect::<Result<Vec<_>>>()?;

        // Resolve dependencies sequentially so indices are deterministic.
        for (index, module) in compiled {
            let mut links = Vec::with_capacity(module.dependencies.len());
            for specifier in &module.dependencies {
                let resolved = resolver.resolve(&module.source_path, specifier)?.clean();
                let dep_index = match index_of.get(&resolved) {
                    Some(&existing) => existing,
                    None => {
                        let classification = classify_or_fail(config, &resolved)?;
                        let new_index = modules.len();
                        index_of.insert(resolved.clone(), new_index);
                        modules.push(None);
                        pending.push((new_index, resolved, classification));
                        new_index
                    }
                };
                links.push((specifier.clone(), dep_index));
            }
            modules[index] = Some(Module {
                compiled: module,
                links,
            });
        }
    }

    let modules = modules
        .into_iter()
        .map(|m| m.expect("every discovered module is compiled"))
        .collect();

    Ok(ModuleGraph { modules })
}

fn classify_or_fail(config: &BuildConfig, path: &Path) -> Result<Classification> {
    classify::classify(config, path)
        .ok_or_else(|| Error::transform(path, "unrecognized module content type"))
}
