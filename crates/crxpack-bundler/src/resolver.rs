//! Module resolution on top of `oxc_resolver`.
//!
//! Two resolver instances back one lookup contract: specifiers that already
//! carry a recognized extension are fully specified and bypass automatic
//! extension inference entirely; extensionless specifiers resolve through
//! the inference list (asset extensions first, then script and stylesheet
//! extensions). Alias overrides from the environment resolver apply to both.

use std::path::{Path, PathBuf};

use oxc_resolver::{AliasValue, ResolveOptions, Resolver};

use crxpack_config::BuildConfig;

use crate::classify::{self, ASSET_EXTENSIONS};
use crate::{Error, Result};

/// Extension-inference order for extensionless specifiers.
fn inference_extensions() -> Vec<String> {
    ASSET_EXTENSIONS
        .iter()
        .chain(["js", "jsx", "ts", "tsx", "css"].iter())
        .map(|ext| format!(".{ext}"))
        .collect()
}

/// Resolver shared by all entry graphs of one build.
pub struct ModuleResolver {
    /// Lookup with extension inference for extensionless specifiers.
    infer: Resolver,
    /// Fully-specified lookup: the specifier must name the file exactly.
    exact: Resolver,
}

impl ModuleResolver {
    pub fn new(config: &BuildConfig) -> Self {
        let alias: Vec<(String, Vec<AliasValue>)> = config
            .alias_overrides
            .iter()
            .map(|(name, target)| (name.clone(), vec![AliasValue::Path(target.clone())]))
            .collect();

        let infer = Resolver::new(ResolveOptions {
            alias: alias.clone(),
            extensions: inference_extensions(),
            ..ResolveOptions::default()
        });

        let exact = Resolver::new(ResolveOptions {
            alias,
            extensions: Vec::new(),
            fully_specified: true,
            ..ResolveOptions::default()
        });

        Self { infer, exact }
    }

    /// Resolve `specifier` as imported from `importer`.
    ///
    /// # Errors
    ///
    /// [`Error::Resolve`] naming both the specifier and the importer when the
    /// lookup finds nothing, a fatal transform-stage condition.
    pub fn resolve(&self, importer: &Path, specifier: &str) -> Result<PathBuf> {
        let dir = importer.parent().unwrap_or(importer);
        let resolver = if classify::is_fully_specified(specifier) {
            &self.exact
        } else {
            &self.infer
        };

        resolver
            .resolve(dir, specifier)
            .map(|resolution| resolution.full_path())
            .map_err(|_| Error::Resolve {
                specifier: specifier.to_string(),
                importer: importer.to_path_buf(),
            })
    }
}
