//! The module transform chain.
//!
//! Each classified module runs through the transform sequence for its content
//! type and becomes a [`CompiledModule`]: an in-memory compiled
//! representation owned by this chain until it is handed to the entry/output
//! mapper, which never mutates it.
//!
//! Transform sequences per content type:
//!
//! - **Script**: ESM lowering to a CommonJS-style factory body, then syntax
//!   downleveling (language + JSX presets). Dependency-cache scripts skip
//!   downleveling.
//! - **Stylesheet**: dialect compilation → plain-CSS parsing and `@import`
//!   flattening → runtime document-injection wrapper (injection outermost).
//! - **Asset**: standalone `<basename>.<ext>` file emission plus a factory
//!   exporting the public URL.
//! - **Markup**: reference resolution; referenced assets are emitted but the
//!   markup's references are not wrapped into the script graph.

pub mod asset;
pub mod markup;
pub mod script;
pub mod stylesheet;

use std::path::{Path, PathBuf};

use crxpack_config::BuildConfig;

use crate::classify::{Classification, ContentType};
use crate::{Error, Result};

/// One module's compiled representation.
#[derive(Debug, Clone)]
pub struct CompiledModule {
    pub source_path: PathBuf,
    pub content_type: ContentType,

    /// CommonJS-style factory body linked into a bundle. `None` for modules
    /// that only emit standalone files.
    pub factory_body: Option<String>,

    /// Standalone output files: `(file name, bytes)` pairs. One for assets,
    /// possibly several for markup (one per referenced asset).
    pub emitted_files: Vec<(String, Vec<u8>)>,

    /// Import specifiers in source order, to be resolved by the graph walk.
    pub dependencies: Vec<String>,

    /// Original source text, kept for development source maps.
    pub source_text: Option<String>,
}

/// Run the transform sequence selected by `classification`.
pub fn compile(
    config: &BuildConfig,
    path: &Path,
    classification: Classification,
) -> Result<CompiledModule> {
    match classification {
        Classification::Include(ContentType::Script) => script::compile(path, true),
        Classification::IncludeRaw(ContentType::Script) => script::compile(path, false),
        Classification::IncludeRaw(_) | Classification::Excluded => Ok(stub(path)),
        Classification::Include(ContentType::Stylesheet) => stylesheet::compile(path),
        Classification::Include(ContentType::Asset) => asset::compile(config, path),
        Classification::Include(ContentType::Markup) => markup::compile(config, path),
    }
}

/// Excluded modules still need a link target so imports of them bind.
fn stub(path: &Path) -> CompiledModule {
    CompiledModule {
        source_path: path.to_path_buf(),
        content_type: ContentType::Asset,
        factory_body: Some("module.exports = {};\n".to_string()),
        emitted_files: Vec::new(),
        dependencies: Vec::new(),
        source_text: None,
    }
}

/// Render a Rust string as a JS string literal (quoted, escaped).
pub(crate) fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Shorthand for the recurring read-the-module-or-fail pattern.
pub(crate) fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::transform(path, format!("failed to read module: {e}")))
}
