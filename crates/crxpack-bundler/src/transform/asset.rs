//! Binary asset transform: standalone file emission plus a URL-exporting
//! factory.
//!
//! Assets keep their base name (`logo.png` in the source tree becomes
//! `logo.png` in the output root) and are never inlined into script content.
//! The in-graph module exports the runtime URL built from the configured
//! public-path prefix.

use std::path::Path;

use crxpack_config::BuildConfig;

use crate::classify::ContentType;
use crate::transform::{CompiledModule, js_string};
use crate::{Error, Result};

pub fn compile(config: &BuildConfig, path: &Path) -> Result<CompiledModule> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::transform(path, format!("failed to read asset: {e}")))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::transform(path, "asset has no usable file name"))?
        .to_string();

    let url = format!("{}{}", config.public_path, file_name);
    let factory_body = format!("module.exports = {{ \"default\": {} }};\n", js_string(&url));

    Ok(CompiledModule {
        source_path: path.to_path_buf(),
        content_type: ContentType::Asset,
        factory_body: Some(factory_body),
        emitted_files: vec![(file_name, bytes)],
        dependencies: Vec::new(),
        source_text: None,
    })
}
