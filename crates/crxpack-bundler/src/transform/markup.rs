//! Markup transform: reference resolution without script-graph wrapping.
//!
//! Markup modules are parsed for `src`/`href` dependency references. Asset
//! references are resolved against the module's directory, rewritten to their
//! output URLs, and the referenced files recorded for emission, but none of
//! the references become script-graph modules. The module itself exports the
//! resolved document text.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use path_clean::PathClean;
use regex::{Captures, Regex};

use crxpack_config::BuildConfig;

use crate::classify::{self, Classification, ContentType};
use crate::transform::{CompiledModule, js_string, read_source};
use crate::{Error, Result};

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)(src|href)\s*=\s*["']([^"']+)["']"#).expect("valid reference pattern")
    })
}

/// A resolved reference from a markup document to an on-disk asset.
#[derive(Debug, Clone)]
pub struct AssetReference {
    pub specifier: String,
    pub path: PathBuf,
    pub output_name: String,
}

/// Resolve a markup document's references in place.
///
/// Returns the rewritten text and the asset files it references. Non-asset
/// and external (`http:`, `//`, `#`, `data:`) references pass through
/// untouched.
pub fn resolve_references(
    config: &BuildConfig,
    path: &Path,
) -> Result<(String, Vec<AssetReference>)> {
    let source = read_source(path)?;
    let base = path.parent().unwrap_or(path);

    let mut references = Vec::new();
    let rewritten = reference_pattern().replace_all(&source, |caps: &Captures<'_>| {
        let attribute = &caps[1];
        let specifier = &caps[2];

        if is_external(specifier) {
            return caps[0].to_string();
        }

        let resolved = base.join(specifier).clean();
        match classify::classify(config, &resolved) {
            Some(Classification::Include(ContentType::Asset)) if resolved.is_file() => {
                let output_name = resolved
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| specifier.to_string());
                let url = format!("{}{}", config.public_path, output_name);
                references.push(AssetReference {
                    specifier: specifier.to_string(),
                    path: resolved,
                    output_name,
                });
                format!("{attribute}=\"{url}\"")
            }
            _ => caps[0].to_string(),
        }
    });

    Ok((rewritten.into_owned(), references))
}

/// Compile a markup module for the transform chain: references resolved,
/// referenced assets emitted, document text exported.
pub fn compile(config: &BuildConfig, path: &Path) -> Result<CompiledModule> {
    let (html, references) = resolve_references(config, path)?;

    // The module factory exports the document text; referenced assets are
    // emitted as standalone files by the graph walk, not linked as modules.
    let factory_body = format!("module.exports = {{ \"default\": {} }};\n", js_string(&html));

    let mut emitted = Vec::new();
    for reference in references {
        let bytes = std::fs::read(&reference.path)
            .map_err(|e| Error::transform(&reference.path, format!("failed to read asset: {e}")))?;
        emitted.push((reference.output_name, bytes));
    }

    Ok(CompiledModule {
        source_path: path.to_path_buf(),
        content_type: ContentType::Markup,
        factory_body: Some(factory_body),
        emitted_files: emitted,
        dependencies: Vec::new(),
        source_text: None,
    })
}

fn is_external(specifier: &str) -> bool {
    specifier.starts_with('#')
        || specifier.starts_with("//")
        || specifier.starts_with("data:")
        || specifier.contains("://")
        || specifier.starts_with("mailto:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crxpack_config::{BuildConfig, Environment};
    use std::fs;
    use tempfile::TempDir;

    fn config_for(root: &Path) -> BuildConfig {
        BuildConfig::for_project(root, Environment::default())
    }

    #[test]
    fn asset_references_are_rewritten_and_recorded() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("logo.png"), b"\x89PNG").unwrap();
        let page = temp.path().join("page.html");
        fs::write(&page, "<img src=\"./logo.png\">").unwrap();

        let config = config_for(temp.path()).public_path("/");
        let (html, refs) = resolve_references(&config, &page).unwrap();

        assert!(html.contains("src=\"/logo.png\""));
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].output_name, "logo.png");
    }

    #[test]
    fn external_references_pass_through() {
        let temp = TempDir::new().unwrap();
        let page = temp.path().join("page.html");
        fs::write(
            &page,
            "<a href=\"https://example.com/x.png\"></a><img src=\"data:image/png;base64,AA==\">",
        )
        .unwrap();

        let config = config_for(temp.path());
        let (html, refs) = resolve_references(&config, &page).unwrap();

        assert!(html.contains("https://example.com/x.png"));
        assert!(html.contains("data:image/png"));
        assert!(refs.is_empty());
    }

    #[test]
    fn non_asset_references_are_left_alone() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("other.html"), "<p>hi</p>").unwrap();
        let page = temp.path().join("page.html");
        fs::write(&page, "<a href=\"./other.html\">next</a>").unwrap();

        let config = config_for(temp.path());
        let (html, refs) = resolve_references(&config, &page).unwrap();

        assert!(html.contains("./other.html"));
        assert!(refs.is_empty());
    }
}
