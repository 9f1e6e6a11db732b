//! Stylesheet transform: dialect compilation, parsing, runtime injection.
//!
//! The three-stage pipeline runs in a fixed order with injection outermost:
//!
//! 1. SCSS dialect → plain CSS (`grass`); plain CSS skips this stage.
//! 2. Plain-CSS parsing and `@import` flattening (`lightningcss`).
//! 3. Wrapping into a factory that injects a `<style>` element into the
//!    document when the module is first required.

use std::path::Path;

use lightningcss::bundler::{Bundler, FileProvider};
use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{ParserOptions, StyleSheet};

use crate::classify::ContentType;
use crate::transform::{CompiledModule, js_string, read_source};
use crate::{Error, Result};

pub fn compile(path: &Path) -> Result<CompiledModule> {
    let is_scss = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("scss"));

    let css = if is_scss {
        compile_dialect(path)?
    } else {
        flatten_imports(path)?
    };

    Ok(CompiledModule {
        source_path: path.to_path_buf(),
        content_type: ContentType::Stylesheet,
        factory_body: Some(injection_wrapper(&css)),
        emitted_files: Vec::new(),
        dependencies: Vec::new(),
        source_text: None,
    })
}

/// Stage 1: SCSS → plain CSS. `grass` resolves `@use`/`@import` between
/// dialect files itself, so the result is re-parsed (stage 2) for validation
/// and normalization only.
fn compile_dialect(path: &Path) -> Result<String> {
    let css = grass::from_path(path, &grass::Options::default())
        .map_err(|e| Error::transform(path, e.to_string()))?;

    let filename = path.to_string_lossy().into_owned();
    let stylesheet = StyleSheet::parse(
        &css,
        ParserOptions {
            filename,
            ..ParserOptions::default()
        },
    )
    .map_err(|e| Error::transform(path, format!("{e:?}")))?;

    print_css(path, &stylesheet)
}

/// Stage 2 for plain CSS: parse and flatten `@import` references into one
/// stylesheet.
fn flatten_imports(path: &Path) -> Result<String> {
    // Validate readability up front so a missing file reports as a transform
    // error on this module rather than a bundler-internal message.
    read_source(path)?;

    let provider = FileProvider::new();
    let mut bundler = Bundler::new(&provider, None, ParserOptions::default());
    let stylesheet = bundler
        .bundle(path)
        .map_err(|e| Error::transform(path, format!("{e:?}")))?;

    print_css(path, &stylesheet)
}

fn print_css(path: &Path, stylesheet: &StyleSheet<'_>) -> Result<String> {
    stylesheet
        .to_css(PrinterOptions::default())
        .map(|output| output.code)
        .map_err(|e| Error::transform(path, format!("{e:?}")))
}

/// Stage 3: the outermost wrapper: a factory body that injects the compiled
/// stylesheet into the document at require time.
fn injection_wrapper(css: &str) -> String {
    format!(
        concat!(
            "var css = {};\n",
            "var style = document.createElement(\"style\");\n",
            "style.setAttribute(\"type\", \"text/css\");\n",
            "style.textContent = css;\n",
            "document.head.appendChild(style);\n",
            "module.exports = {{}};\n",
        ),
        js_string(css)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn plain_css_is_wrapped_for_injection() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.css");
        fs::write(&path, "body { color: red; }\n").unwrap();

        let module = compile(&path).unwrap();
        let body = module.factory_body.unwrap();
        assert!(body.contains("document.createElement(\"style\")"));
        assert!(body.contains("color: red"));
        assert!(body.contains("document.head.appendChild(style)"));
    }

    #[test]
    fn css_imports_are_flattened_into_one_sheet() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("base.css"), "h1 { margin: 0; }\n").unwrap();
        let path = temp.path().join("app.css");
        fs::write(&path, "@import \"base.css\";\nbody { color: red; }\n").unwrap();

        let body = compile(&path).unwrap().factory_body.unwrap();
        assert!(body.contains("margin"));
        assert!(body.contains("color: red"));
        assert!(!body.contains("@import"));
    }

    #[test]
    fn scss_dialect_is_compiled_before_parsing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("theme.scss");
        fs::write(
            &path,
            "$accent: #336699;\n.button { color: $accent; &:hover { color: darken($accent, 10%); } }\n",
        )
        .unwrap();

        let body = compile(&path).unwrap().factory_body.unwrap();
        assert!(!body.contains("$accent"));
        assert!(body.contains(".button"));
    }

    #[test]
    fn unparseable_stylesheet_is_a_transform_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.css");
        fs::write(&path, "% { color: red; }\n").unwrap();

        let err = compile(&path).unwrap_err();
        assert!(err.to_string().contains("broken.css"));
    }
}
