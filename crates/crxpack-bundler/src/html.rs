//! HTML composition: the shell document for the designated entry.
//!
//! Reads the popup template, resolves its asset references through the
//! markup transform, injects `<script>` tags for exactly that entry's
//! bundle(s), and stages `<entry>.html`. Composition is recomputed every
//! build: the template or the entry output may have changed, so there is
//! deliberately no caching of this step.

use crxpack_config::BuildConfig;

use crate::entries::OutputArtifact;
use crate::transform::markup;
use crate::Result;

/// Compose the shell document plus any asset files the template references.
pub fn compose(config: &BuildConfig, script_names: &[String]) -> Result<Vec<OutputArtifact>> {
    let (html, references) = markup::resolve_references(config, &config.popup_template)?;

    let tags: String = script_names
        .iter()
        .map(|name| format!("<script src=\"{}{}\"></script>", config.public_path, name))
        .collect::<Vec<_>>()
        .join("");

    let composed = inject_before_body_close(&html, &tags);

    let mut artifacts = vec![OutputArtifact::new(
        config,
        format!("{}.html", config.html_entry),
        composed.into_bytes(),
    )];

    for reference in references {
        let bytes = std::fs::read(&reference.path)?;
        artifacts.push(OutputArtifact::new(config, reference.output_name, bytes));
    }

    Ok(artifacts)
}

/// Insert `tags` immediately before the closing `</body>` tag, or append
/// when the template has none.
fn inject_before_body_close(html: &str, tags: &str) -> String {
    let lower = html.to_ascii_lowercase();
    match lower.rfind("</body>") {
        Some(position) => {
            let mut composed = String::with_capacity(html.len() + tags.len());
            composed.push_str(&html[..position]);
            composed.push_str(tags);
            composed.push_str(&html[position..]);
            composed
        }
        None => {
            let mut composed = html.to_string();
            composed.push_str(tags);
            composed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crxpack_config::{BuildConfig, Environment};
    use std::fs;
    use tempfile::TempDir;

    fn config_with_template(temp: &TempDir, template: &str) -> BuildConfig {
        let pages = temp.path().join("src/pages/popup");
        fs::create_dir_all(&pages).unwrap();
        fs::write(pages.join("index.html"), template).unwrap();
        BuildConfig::for_project(temp.path(), Environment::default())
    }

    #[test]
    fn scripts_are_injected_before_body_close() {
        let temp = TempDir::new().unwrap();
        let config = config_with_template(
            &temp,
            "<html><body><div id=\"root\"></div></body></html>",
        );

        let artifacts = compose(&config, &["popup.bundle.js".to_string()]).unwrap();
        let html = String::from_utf8(artifacts[0].bytes.clone()).unwrap();

        assert_eq!(artifacts[0].name, "popup.html");
        assert!(html.contains("<script src=\"/popup.bundle.js\"></script></body>"));
    }

    #[test]
    fn scripts_are_appended_without_a_body_tag() {
        let temp = TempDir::new().unwrap();
        let config = config_with_template(&temp, "<div id=\"root\"></div>");

        let artifacts = compose(&config, &["popup.bundle.js".to_string()]).unwrap();
        let html = String::from_utf8(artifacts[0].bytes.clone()).unwrap();
        assert!(html.ends_with("<script src=\"/popup.bundle.js\"></script>"));
    }

    #[test]
    fn only_the_designated_entry_scripts_are_referenced() {
        let temp = TempDir::new().unwrap();
        let config = config_with_template(&temp, "<body></body>");

        let artifacts = compose(&config, &["popup.bundle.js".to_string()]).unwrap();
        let html = String::from_utf8(artifacts[0].bytes.clone()).unwrap();
        assert!(!html.contains("background.bundle.js"));
        assert!(!html.contains("editor.bundle.js"));
    }

    #[test]
    fn template_asset_references_are_emitted() {
        let temp = TempDir::new().unwrap();
        let pages = temp.path().join("src/pages/popup");
        fs::create_dir_all(&pages).unwrap();
        fs::write(pages.join("banner.png"), b"\x89PNG").unwrap();
        fs::write(
            pages.join("index.html"),
            "<body><img src=\"./banner.png\"></body>",
        )
        .unwrap();
        let config = BuildConfig::for_project(temp.path(), Environment::default());

        let artifacts = compose(&config, &["popup.bundle.js".to_string()]).unwrap();
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[1].name, "banner.png");
    }
}
