//! Shared test utilities for crxpack-bundler integration tests.
//!
//! Scaffolds a minimal extension project in a temporary directory: one entry
//! module per requested surface, a manifest template, two icons, and a popup
//! HTML template, mirroring the conventional source layout.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use crxpack_config::{BuildConfig, Environment, Mode, ProjectMetadata};
use tempfile::TempDir;

/// Write an entry module for `surface` with the given source.
pub fn write_entry(root: &Path, surface: &str, source: &str) {
    let dir = root.join("src/pages").join(surface);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("index.js"), source).unwrap();
}

/// Lay out the static inputs every build needs.
pub fn write_static_inputs(root: &Path) {
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(
        root.join("src/manifest.json"),
        r#"{ "name": "Fixture Extension", "manifest_version": 2 }"#,
    )
    .unwrap();

    let img = root.join("src/assets/img");
    fs::create_dir_all(&img).unwrap();
    fs::write(img.join("icon-128.png"), b"\x89PNG large").unwrap();
    fs::write(img.join("icon-34.png"), b"\x89PNG small").unwrap();

    let popup = root.join("src/pages/popup");
    fs::create_dir_all(&popup).unwrap();
    fs::write(
        popup.join("index.html"),
        "<html><body><div id=\"root\"></div></body></html>",
    )
    .unwrap();
}

/// A complete minimal project with the default three surfaces.
pub fn scaffold_project(temp: &TempDir) -> BuildConfig {
    let root = temp.path();
    write_static_inputs(root);
    write_entry(root, "popup", "console.log('popup');\n");
    write_entry(root, "background", "console.log('background');\n");
    write_entry(root, "editor", "console.log('editor');\n");
    BuildConfig::for_project(root, Environment::default())
}

/// Scaffold with a specific mode.
pub fn scaffold_with_mode(temp: &TempDir, mode: Mode) -> BuildConfig {
    let mut config = scaffold_project(temp);
    config.mode = mode;
    config
}

pub fn metadata() -> ProjectMetadata {
    ProjectMetadata {
        description: Some("Fixture description".to_string()),
        version: Some("0.9.0".to_string()),
    }
}

/// Read an output artifact as text.
pub fn read_output(config: &BuildConfig, name: &str) -> String {
    fs::read_to_string(config.output_dir.join(name))
        .unwrap_or_else(|e| panic!("missing output {name}: {e}"))
}

/// Names of all files currently in the output directory, sorted.
pub fn output_names(config: &BuildConfig) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(&config.output_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
