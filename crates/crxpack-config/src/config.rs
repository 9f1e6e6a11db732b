//! The build configuration consumed by every pipeline component.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::environment::Environment;
use crate::mode::Mode;

/// A named module-graph root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    /// Path to the entry's root module.
    pub source: PathBuf,

    /// Whether the external dev-server collaborator may inject live-reload
    /// into this entry's bundle. The pipeline only carries the flag.
    pub hot_reload: bool,
}

impl EntryPoint {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            hot_reload: true,
        }
    }

    pub fn without_hot_reload(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            hot_reload: false,
        }
    }
}

/// Everything that parameterizes one build.
///
/// Invariants (checked by [`BuildConfig::validate`]): `entries` is non-empty
/// and every entry source resolves to an existing module.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Active optimization mode.
    pub mode: Mode,

    /// Prefix prepended to emitted asset file names to form runtime URLs.
    pub public_path: String,

    /// Named entry points, in declaration order. Each produces one
    /// `<name>.bundle.js` artifact.
    pub entries: IndexMap<String, EntryPoint>,

    /// Directory all artifacts are written under.
    pub output_dir: PathBuf,

    /// Module specifier substitutions from the environment resolver.
    pub alias_overrides: IndexMap<String, String>,

    /// Project root; the dependency cache (`node_modules`) and source tree
    /// are located relative to this.
    pub project_root: PathBuf,

    /// Static manifest template merged with project metadata.
    pub manifest_template: PathBuf,

    /// Icon binaries copied verbatim into the output root.
    pub icons: Vec<PathBuf>,

    /// HTML shell template for the designated HTML entry.
    pub popup_template: PathBuf,

    /// The entry whose bundles the composed HTML document references.
    pub html_entry: String,
}

impl BuildConfig {
    /// Build the default configuration for an extension project root.
    ///
    /// Mirrors the conventional source layout: one entry per surface under
    /// `src/pages/<name>/index.js`, manifest and icons under `src/`, output
    /// under `build/`. The editor surface is exempt from live-reload.
    pub fn for_project(project_root: impl Into<PathBuf>, env: Environment) -> Self {
        let project_root = project_root.into();
        let pages = project_root.join("src").join("pages");

        let mut entries = IndexMap::new();
        entries.insert(
            "popup".to_string(),
            EntryPoint::new(pages.join("popup").join("index.js")),
        );
        entries.insert(
            "background".to_string(),
            EntryPoint::new(pages.join("background").join("index.js")),
        );
        entries.insert(
            "editor".to_string(),
            EntryPoint::without_hot_reload(pages.join("editor").join("index.js")),
        );

        let img = project_root.join("src").join("assets").join("img");

        Self {
            mode: env.mode,
            public_path: "/".to_string(),
            entries,
            output_dir: project_root.join("build"),
            alias_overrides: env.alias_overrides,
            manifest_template: project_root.join("src").join("manifest.json"),
            icons: vec![img.join("icon-128.png"), img.join("icon-34.png")],
            popup_template: pages.join("popup").join("index.html"),
            html_entry: "popup".to_string(),
            project_root,
        }
    }

    /// Set the asset public-path prefix.
    pub fn public_path(mut self, prefix: impl Into<String>) -> Self {
        self.public_path = prefix.into();
        self
    }

    /// Set the output directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Replace the entry map.
    pub fn entries(mut self, entries: IndexMap<String, EntryPoint>) -> Self {
        self.entries = entries;
        self
    }

    /// Add or replace a single entry.
    pub fn entry(mut self, name: impl Into<String>, entry: EntryPoint) -> Self {
        self.entries.insert(name.into(), entry);
        self
    }

    /// The dependency-cache directory excluded from transformation.
    pub fn dependency_cache_dir(&self) -> PathBuf {
        self.project_root.join("node_modules")
    }

    /// Whether a module path sits inside the dependency cache.
    pub fn in_dependency_cache(&self, path: &Path) -> bool {
        path.starts_with(self.dependency_cache_dir())
            || path
                .components()
                .any(|c| c.as_os_str() == "node_modules")
    }

    /// Entry names the dev-server collaborator must not hot-reload.
    pub fn no_reload_entries(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, e)| !e.hot_reload)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;

    fn default_config() -> BuildConfig {
        BuildConfig::for_project("/project", Environment::default())
    }

    #[test]
    fn default_entries_cover_all_three_surfaces() {
        let config = default_config();
        let names: Vec<_> = config.entries.keys().cloned().collect();
        assert_eq!(names, ["popup", "background", "editor"]);
    }

    #[test]
    fn editor_is_exempt_from_hot_reload() {
        let config = default_config();
        assert_eq!(config.no_reload_entries(), ["editor"]);
    }

    #[test]
    fn dependency_cache_detection_is_path_based() {
        let config = default_config();
        assert!(config.in_dependency_cache(Path::new("/project/node_modules/react/index.js")));
        assert!(!config.in_dependency_cache(Path::new("/project/src/pages/popup/index.js")));
    }

    #[test]
    fn dependency_cache_detection_applies_outside_the_project_root() {
        // The exclusion predicate must hold even for modules resolved outside
        // the source tree.
        let config = default_config();
        assert!(config.in_dependency_cache(Path::new("/elsewhere/node_modules/pkg/icon.png")));
    }

    #[test]
    fn builder_methods_override_defaults() {
        let config = default_config()
            .public_path("https://cdn.example/")
            .output_dir("/project/dist");
        assert_eq!(config.public_path, "https://cdn.example/");
        assert_eq!(config.output_dir, PathBuf::from("/project/dist"));
    }
}
