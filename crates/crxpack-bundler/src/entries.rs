//! Entry/output mapping: one independent module graph per named entry, one
//! bundle artifact per graph.
//!
//! The artifact name is deterministically `<entryName>.bundle.js`; linking
//! wraps every module factory into an indexed table driven by a small require
//! runtime, entry module invoked last. Entries share nothing mutable, so
//! their graphs compile in parallel. The live-reload exemption flag on an
//! entry is configuration carried for the external dev-server collaborator;
//! the mapper itself never acts on it.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::debug;

use crxpack_config::BuildConfig;

use crate::graph::{self, ModuleGraph};
use crate::optimize::{self, OptimizationPreset};
use crate::resolver::ModuleResolver;
use crate::Result;

/// One file produced by the build, staged in memory until the emission phase.
#[derive(Debug, Clone)]
pub struct OutputArtifact {
    /// Output file name, unique within the build.
    pub name: String,
    /// Full path under the output directory.
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl OutputArtifact {
    pub fn new(config: &BuildConfig, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let path = config.output_dir.join(&name);
        Self { name, path, bytes }
    }
}

/// The deterministic bundle artifact name for an entry.
pub fn bundle_name(entry: &str) -> String {
    format!("{entry}.bundle.js")
}

/// Compile every configured entry to its output artifacts (bundle, source
/// map in development, emitted asset files).
pub fn map_entries(
    config: &BuildConfig,
    resolver: &ModuleResolver,
    preset: OptimizationPreset,
) -> Result<Vec<OutputArtifact>> {
    let entries: Vec<_> = config.entries.iter().collect();

    let per_entry: Vec<Vec<OutputArtifact>> = entries
        .par_iter()
        .map(|(name, entry)| -> Result<Vec<OutputArtifact>> {
            debug!(entry = %name, source = %entry.source.display(), "compiling entry graph");
            let graph = graph::discover(config, resolver, &entry.source)?;
            let linked = link(&graph);

            let mut artifacts = Vec::new();
            for (file_name, bytes) in optimize::finalize(preset, &bundle_name(name), linked)? {
                artifacts.push(OutputArtifact::new(config, file_name, bytes));
            }
            for (file_name, bytes) in graph.emitted_files() {
                artifacts.push(OutputArtifact::new(config, file_name.clone(), bytes.clone()));
            }
            Ok(artifacts)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(per_entry.into_iter().flatten().collect())
}

/// A linked bundle plus the line ranges each script module's body occupies,
/// for module-granular source mapping.
#[derive(Debug)]
pub struct LinkedBundle {
    pub code: String,
    pub ranges: Vec<ModuleRange>,
}

#[derive(Debug)]
pub struct ModuleRange {
    pub source_path: PathBuf,
    pub source_text: String,
    /// 0-based first line of the module body in the bundle.
    pub first_line: u32,
    pub line_count: u32,
}

const RUNTIME_HEAD: &str = "\
(function (factories) {
  \"use strict\";
  var cache = {};
  function load(index) {
    var cached = cache[index];
    if (cached) {
      return cached.exports;
    }
    var module = { exports: {} };
    cache[index] = module;
    var links = factories[index][1];
    factories[index][0](module, function (specifier) {
      return load(links[specifier]);
    });
    return module.exports;
  }
  load(0);
})([
";

const RUNTIME_TAIL: &str = "]);\n";

/// Link a module graph into one bundle: an IIFE over `[factory, links]`
/// pairs, module 0 (the entry) loaded last by the runtime head.
pub fn link(graph: &ModuleGraph) -> LinkedBundle {
    let mut code = String::new();
    let mut line = count_lines(RUNTIME_HEAD);
    let mut ranges = Vec::new();

    code.push_str(RUNTIME_HEAD);

    for module in &graph.modules {
        let Some(body) = module.compiled.factory_body.as_deref() else {
            continue;
        };

        code.push_str("[function (module, __crx_require) {\n");
        line += 1;

        let first_line = line;
        let mut body_text = body.to_string();
        if !body_text.ends_with('\n') {
            body_text.push('\n');
        }
        let body_lines = count_lines(&body_text);
        code.push_str(&body_text);
        line += body_lines;

        if let Some(source_text) = &module.compiled.source_text {
            ranges.push(ModuleRange {
                source_path: module.compiled.source_path.clone(),
                source_text: source_text.clone(),
                first_line,
                line_count: body_lines,
            });
        }

        let factory_tail = format!("}}, {}],\n", links_json(module));
        code.push_str(&factory_tail);
        line += count_lines(&factory_tail);
    }

    code.push_str(RUNTIME_TAIL);

    LinkedBundle { code, ranges }
}

fn count_lines(text: &str) -> u32 {
    text.matches('\n').count() as u32
}

/// Serialize a module's specifier → index links. `serde_json::Map` keeps
/// keys sorted, so output is deterministic across runs.
fn links_json(module: &graph::Module) -> String {
    let mut map = serde_json::Map::new();
    for (specifier, index) in &module.links {
        map.insert(specifier.clone(), serde_json::Value::from(*index));
    }
    serde_json::Value::Object(map).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crxpack_config::{BuildConfig, Environment};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn bundle_names_follow_the_entry_name() {
        assert_eq!(bundle_name("popup"), "popup.bundle.js");
        assert_eq!(bundle_name("background"), "background.bundle.js");
    }

    #[test]
    fn linked_bundle_contains_runtime_and_all_factories() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("index.js"), "import { x } from './x';\nconsole.log(x);\n").unwrap();
        fs::write(src.join("x.js"), "export const x = 7;\n").unwrap();

        let config = BuildConfig::for_project(temp.path(), Environment::default());
        let resolver = ModuleResolver::new(&config);
        let graph = graph::discover(&config, &resolver, &src.join("index.js")).unwrap();
        let linked = link(&graph);

        assert!(linked.code.contains("load(0);"));
        assert!(linked.code.contains(r#"{"./x":1}"#));
        assert!(linked.code.contains("console.log(x)"));
        assert_eq!(linked.ranges.len(), 2);
    }

    #[test]
    fn module_ranges_cover_their_bodies() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("index.js"), "const a = 1;\nconst b = 2;\nconsole.log(a + b);\n")
            .unwrap();

        let config = BuildConfig::for_project(temp.path(), Environment::default());
        let resolver = ModuleResolver::new(&config);
        let graph = graph::discover(&config, &resolver, &src.join("index.js")).unwrap();
        let linked = link(&graph);

        let range = &linked.ranges[0];
        let lines: Vec<&str> = linked.code.lines().collect();
        assert_eq!(lines[range.first_line as usize], "const a = 1;");
    }
}
