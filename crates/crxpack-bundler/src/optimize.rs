//! Mode-selected optimization presets for script emission.
//!
//! Two terminal configurations, chosen once per build from the mode and
//! never mutated mid-build. Development attaches a module-granular source
//! map to every bundle; production runs whole-bundle dead-code elimination
//! and minification with comments excluded from the output.

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_sourcemap::SourceMapBuilder;
use oxc_span::SourceType;

use crxpack_config::Mode;

use crate::entries::LinkedBundle;
use crate::{Error, Result};

/// The two optimization configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationPreset {
    /// Source-mapped, unminified output; favors rebuild speed.
    Development,
    /// Dead-code-eliminated, minified, comment-free output.
    Production,
}

impl OptimizationPreset {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Development => OptimizationPreset::Development,
            Mode::Production => OptimizationPreset::Production,
        }
    }
}

impl From<Mode> for OptimizationPreset {
    fn from(mode: Mode) -> Self {
        OptimizationPreset::for_mode(mode)
    }
}

/// Finalize a linked bundle under the active preset.
///
/// Returns `(file name, bytes)` pairs: the bundle itself, plus its `.map`
/// companion in development.
pub fn finalize(
    preset: OptimizationPreset,
    bundle_name: &str,
    linked: LinkedBundle,
) -> Result<Vec<(String, Vec<u8>)>> {
    match preset {
        OptimizationPreset::Development => Ok(attach_source_map(bundle_name, linked)),
        OptimizationPreset::Production => {
            let minified = minify(bundle_name, &linked.code)?;
            Ok(vec![(bundle_name.to_string(), minified.into_bytes())])
        }
    }
}

/// Development: build a module-granular source map (line-level tokens per
/// module body) and reference it from the bundle.
fn attach_source_map(bundle_name: &str, linked: LinkedBundle) -> Vec<(String, Vec<u8>)> {
    let mut builder = SourceMapBuilder::default();

    for range in &linked.ranges {
        let source_id =
            builder.set_source_and_content(&range.source_path.to_string_lossy(), &range.source_text);
        let last_source_line = range.source_text.lines().count().saturating_sub(1) as u32;

        for offset in 0..range.line_count {
            builder.add_token(
                range.first_line + offset,
                0,
                offset.min(last_source_line),
                0,
                Some(source_id),
                None,
            );
        }
    }

    let map = builder.into_sourcemap();
    let map_name = format!("{bundle_name}.map");
    let code = format!(
        "{}\n//# sourceMappingURL={map_name}\n",
        linked.code.trim_end()
    );

    vec![
        (bundle_name.to_string(), code.into_bytes()),
        (map_name, map.to_json_string().into_bytes()),
    ]
}

/// Production: whole-bundle dead-code elimination and minification, with
/// comments stripped so nothing internal leaks into shipped code.
fn minify(bundle_name: &str, code: &str) -> Result<String> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, code, SourceType::cjs()).parse();
    if let Some(error) = parsed.errors.first() {
        return Err(Error::transform(bundle_name, format!("{error:?}")));
    }
    let mut program = parsed.program;

    let minifier = Minifier::new(MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    });
    let minified = minifier.minify(&allocator, &mut program);

    let output = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(minified.scoping)
        .build(&program);

    Ok(output.code)
}
