//! Content-type classification for source modules.
//!
//! A closed set of content-type variants dispatched through an ordered list
//! of (predicate, type) rules; declaration order is evaluation order, first
//! match wins. The dependency-cache exclusion predicate is evaluated *before*
//! classification, so a cached module never reaches a transform sequence it
//! should be excluded from, even when its extension would otherwise match.

use std::path::Path;

use crxpack_config::BuildConfig;

/// Script extensions handled by the downleveling transform. Also the
/// extension-inference list for extensionless specifiers, together with the
/// stylesheet and asset extensions.
pub const SCRIPT_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "ts", "tsx"];

/// The two recognized stylesheet dialects.
pub const STYLESHEET_EXTENSIONS: &[&str] = &["css", "scss"];

/// Binary asset extensions emitted as standalone `<basename>.<ext>` files.
pub const ASSET_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "eot", "otf", "svg", "ttf", "woff", "woff2",
];

/// Markup extension: parsed and reference-resolved, never wrapped into the
/// script graph.
pub const MARKUP_EXTENSIONS: &[&str] = &["html"];

/// Closed set of module content types, each selecting one transform sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Script,
    Stylesheet,
    Asset,
    Markup,
}

/// How a classified module participates in the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Transform according to the content type.
    Include(ContentType),
    /// Dependency-cache script: linked into the graph but not downleveled.
    IncludeRaw(ContentType),
    /// Excluded before classification (dependency-cache non-script).
    Excluded,
}

struct Rule {
    matches: fn(&str) -> bool,
    content_type: ContentType,
}

/// Rule-declaration order mirrors the transform chain's contract: scripts,
/// stylesheets, assets, markup.
const RULES: &[Rule] = &[
    Rule {
        matches: |ext| SCRIPT_EXTENSIONS.contains(&ext),
        content_type: ContentType::Script,
    },
    Rule {
        matches: |ext| STYLESHEET_EXTENSIONS.contains(&ext),
        content_type: ContentType::Stylesheet,
    },
    Rule {
        matches: |ext| ASSET_EXTENSIONS.contains(&ext),
        content_type: ContentType::Asset,
    },
    Rule {
        matches: |ext| MARKUP_EXTENSIONS.contains(&ext),
        content_type: ContentType::Markup,
    },
];

/// Classify a module path, applying the exclusion predicate first.
///
/// Returns `None` for an extension no rule recognizes; the caller reports
/// that as a transform error naming the module.
pub fn classify(config: &BuildConfig, path: &Path) -> Option<Classification> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let content_type = RULES
        .iter()
        .find(|rule| (rule.matches)(&ext))
        .map(|rule| rule.content_type)?;

    if config.in_dependency_cache(path) {
        // Cached scripts still link into the graph; every other cached
        // content type is excluded outright.
        return Some(match content_type {
            ContentType::Script => Classification::IncludeRaw(ContentType::Script),
            _ => Classification::Excluded,
        });
    }

    Some(Classification::Include(content_type))
}

/// Whether a specifier already names a recognized extension and must be
/// looked up as fully specified (no automatic extension inference).
pub fn is_fully_specified(specifier: &str) -> bool {
    let Some((_, ext)) = specifier.rsplit_once('.') else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    SCRIPT_EXTENSIONS.contains(&ext.as_str())
        || STYLESHEET_EXTENSIONS.contains(&ext.as_str())
        || ASSET_EXTENSIONS.contains(&ext.as_str())
        || MARKUP_EXTENSIONS.contains(&ext.as_str())
}
