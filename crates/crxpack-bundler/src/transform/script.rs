//! Script transform: ESM lowering and syntax downleveling.
//!
//! Every script module becomes a CommonJS-style factory body. Import and
//! export statements are lowered by span splicing: the parsed statement spans
//! index into the original source, each module-syntax statement is replaced
//! with registry calls (`__crx_require`) or `module.exports` assignments, and
//! the untouched statements pass through byte-for-byte. The spliced source is
//! then re-parsed and downleveled with the two transformer presets (general
//! language syntax to the ES2017 target, and classic-runtime JSX).
//!
//! Dependency-cache scripts are lowered but not downleveled.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Declaration, ExportNamedDeclaration, ImportDeclarationSpecifier, Program, Statement,
};
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::{GetSpan, SourceType, Span};
use oxc_transformer::{JsxOptions, JsxRuntime, TransformOptions, Transformer};

use crate::classify::ContentType;
use crate::transform::{CompiledModule, js_string, read_source};
use crate::{Error, Result};

/// Downleveling target for the general language-syntax preset.
const ES_TARGET: &str = "es2017";

pub fn compile(path: &Path, downlevel: bool) -> Result<CompiledModule> {
    let source = read_source(path)?;
    let source_type = source_type_for(path);

    let lowered = lower_module_syntax(path, &source, source_type)?;

    let factory_body = if downlevel {
        downlevel_syntax(path, &lowered.body, source_type)?
    } else {
        lowered.body
    };

    Ok(CompiledModule {
        source_path: path.to_path_buf(),
        content_type: ContentType::Script,
        factory_body: Some(factory_body),
        emitted_files: Vec::new(),
        dependencies: lowered.dependencies,
        source_text: Some(source),
    })
}

fn source_type_for(path: &Path) -> SourceType {
    SourceType::from_path(path).unwrap_or_else(|_| SourceType::mjs())
}

/// Result of the ESM lowering stage.
struct LoweredModule {
    body: String,
    /// Import specifiers in source order.
    dependencies: Vec<String>,
}

/// Splice module syntax out of `source`, producing a factory body that only
/// speaks `__crx_require` / `module.exports`.
fn lower_module_syntax(path: &Path, source: &str, source_type: SourceType) -> Result<LoweredModule> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, source_type).parse();
    if let Some(error) = parsed.errors.first() {
        return Err(Error::transform(path, format!("{error:?}")));
    }

    let mut lowering = Lowering {
        source,
        splices: Vec::new(),
        dependencies: Vec::new(),
        exports: Vec::new(),
        reexport_counter: 0,
    };
    lowering.collect(&parsed.program);
    Ok(lowering.finish())
}

struct Lowering<'s> {
    source: &'s str,
    /// Statement span → replacement text, in source order.
    splices: Vec<(Span, String)>,
    dependencies: Vec<String>,
    /// Exported name → local expression, assigned in a footer.
    exports: Vec<(String, String)>,
    reexport_counter: usize,
}

impl<'s> Lowering<'s> {
    fn collect(&mut self, program: &Program<'_>) {
        for stmt in &program.body {
            match stmt {
                Statement::ImportDeclaration(decl) => {
                    let require = self.require_expr(decl.source.value.as_str());
                    let mut lines = Vec::new();
                    let mut destructured = Vec::new();

                    for specifier in decl.specifiers.iter().flatten() {
                        match specifier {
                            ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                                destructured
                                    .push(format!("\"default\": {}", s.local.name.as_str()));
                            }
                            ImportDeclarationSpecifier::ImportSpecifier(s) => {
                                destructured.push(format!(
                                    "{}: {}",
                                    js_string(s.imported.name().as_str()),
                                    s.local.name.as_str()
                                ));
                            }
                            ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                                lines.push(format!(
                                    "const {} = {};",
                                    s.local.name.as_str(),
                                    require
                                ));
                            }
                        }
                    }

                    if !destructured.is_empty() {
                        lines.push(format!(
                            "const {{ {} }} = {};",
                            destructured.join(", "),
                            require
                        ));
                    }
                    if lines.is_empty() {
                        // Side-effect-only import.
                        lines.push(format!("{require};"));
                    }
                    self.splices.push((decl.span, lines.join("\n")));
                }

                Statement::ExportNamedDeclaration(decl) => self.lower_named_export(decl),

                Statement::ExportDefaultDeclaration(decl) => {
                    let value = self.slice(decl.declaration.span());
                    self.splices
                        .push((decl.span, format!("module.exports[\"default\"] = {value};")));
                }

                Statement::ExportAllDeclaration(decl) => {
                    let require = self.require_expr(decl.source.value.as_str());
                    let replacement = match &decl.exported {
                        Some(name) => format!(
                            "module.exports[{}] = {require};",
                            js_string(name.name().as_str())
                        ),
                        None => format!("Object.assign(module.exports, {require});"),
                    };
                    self.splices.push((decl.span, replacement));
                }

                _ => {}
            }
        }
    }

    fn lower_named_export(&mut self, decl: &ExportNamedDeclaration<'_>) {
        if let Some(inner) = &decl.declaration {
            // `export const x = ...` / `export function f() {}`: keep the
            // declaration, drop the keyword, assign in the footer.
            let mut names = Vec::new();
            collect_declared_names(inner, &mut names);
            for name in names {
                self.exports.push((name.clone(), name));
            }
            let kept = self.slice(inner.span()).to_string();
            self.splices.push((decl.span, kept));
            return;
        }

        if let Some(source) = &decl.source {
            // `export { a as b } from "s"`: import through temporaries.
            let require = self.require_expr(source.value.as_str());
            let mut destructured = Vec::new();
            for specifier in &decl.specifiers {
                let temp = format!("__crx_reexport_{}", self.reexport_counter);
                self.reexport_counter += 1;
                destructured.push(format!(
                    "{}: {temp}",
                    js_string(specifier.local.name().as_str())
                ));
                self.exports
                    .push((specifier.exported.name().to_string(), temp));
            }
            self.splices.push((
                decl.span,
                format!("const {{ {} }} = {};", destructured.join(", "), require),
            ));
            return;
        }

        // `export { a, b as c }`: locals are already in scope.
        for specifier in &decl.specifiers {
            self.exports.push((
                specifier.exported.name().to_string(),
                specifier.local.name().to_string(),
            ));
        }
        self.splices.push((decl.span, String::new()));
    }

    fn require_expr(&mut self, specifier: &str) -> String {
        if !self.dependencies.iter().any(|d| d == specifier) {
            self.dependencies.push(specifier.to_string());
        }
        format!("__crx_require({})", js_string(specifier))
    }

    fn slice(&self, span: Span) -> &'s str {
        &self.source[span.start as usize..span.end as usize]
    }

    fn finish(mut self) -> LoweredModule {
        self.splices.sort_by_key(|(span, _)| span.start);

        let mut body = String::with_capacity(self.source.len());
        let mut cursor = 0usize;
        for (span, replacement) in &self.splices {
            body.push_str(&self.source[cursor..span.start as usize]);
            body.push_str(replacement);
            cursor = span.end as usize;
        }
        body.push_str(&self.source[cursor..]);

        for (exported, local) in &self.exports {
            body.push_str(&format!(
                "\nmodule.exports[{}] = {local};",
                js_string(exported)
            ));
        }
        if !body.ends_with('\n') {
            body.push('\n');
        }

        LoweredModule {
            body,
            dependencies: self.dependencies,
        }
    }
}

/// Collect every name bound by an exported declaration, including
/// destructuring patterns.
fn collect_declared_names(declaration: &Declaration<'_>, names: &mut Vec<String>) {
    use oxc_ast::ast::BindingPatternKind;

    fn from_pattern(pattern: &oxc_ast::ast::BindingPattern<'_>, names: &mut Vec<String>) {
        match &pattern.kind {
            BindingPatternKind::BindingIdentifier(ident) => {
                names.push(ident.name.to_string());
            }
            BindingPatternKind::ObjectPattern(object) => {
                for property in &object.properties {
                    from_pattern(&property.value, names);
                }
                if let Some(rest) = &object.rest {
                    from_pattern(&rest.argument, names);
                }
            }
            BindingPatternKind::ArrayPattern(array) => {
                for element in array.elements.iter().flatten() {
                    from_pattern(element, names);
                }
                if let Some(rest) = &array.rest {
                    from_pattern(&rest.argument, names);
                }
            }
            BindingPatternKind::AssignmentPattern(assignment) => {
                from_pattern(&assignment.left, names);
            }
        }
    }

    match declaration {
        Declaration::VariableDeclaration(decl) => {
            for declarator in &decl.declarations {
                from_pattern(&declarator.id, names);
            }
        }
        Declaration::FunctionDeclaration(decl) => {
            if let Some(id) = &decl.id {
                names.push(id.name.to_string());
            }
        }
        Declaration::ClassDeclaration(decl) => {
            if let Some(id) = &decl.id {
                names.push(id.name.to_string());
            }
        }
        _ => {}
    }
}

/// Downlevel the lowered body with the two feature presets: general language
/// syntax to [`ES_TARGET`], and UI-component (JSX) syntax with the classic
/// runtime.
fn downlevel_syntax(path: &Path, source: &str, source_type: SourceType) -> Result<String> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, source_type).parse();
    if let Some(error) = parsed.errors.first() {
        return Err(Error::transform(path, format!("{error:?}")));
    }
    let mut program = parsed.program;

    let scoping = SemanticBuilder::new()
        .build(&program)
        .semantic
        .into_scoping();

    let mut options = TransformOptions::from_target(ES_TARGET)
        .map_err(|e| Error::transform(path, e.to_string()))?;
    options.jsx = JsxOptions {
        runtime: JsxRuntime::Classic,
        ..JsxOptions::default()
    };

    let transformed =
        Transformer::new(&allocator, path, &options).build_with_scoping(scoping, &mut program);
    if let Some(error) = transformed.errors.first() {
        return Err(Error::transform(path, format!("{error:?}")));
    }

    Ok(Codegen::new().build(&program).code)
}
