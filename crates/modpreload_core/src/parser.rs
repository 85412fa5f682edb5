use anyhow::{Result, anyhow};
use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use oxc_syntax::module_record::ModuleRecord;
use std::path::Path;

use crate::types::{ImportKind, ImportSpan};

/// Extracts every import from `src`, ordered by position in the source.
///
/// Import declarations and re-exports with a source (`export * from '...'`)
/// are reported as [`ImportKind::Static`]. Every `import(...)` expression is
/// reported as [`ImportKind::Dynamic`], carrying its specifier only when the
/// argument is a plain string literal.
pub fn extract_imports(src: &str, source_type: SourceType) -> Result<Vec<ImportSpan>> {
    let allocator = Allocator::default();
    let ParserReturn { program, module_record, errors, panicked, .. } =
        OxcParser::new(&allocator, src, source_type).parse();

    if panicked || !errors.is_empty() {
        let first =
            errors.first().map(|e| e.to_string()).unwrap_or_else(|| "parser aborted".into());
        return Err(anyhow!("{} syntax error(s), first: {}", errors.len().max(1), first));
    }

    let mut specs: Vec<ImportSpan> = Vec::new();

    for stmt in &program.body {
        match stmt {
            Statement::ImportDeclaration(decl) => {
                trace!("Found static import: '{}'", decl.source.value);
                specs.push(static_span(decl.source.value.as_str(), decl.span.start, decl.span.end));
            }
            Statement::ExportAllDeclaration(decl) => {
                trace!("Found star re-export: '{}'", decl.source.value);
                specs.push(static_span(decl.source.value.as_str(), decl.span.start, decl.span.end));
            }
            Statement::ExportNamedDeclaration(decl) => {
                // Only `export { x } from '...'` pulls in another module
                if let Some(source) = &decl.source {
                    trace!("Found named re-export: '{}'", source.value);
                    specs.push(static_span(source.value.as_str(), decl.span.start, decl.span.end));
                }
            }
            _ => {}
        }
    }

    collect_dynamic_imports(&module_record, src, &mut specs);

    specs.sort_by_key(|s| s.start);
    debug!("Found {} import spans", specs.len());
    Ok(specs)
}

fn static_span(request: &str, start: u32, end: u32) -> ImportSpan {
    ImportSpan { specifier: Some(request.to_string()), kind: ImportKind::Static, start, end }
}

fn collect_dynamic_imports(record: &ModuleRecord, src: &str, specs: &mut Vec<ImportSpan>) {
    for import in &record.dynamic_imports {
        let range = import.module_request.start as usize..import.module_request.end as usize;
        let request = &src[range];
        let specifier = string_literal_value(request);
        trace!("Found dynamic import(): {}", request);
        specs.push(ImportSpan {
            specifier,
            kind: ImportKind::Dynamic,
            start: import.span.start,
            end: import.span.end,
        });
    }
}

/// Returns the contents of a quoted literal without escapes or interpolation.
fn string_literal_value(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let quote = raw.chars().next()?;
    if !matches!(quote, '\'' | '"' | '`') || raw.len() < 2 || !raw.ends_with(quote) {
        return None;
    }
    let inner = &raw[1..raw.len() - 1];
    if inner.contains('\\') || (quote == '`' && inner.contains("${")) {
        return None;
    }
    Some(inner.to_string())
}

/// Source type for an emitted script. `.mjs` is always a module; `.js` may be
/// either, so let the parser decide from the contents.
pub fn source_type_for(path: &Path) -> SourceType {
    match path.extension().and_then(|e| e.to_str()) {
        Some("mjs") => SourceType::mjs(),
        _ => SourceType::unambiguous(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imports(src: &str) -> Vec<ImportSpan> {
        extract_imports(src, SourceType::mjs()).unwrap()
    }

    fn static_requests(src: &str) -> Vec<String> {
        imports(src).into_iter().filter(|s| s.is_static()).filter_map(|s| s.specifier).collect()
    }

    #[test]
    fn test_static_import_default() {
        let specs = imports("import foo from './foo.js';");
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].specifier.as_deref(), Some("./foo.js"));
        assert_eq!(specs[0].kind, ImportKind::Static);
    }

    #[test]
    fn test_static_import_named_and_namespace() {
        let requests =
            static_requests("import { a, b } from './utils.js';\nimport * as ns from './ns.js';");
        assert_eq!(requests, vec!["./utils.js", "./ns.js"]);
    }

    #[test]
    fn test_side_effect_import() {
        assert_eq!(static_requests("import './polyfills.js';"), vec!["./polyfills.js"]);
    }

    #[test]
    fn test_re_exports_are_static() {
        let requests = static_requests(
            "export * from './all.js';\nexport { x } from './named.js';\nexport const y = 1;",
        );
        assert_eq!(requests, vec!["./all.js", "./named.js"]);
    }

    #[test]
    fn test_dynamic_import_literal() {
        let specs = imports("import('./lazy.js');");
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].kind, ImportKind::Dynamic);
        assert_eq!(specs[0].specifier.as_deref(), Some("./lazy.js"));
    }

    #[test]
    fn test_dynamic_import_computed() {
        let specs = imports("const name = 'x'; import(`./pages/${name}.js`);");
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].kind, ImportKind::Dynamic);
        assert_eq!(specs[0].specifier, None);
    }

    #[test]
    fn test_nested_dynamic_import() {
        let specs = imports("button.onclick = async () => { await import('./modal.js'); };");
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].kind, ImportKind::Dynamic);
    }

    #[test]
    fn test_mixed_imports_ordered_by_position() {
        let src = "import './util.js'; import('./lazy.js'); import './late.js';";
        let specs = imports(src);
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].specifier.as_deref(), Some("./util.js"));
        assert_eq!(specs[1].kind, ImportKind::Dynamic);
        assert_eq!(specs[2].specifier.as_deref(), Some("./late.js"));
        assert!(specs.windows(2).all(|w| w[0].start <= w[1].start));
        assert_eq!(&src[specs[0].start as usize..specs[0].end as usize], "import './util.js';");
    }

    #[test]
    fn test_no_imports() {
        assert!(imports("const x = 42;").is_empty());
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let err = extract_imports("import { from ;", SourceType::mjs()).unwrap_err();
        assert!(err.to_string().contains("syntax error"));
    }

    #[test]
    fn test_string_literal_value() {
        assert_eq!(string_literal_value("'./a.js'"), Some("./a.js".to_string()));
        assert_eq!(string_literal_value("\"./b.js\""), Some("./b.js".to_string()));
        assert_eq!(string_literal_value("`./c.js`"), Some("./c.js".to_string()));
        assert_eq!(string_literal_value("`./${d}.js`"), None);
        assert_eq!(string_literal_value("name"), None);
        assert_eq!(string_literal_value("'"), None);
    }

    #[test]
    fn test_source_type_for() {
        assert!(source_type_for(Path::new("a.mjs")).is_module());
    }
}
