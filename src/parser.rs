/**
 * Parser Facade
 *
 * DESIGN DECISION: A narrow `ParserFacade` trait around whatever AST
 * provider a caller chooses, backed by one concrete implementation,
 * `SwcParserFacade`, built on `swc_ecma_parser`/`swc_ecma_ast`/`swc_common`
 * WHY: spec.md §4.1 treats the AST provider as "assumed available as a
 * black-box" — the trait keeps that contract provider-agnostic, while
 * `SwcParserFacade` is this crate's real front end, completing the
 * regex-to-real-parser upgrade the teacher crate's own `code_map/parser.rs`
 * documents as its intended production path
 *
 * REASONING CHAIN:
 * 1. `swc_common::SourceMap` is the single source of truth for every
 *    `(line, column)` pair attached downstream to a `HookDiagnostic`,
 *    satisfying "the facade must preserve source coordinates on every AST
 *    node" (spec.md §4.1)
 * 2. `Syntax::Typescript(TsConfig { tsx: true, .. })` parses `.tsx`/`.jsx`
 *    and plain `.ts`/`.js` fixtures under one configuration, since this
 *    engine's rules apply identically regardless of file extension
 * 3. A parse failure becomes `Error::Parse { file, reason }` (error.rs),
 *    never a panic — the orchestrator (orchestrator.rs) logs and excludes
 *    the file, continuing the batch (spec.md §7 "ParseError")
 *
 * PATTERN: facade over a third-party library, same shape as the teacher's
 * `RustParser` MVP-parser-with-documented-upgrade-path in code_map/parser.rs
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use swc_common::errors::{ColorConfig, Handler};
use swc_common::sync::Lrc;
use swc_common::{BytePos, FileName, SourceMap, Span};
use swc_ecma_ast::{EsVersion, ImportSpecifier, Module, ModuleDecl, ModuleItem};
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax, TsConfig};

use crate::error::{Error, Result};
use crate::model::{ImportRecord, Position};

/// AST + source text + top-level import list for one file, with source
/// coordinates resolvable against the file's own `SourceMap`.
pub struct ParsedFile {
    pub path: PathBuf,
    pub module: Module,
    pub source_text: Arc<str>,
    pub imports: Vec<ImportRecord>,
    source_map: Lrc<SourceMap>,
}

impl ParsedFile {
    /// Resolves an AST node's span into a 1-based `(line, column)`,
    /// spec.md §4.1's "preserve source coordinates" requirement.
    pub fn position_of(&self, span: Span) -> Position {
        let loc = self.source_map.lookup_char_pos(span.lo());
        Position::new(loc.line, loc.col_display + 1)
    }
}

pub trait ParserFacade {
    fn parse(&self, path: &Path) -> Result<ParsedFile>;
    fn parse_source(&self, path: &Path, source_text: &str) -> Result<ParsedFile>;
}

/// The real front end: parses TS/TSX/JS/JSX under one relaxed
/// `Syntax::Typescript` configuration.
#[derive(Default)]
pub struct SwcParserFacade;

impl SwcParserFacade {
    pub fn new() -> Self {
        Self
    }

    fn syntax() -> Syntax {
        Syntax::Typescript(TsConfig { tsx: true, decorators: true, ..Default::default() })
    }
}

impl ParserFacade for SwcParserFacade {
    fn parse(&self, path: &Path) -> Result<ParsedFile> {
        let source_text = std::fs::read_to_string(path).map_err(|e| Error::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        self.parse_source(path, &source_text)
    }

    fn parse_source(&self, path: &Path, source_text: &str) -> Result<ParsedFile> {
        let cm: Lrc<SourceMap> = Default::default();
        let fm = cm.new_source_file(FileName::Real(path.to_path_buf()), source_text.to_string());

        // Collects parser diagnostics into a buffer; swc's `Handler` wants a
        // writer, not a return value, so failures are detected via the
        // emitted-error count rather than the `Handler` itself.
        let handler = Handler::with_tty_emitter(ColorConfig::Never, false, false, Some(cm.clone()));

        let lexer = Lexer::new(
            Self::syntax(),
            EsVersion::EsNext,
            StringInput::from(&*fm),
            None,
        );
        let mut parser = Parser::new_from(lexer);
        let module = parser.parse_module().map_err(|e| Error::Parse {
            file: path.to_path_buf(),
            reason: format!("{:?}", e.into_kind()),
        })?;

        for err in parser.take_errors() {
            handler.struct_err(&format!("{:?}", err.into_kind())).emit();
        }
        if handler.has_errors() {
            return Err(Error::Parse {
                file: path.to_path_buf(),
                reason: "parser reported recoverable errors on malformed syntax".to_string(),
            });
        }

        let imports = extract_imports(&module, &cm);

        Ok(ParsedFile {
            path: path.to_path_buf(),
            module,
            source_text: Arc::from(source_text),
            imports,
            source_map: cm,
        })
    }
}

fn extract_imports(module: &Module, cm: &Lrc<SourceMap>) -> Vec<ImportRecord> {
    let mut imports = Vec::new();
    for item in &module.body {
        if let ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) = item {
            let line = cm.lookup_char_pos(decl.span.lo()).line;
            let imported_names = decl
                .specifiers
                .iter()
                .filter_map(|spec| match spec {
                    ImportSpecifier::Named(n) => Some(n.local.sym.to_string()),
                    ImportSpecifier::Default(d) => Some(d.local.sym.to_string()),
                    ImportSpecifier::Namespace(n) => Some(n.local.sym.to_string()),
                })
                .collect();
            imports.push(ImportRecord {
                source: decl.src.value.to_string(),
                resolved_path: None,
                imported_names,
                line,
            });
        }
    }
    imports
}

/// Dummy byte position used only by unit tests that build synthetic spans.
#[allow(dead_code)]
fn dummy_span() -> Span {
    Span::new(BytePos(0), BytePos(0), Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_function_component_with_hooks() {
        let src = "function C() {\n  const [n, setN] = useState(0);\n  useEffect(() => { setN(n + 1); }, [n]);\n  return null;\n}\n";
        let facade = SwcParserFacade::new();
        let parsed = facade.parse_source(Path::new("C.tsx"), src).unwrap();
        assert!(!parsed.module.body.is_empty());
    }

    #[test]
    fn extracts_named_and_default_imports() {
        let src = "import React, { useState, useEffect } from 'react';\nfunction C() { return null; }\n";
        let facade = SwcParserFacade::new();
        let parsed = facade.parse_source(Path::new("C.tsx"), src).unwrap();
        assert_eq!(parsed.imports.len(), 1);
        assert_eq!(parsed.imports[0].source, "react");
        assert_eq!(parsed.imports[0].imported_names.len(), 3);
    }

    #[test]
    fn malformed_source_yields_parse_error() {
        let src = "function C( {\n  return <<<\n";
        let facade = SwcParserFacade::new();
        assert!(facade.parse_source(Path::new("C.tsx"), src).is_err());
    }
}
