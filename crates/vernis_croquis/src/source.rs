//! Parsed source units.

use std::path::{Path, PathBuf};

use oxc_allocator::Allocator;
use oxc_ast::ast::Program as AstProgram;
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::Parser;
use oxc_span::{SourceType, Span};
use vernis_carton::LineIndex;

use crate::symbol::FileId;

/// One parsed file. Immutable once built.
pub struct SourceUnit<'a> {
    pub id: FileId,
    /// Normalized path, also the unit's identity
    pub path: PathBuf,
    pub source_text: &'a str,
    pub source_type: SourceType,
    pub ast: AstProgram<'a>,
    pub line_index: LineIndex,
    /// Errors the parser recovered from
    pub parse_errors: Vec<OxcDiagnostic>,
}

impl<'a> SourceUnit<'a> {
    /// Parse `text` into a unit. The text is copied into the arena.
    pub(crate) fn parse(allocator: &'a Allocator, id: FileId, path: PathBuf, text: &str) -> Self {
        let source_text: &'a str = allocator.alloc_str(text);
        let source_type = source_type_for(&path);
        let ret = Parser::new(allocator, source_text, source_type).parse();

        if ret.panicked {
            tracing::warn!("parser gave up on {}", path.display());
        } else if !ret.errors.is_empty() {
            tracing::debug!(
                "{} parse error(s) recovered in {}",
                ret.errors.len(),
                path.display()
            );
        }

        Self {
            id,
            line_index: LineIndex::new(source_text),
            path,
            source_text,
            source_type,
            ast: ret.program,
            parse_errors: ret.errors,
        }
    }

    /// `.d.ts` and friends
    #[inline]
    pub fn is_declaration(&self) -> bool {
        self.source_type.is_typescript_definition()
    }

    /// Non-declaration `.tsx` files are the ones the rule audits.
    pub fn is_lint_target(&self) -> bool {
        !self.is_declaration()
            && self
                .path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("tsx"))
    }

    /// Source text covered by `span`.
    #[inline]
    pub fn text_of(&self, span: Span) -> &'a str {
        &self.source_text[span.start as usize..span.end as usize]
    }

    #[inline]
    pub fn has_parse_errors(&self) -> bool {
        !self.parse_errors.is_empty()
    }

    /// Path for display, with forward slashes.
    pub fn display_path(&self) -> String {
        vernis_carton::to_slash(&self.path)
    }

    /// File has `import`/`export` syntax and therefore its own module scope.
    pub fn is_module(&self) -> bool {
        use oxc_ast::ast::{Statement, TSModuleReference};

        self.ast.body.iter().any(|stmt| match stmt {
            Statement::ImportDeclaration(_)
            | Statement::ExportAllDeclaration(_)
            | Statement::ExportDefaultDeclaration(_)
            | Statement::ExportNamedDeclaration(_)
            | Statement::TSExportAssignment(_) => true,
            Statement::TSImportEqualsDeclaration(decl) => matches!(
                decl.module_reference,
                TSModuleReference::ExternalModuleReference(_)
            ),
            _ => false,
        })
    }
}

impl std::fmt::Debug for SourceUnit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceUnit")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("parse_errors", &self.parse_errors.len())
            .finish()
    }
}

/// `SourceType` from the extension; unknown extensions parse as TSX so the
/// rule still sees JSX.
fn source_type_for(path: &Path) -> SourceType {
    SourceType::from_path(path).unwrap_or_else(|_| SourceType::tsx())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<'a>(allocator: &'a Allocator, path: &str, text: &str) -> SourceUnit<'a> {
        SourceUnit::parse(allocator, FileId::new(0), PathBuf::from(path), text)
    }

    #[test]
    fn test_declaration_file() {
        let allocator = Allocator::default();
        let unit = parse(&allocator, "node_modules/@types/react/index.d.ts", "");
        assert!(unit.is_declaration());
        assert!(!unit.is_lint_target());
    }

    #[test]
    fn test_tsx_is_lint_target() {
        let allocator = Allocator::default();
        let unit = parse(&allocator, "src/App.tsx", "const a = <div />;");
        assert!(unit.is_lint_target());
        assert!(!unit.has_parse_errors());

        let ts = parse(&allocator, "src/util.ts", "export const a = 1;");
        assert!(!ts.is_lint_target());
    }

    #[test]
    fn test_is_module() {
        let allocator = Allocator::default();
        assert!(parse(&allocator, "a.ts", "export class A {}").is_module());
        assert!(parse(&allocator, "b.d.ts", "export = React;").is_module());
        assert!(!parse(&allocator, "c.d.ts", "declare class A {}").is_module());
    }

    #[test]
    fn test_text_of() {
        let allocator = Allocator::default();
        let unit = parse(&allocator, "a.ts", "class Foo {}");
        assert_eq!(unit.text_of(Span::new(6, 9)), "Foo");
    }

    #[test]
    fn test_recovers_from_parse_errors() {
        let allocator = Allocator::default();
        let unit = parse(&allocator, "broken.tsx", "class { render( }");
        assert!(unit.has_parse_errors());
    }
}
