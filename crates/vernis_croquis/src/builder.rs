//! Incremental construction of a [`Program`].

use std::path::{Path, PathBuf};

use oxc_allocator::Allocator;
use oxc_ast::ast::{Statement, TSModuleReference};
use vernis_carton::{normalize_path, CompactString, FxHashMap};

use crate::binder::Binder;
use crate::program::Program;
use crate::source::SourceUnit;
use crate::symbol::FileId;
use crate::table::SymbolTable;

/// Collects source units, then binds them into a [`Program`].
///
/// ```
/// use oxc_allocator::Allocator;
/// use vernis_croquis::ProgramBuilder;
///
/// let allocator = Allocator::default();
/// let mut builder = ProgramBuilder::new(&allocator);
/// let file = builder.add_source("src/App.tsx", "export class App {}");
/// let program = builder.build();
/// assert!(program.resolve_name(file, "App").is_some());
/// ```
pub struct ProgramBuilder<'a> {
    allocator: &'a Allocator,
    units: Vec<SourceUnit<'a>>,
    path_index: FxHashMap<PathBuf, FileId>,
    resolutions: FxHashMap<(FileId, CompactString), PathBuf>,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(allocator: &'a Allocator) -> Self {
        Self {
            allocator,
            units: Vec::new(),
            path_index: FxHashMap::default(),
            resolutions: FxHashMap::default(),
        }
    }

    /// Parse `text` as the file at `path`. A path that was already added
    /// keeps its first contents.
    pub fn add_source(&mut self, path: impl AsRef<Path>, text: &str) -> FileId {
        let path = normalize_path(path.as_ref());
        if let Some(file) = self.path_index.get(&path) {
            return *file;
        }

        let file = FileId::new(self.units.len() as u32);
        let unit = SourceUnit::parse(self.allocator, file, path.clone(), text);
        self.units.push(unit);
        self.path_index.insert(path, file);
        file
    }

    pub fn file_id(&self, path: impl AsRef<Path>) -> Option<FileId> {
        self.path_index.get(&normalize_path(path.as_ref())).copied()
    }

    pub fn unit(&self, file: FileId) -> Option<&SourceUnit<'a>> {
        self.units.get(file.index())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Module specifiers `file` depends on, in source order.
    pub fn import_specifiers(&self, file: FileId) -> Vec<CompactString> {
        let Some(unit) = self.unit(file) else {
            return Vec::new();
        };

        let mut specifiers = Vec::new();
        for stmt in unit.ast.body.iter() {
            let specifier = match stmt {
                Statement::ImportDeclaration(decl) => Some(decl.source.value.as_str()),
                Statement::ExportAllDeclaration(decl) => Some(decl.source.value.as_str()),
                Statement::ExportNamedDeclaration(decl) => {
                    decl.source.as_ref().map(|source| source.value.as_str())
                }
                Statement::TSImportEqualsDeclaration(decl) => match &decl.module_reference {
                    TSModuleReference::ExternalModuleReference(external) => {
                        Some(external.expression.value.as_str())
                    }
                    _ => None,
                },
                _ => None,
            };
            if let Some(specifier) = specifier {
                if !specifiers.iter().any(|s: &CompactString| s == specifier) {
                    specifiers.push(CompactString::from(specifier));
                }
            }
        }
        specifiers
    }

    /// Remember that `specifier` in `from` resolved to `resolved` on disk.
    pub fn record_resolution(&mut self, from: FileId, specifier: &str, resolved: impl AsRef<Path>) {
        self.resolutions.insert(
            (from, CompactString::from(specifier)),
            normalize_path(resolved.as_ref()),
        );
    }

    /// Bind every unit and freeze the program.
    pub fn build(self) -> Program<'a> {
        let mut table = SymbolTable::new();
        for unit in &self.units {
            Binder::bind(&mut table, unit);
        }
        tracing::debug!(
            "bound {} units into {} symbols",
            self.units.len(),
            table.symbol_count()
        );
        Program::new(self.units, table, self.path_index, self.resolutions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_source_dedupes_normalized_path() {
        let allocator = Allocator::default();
        let mut builder = ProgramBuilder::new(&allocator);
        let a = builder.add_source("/p/src/App.tsx", "");
        let b = builder.add_source("/p/src/../src/./App.tsx", "class Other {}");
        assert_eq!(a, b);
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_import_specifiers() {
        let allocator = Allocator::default();
        let mut builder = ProgramBuilder::new(&allocator);
        let file = builder.add_source(
            "/p/a.ts",
            r#"
import * as React from "react";
import { B } from "./b";
import type { C } from "./b";
export * from "./c";
export { D } from "./d";
import E = require("./e");
export const local = 1;
"#,
        );
        let specifiers = builder.import_specifiers(file);
        assert_eq!(specifiers, vec!["react", "./b", "./c", "./d", "./e"]);
    }

    #[test]
    fn test_record_resolution_is_used() {
        let allocator = Allocator::default();
        let mut builder = ProgramBuilder::new(&allocator);
        let app = builder.add_source("/p/src/App.ts", r#"import { Base } from "lib";"#);
        builder.add_source("/p/vendor/lib/main.d.ts", "export declare class Base {}");
        builder.record_resolution(app, "lib", "/p/vendor/lib/main.d.ts");
        let program = builder.build();

        let module = program.resolve_module(app, "lib").unwrap();
        assert!(program.module_export(module, "Base").is_some());
        assert!(program.resolve_name(app, "Base").is_some());
    }
}
