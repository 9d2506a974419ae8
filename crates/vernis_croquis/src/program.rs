//! The bound program and its read-only queries.

use std::path::{Path, PathBuf};

use oxc_span::Span;
use vernis_carton::{normalize_path, CompactString, FxHashMap, FxHashSet};

use crate::modules::{self, PackagePattern};
use crate::scope::{ClassLike, HeritageRef, ScopeKind};
use crate::source::SourceUnit;
use crate::symbol::{
    AliasTarget, DeclId, Declaration, EntityName, FileId, ScopeId, Symbol, SymbolFlags, SymbolId,
};
use crate::table::SymbolTable;

/// A set of parsed and bound source units.
///
/// Built once by [`crate::ProgramBuilder`] or [`crate::ProjectLoader`] and
/// never mutated afterwards. Every query is a pure read.
pub struct Program<'a> {
    units: Vec<SourceUnit<'a>>,
    table: SymbolTable,
    path_index: FxHashMap<PathBuf, FileId>,
    resolutions: FxHashMap<(FileId, CompactString), PathBuf>,
}

/// In-progress sets guarding alias and re-export cycles during one query.
#[derive(Default)]
struct Guard {
    aliases: FxHashSet<SymbolId>,
    modules: FxHashSet<SymbolId>,
}

impl<'a> Program<'a> {
    pub(crate) fn new(
        units: Vec<SourceUnit<'a>>,
        table: SymbolTable,
        path_index: FxHashMap<PathBuf, FileId>,
        resolutions: FxHashMap<(FileId, CompactString), PathBuf>,
    ) -> Self {
        Self {
            units,
            table,
            path_index,
            resolutions,
        }
    }

    pub fn units(&self) -> &[SourceUnit<'a>] {
        &self.units
    }

    pub fn unit(&self, file: FileId) -> Option<&SourceUnit<'a>> {
        self.units.get(file.index())
    }

    /// Look up a unit by path. The path is normalized first.
    pub fn file_id(&self, path: impl AsRef<Path>) -> Option<FileId> {
        self.path_index.get(&normalize_path(path.as_ref())).copied()
    }

    /// Units the rule audits, in load order.
    pub fn lint_targets(&self) -> impl Iterator<Item = &SourceUnit<'a>> {
        self.units.iter().filter(|unit| unit.is_lint_target())
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.table
    }

    #[inline]
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        self.table.symbol(id)
    }

    #[inline]
    pub fn declarations_of(&self, id: SymbolId) -> &[Declaration] {
        &self.table.symbol(id).declarations
    }

    #[inline]
    pub fn class_like(&self, id: DeclId) -> &ClassLike {
        self.table.class_like(id)
    }

    /// The class-like record of the class or interface node at `span`.
    #[inline]
    pub fn class_like_at(&self, file: FileId, span: Span) -> Option<DeclId> {
        self.table.class_like_at(file, span)
    }

    /// Resolve a heritage entry to the symbol it names, following aliases.
    pub fn resolve_type_of(&self, heritage: &HeritageRef) -> Option<SymbolId> {
        let name = heritage.name.as_ref()?;
        let resolved = self.resolve_entity(heritage.scope, name);
        if resolved.is_none() {
            tracing::trace!("unresolved heritage `{}`", name);
        }
        resolved
    }

    /// Resolve a dotted name in `scope`, following aliases.
    pub fn resolve_entity(&self, scope: ScopeId, name: &EntityName) -> Option<SymbolId> {
        self.resolve_entity_in(scope, name, &mut Guard::default())
    }

    /// Resolve a dotted name as seen from the top level of `file`.
    pub fn resolve_name(&self, file: FileId, name: &str) -> Option<SymbolId> {
        let entity = EntityName::from_dotted(name)?;
        self.resolve_entity(self.table.file_scope(file), &entity)
    }

    /// Follow `symbol` through aliases to the symbol it stands for.
    pub fn resolve_alias(&self, symbol: SymbolId) -> Option<SymbolId> {
        self.resolve_alias_in(symbol, &mut Guard::default())
    }

    /// Module symbol for `specifier` as written in `from`.
    pub fn resolve_module(&self, from: FileId, specifier: &str) -> Option<SymbolId> {
        if let Some(path) = self
            .resolutions
            .get(&(from, CompactString::from(specifier)))
        {
            if let Some(module) = self
                .path_index
                .get(path)
                .and_then(|file| self.table.file_module(*file))
            {
                return Some(module);
            }
        }

        if let Some(module) = self.ambient_module(specifier) {
            return Some(module);
        }

        if modules::is_relative(specifier) {
            let dir = self.unit(from)?.path.parent()?;
            let base = normalize_path(&dir.join(specifier));
            modules::candidate_paths(&base)
                .iter()
                .find_map(|candidate| self.path_index.get(candidate))
                .and_then(|file| self.table.file_module(*file))
        } else if modules::package_name(specifier) == specifier {
            self.find_package_unit(specifier)
                .and_then(|file| self.table.file_module(file))
        } else {
            None
        }
    }

    /// The export `name` of a module symbol, resolved.
    pub fn module_export(&self, module: SymbolId, name: &str) -> Option<SymbolId> {
        self.module_export_in(module, name, &mut Guard::default())
    }

    /// Module symbol of a package's type entry point.
    pub fn find_package_module(&self, package: &str) -> Option<SymbolId> {
        self.find_package_unit(package)
            .and_then(|file| self.table.file_module(file))
            .or_else(|| self.table.ambient_modules.get(package).copied())
    }

    /// Resolve the export `export` of `package`, following `export =`.
    pub fn find_package_export(&self, package: &str, export: &str) -> Option<SymbolId> {
        let module = self.find_package_module(package)?;
        self.module_export(module, export)
    }

    fn find_package_unit(&self, package: &str) -> Option<FileId> {
        let pattern = match PackagePattern::new(package) {
            Ok(pattern) => pattern,
            Err(err) => {
                tracing::debug!("invalid package pattern for {package}: {err}");
                return None;
            }
        };
        self.units
            .iter()
            .filter(|unit| unit.is_declaration())
            .filter_map(|unit| {
                pattern
                    .rank(&unit.display_path())
                    .map(|rank| (rank, unit.id))
            })
            .min()
            .map(|(_, file)| file)
    }

    fn ambient_module(&self, specifier: &str) -> Option<SymbolId> {
        if let Some(module) = self.table.ambient_modules.get(specifier) {
            return Some(*module);
        }
        self.table
            .ambient_modules
            .iter()
            .filter(|(pattern, _)| pattern.contains('*'))
            .filter(|(pattern, _)| modules::matches_ambient_pattern(pattern, specifier))
            .map(|(_, module)| *module)
            .min()
    }

    /// Lexical lookup without alias resolution.
    fn lookup(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut next = Some(scope);
        while let Some(id) = next {
            let scope = self.table.scope(id);
            if let Some(symbol) = scope.binding(name) {
                return Some(symbol);
            }
            // Re-opened namespaces see each other's exports
            if scope.kind == ScopeKind::Namespace {
                if let Some(owner) = scope.owner {
                    if let Some(symbol) = self.table.symbol(owner).members.get(name) {
                        return Some(*symbol);
                    }
                }
            }
            next = scope.parent;
        }
        None
    }

    fn resolve_entity_in(
        &self,
        scope: ScopeId,
        name: &EntityName,
        guard: &mut Guard,
    ) -> Option<SymbolId> {
        let first = self.lookup(scope, name.first())?;
        let mut current = self.resolve_alias_in(first, guard)?;
        for segment in name.rest() {
            let member = self.member_of(current, segment, guard)?;
            current = self.resolve_alias_in(member, guard)?;
        }
        Some(current)
    }

    fn resolve_alias_in(&self, symbol: SymbolId, guard: &mut Guard) -> Option<SymbolId> {
        let Some(target) = &self.table.symbol(symbol).alias else {
            return Some(symbol);
        };
        if !guard.aliases.insert(symbol) {
            tracing::trace!("alias cycle through `{}`", self.table.symbol(symbol).name);
            return None;
        }

        let resolved = match target {
            AliasTarget::Namespace(spec) => self
                .resolve_module(spec.from, &spec.specifier)
                .and_then(|module| self.module_target(module, guard)),
            AliasTarget::OwnModule(file) => self
                .table
                .file_module(*file)
                .and_then(|module| self.module_target(module, guard)),
            AliasTarget::Default(spec) => {
                self.resolve_module(spec.from, &spec.specifier)
                    .and_then(|module| {
                        if self.table.symbol(module).export_equals.is_some() {
                            self.module_target(module, guard)
                        } else {
                            self.module_export_in(module, "default", guard)
                        }
                    })
            }
            AliasTarget::Member(spec, name) => self
                .resolve_module(spec.from, &spec.specifier)
                .and_then(|module| self.module_export_in(module, name, guard)),
            AliasTarget::Entity { scope, name } => self.resolve_entity_in(*scope, name, guard),
        };

        guard.aliases.remove(&symbol);
        resolved
    }

    /// What importing the whole module yields: its `export =` target, or the
    /// module itself.
    fn module_target(&self, module: SymbolId, guard: &mut Guard) -> Option<SymbolId> {
        match &self.table.symbol(module).export_equals {
            Some((scope, name)) => self.resolve_entity_in(*scope, name, guard),
            None => Some(module),
        }
    }

    /// Unresolved member of a namespace-like symbol.
    fn member_of(&self, symbol: SymbolId, name: &str, guard: &mut Guard) -> Option<SymbolId> {
        let data = self.table.symbol(symbol);
        if data.flags.contains(SymbolFlags::MODULE) {
            return self.module_export_in(symbol, name, guard);
        }
        data.members.get(name).copied()
    }

    fn module_export_in(&self, module: SymbolId, name: &str, guard: &mut Guard) -> Option<SymbolId> {
        if !guard.modules.insert(module) {
            tracing::trace!("re-export cycle through `{}`", self.table.symbol(module).name);
            return None;
        }
        let result = self.module_export_inner(module, name, guard);
        guard.modules.remove(&module);
        result
    }

    fn module_export_inner(
        &self,
        module: SymbolId,
        name: &str,
        guard: &mut Guard,
    ) -> Option<SymbolId> {
        let data = self.table.symbol(module);

        if let Some((scope, entity)) = &data.export_equals {
            let target = self.resolve_entity_in(*scope, entity, guard)?;
            if target == module {
                return None;
            }
            let member = self.member_of(target, name, guard)?;
            return self.resolve_alias_in(member, guard);
        }

        if let Some(member) = data.members.get(name) {
            return self.resolve_alias_in(*member, guard);
        }

        // `export *` never re-exports `default`
        if name == "default" {
            return None;
        }
        data.star_exports.iter().find_map(|spec| {
            self.resolve_module(spec.from, &spec.specifier)
                .and_then(|source| self.module_export_in(source, name, guard))
        })
    }
}

impl std::fmt::Debug for Program<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("units", &self.units.len())
            .field("symbols", &self.table.symbol_count())
            .finish()
    }
}
