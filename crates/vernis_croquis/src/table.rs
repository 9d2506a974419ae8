//! Program-wide symbol, scope and class-like tables.

use oxc_span::Span;
use vernis_carton::{CompactString, FxHashMap};

use crate::scope::{ClassLike, Scope, ScopeKind};
use crate::symbol::{
    AliasTarget, DeclId, Declaration, DeclarationKind, FileId, ScopeId, Symbol, SymbolFlags,
    SymbolId,
};

/// The global scope shared by every script file.
pub const GLOBAL_SCOPE: ScopeId = ScopeId::new(0);

/// Tables filled by the binder, read-only afterwards.
#[derive(Debug)]
pub struct SymbolTable {
    pub(crate) symbols: Vec<Symbol>,
    pub(crate) scopes: Vec<Scope>,
    pub(crate) class_likes: Vec<ClassLike>,
    /// `(file, start, end)` of a class or interface node
    decl_index: FxHashMap<(FileId, u32, u32), DeclId>,
    /// Top-level scope of each file
    pub(crate) file_scopes: Vec<ScopeId>,
    /// Module symbol of each module file, `None` for scripts
    pub(crate) file_modules: Vec<Option<SymbolId>>,
    /// `declare module "name"` blocks
    pub(crate) ambient_modules: FxHashMap<CompactString, SymbolId>,
}

impl SymbolTable {
    pub(crate) fn new() -> Self {
        Self {
            symbols: Vec::new(),
            scopes: vec![Scope::new(GLOBAL_SCOPE, ScopeKind::Global, None, None)],
            class_likes: Vec::new(),
            decl_index: FxHashMap::default(),
            file_scopes: Vec::new(),
            file_modules: Vec::new(),
            ambient_modules: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    #[inline]
    pub(crate) fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    #[inline]
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    #[inline]
    pub fn class_like(&self, id: DeclId) -> &ClassLike {
        &self.class_likes[id.index()]
    }

    pub fn class_like_at(&self, file: FileId, span: Span) -> Option<DeclId> {
        self.decl_index
            .get(&(file, span.start, span.end))
            .copied()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Top-level scope of `file`.
    pub fn file_scope(&self, file: FileId) -> ScopeId {
        self.file_scopes
            .get(file.index())
            .copied()
            .unwrap_or(GLOBAL_SCOPE)
    }

    /// Module symbol of `file`, if it is a module.
    pub fn file_module(&self, file: FileId) -> Option<SymbolId> {
        self.file_modules.get(file.index()).copied().flatten()
    }

    pub(crate) fn add_scope(
        &mut self,
        kind: ScopeKind,
        parent: ScopeId,
        owner: Option<SymbolId>,
    ) -> ScopeId {
        let id = ScopeId::new(self.scopes.len() as u32);
        self.scopes.push(Scope::new(id, kind, Some(parent), owner));
        id
    }

    pub(crate) fn register_file(&mut self, file: FileId, scope: ScopeId, module: Option<SymbolId>) {
        let index = file.index();
        if self.file_scopes.len() <= index {
            self.file_scopes.resize(index + 1, GLOBAL_SCOPE);
            self.file_modules.resize(index + 1, None);
        }
        self.file_scopes[index] = scope;
        self.file_modules[index] = module;
    }

    /// Create a symbol that is not bound in any scope.
    pub(crate) fn new_symbol(&mut self, name: &str, flags: SymbolFlags) -> SymbolId {
        let id = SymbolId::new(self.symbols.len() as u32);
        let mut symbol = Symbol::new(id, name);
        symbol.flags = flags;
        self.symbols.push(symbol);
        id
    }

    /// Bind `name` in `scope`, merging with an existing binding of the same
    /// name.
    pub(crate) fn declare(&mut self, scope: ScopeId, name: &str, flags: SymbolFlags) -> SymbolId {
        if let Some(existing) = self.scopes[scope.index()].binding(name) {
            self.symbol_mut(existing).flags |= flags;
            return existing;
        }
        let id = self.new_symbol(name, flags);
        self.scopes[scope.index()]
            .bindings
            .insert(CompactString::from(name), id);
        id
    }

    pub(crate) fn add_declaration(&mut self, symbol: SymbolId, declaration: Declaration) {
        self.symbol_mut(symbol).declarations.push(declaration);
    }

    /// Make `symbol` an alias unless it already is one.
    pub(crate) fn set_alias(&mut self, symbol: SymbolId, target: AliasTarget) {
        let symbol = self.symbol_mut(symbol);
        symbol.flags |= SymbolFlags::ALIAS;
        if symbol.alias.is_none() {
            symbol.alias = Some(target);
        }
    }

    /// Record `symbol` as the export `name` of a module or namespace.
    pub(crate) fn export(&mut self, container: SymbolId, name: &str, symbol: SymbolId) {
        self.symbol_mut(container)
            .members
            .insert(CompactString::from(name), symbol);
    }

    pub(crate) fn add_class_like(&mut self, mut class_like: ClassLike) -> DeclId {
        let id = DeclId::new(self.class_likes.len() as u32);
        class_like.id = id;
        self.decl_index.insert(
            (class_like.file, class_like.span.start, class_like.span.end),
            id,
        );
        self.class_likes.push(class_like);
        id
    }

    /// Symbol of `declare module "name"`, shared by every block with that name.
    pub(crate) fn ambient_module(&mut self, name: &str, file: FileId, span: Span) -> SymbolId {
        let id = match self.ambient_modules.get(name) {
            Some(id) => *id,
            None => {
                let id = self.new_symbol(name, SymbolFlags::MODULE);
                self.ambient_modules.insert(CompactString::from(name), id);
                id
            }
        };
        self.add_declaration(
            id,
            Declaration {
                kind: DeclarationKind::Module,
                file,
                span,
            },
        );
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_merges_same_name() {
        let mut table = SymbolTable::new();
        let a = table.declare(GLOBAL_SCOPE, "Component", SymbolFlags::CLASS);
        let b = table.declare(GLOBAL_SCOPE, "Component", SymbolFlags::INTERFACE);
        assert_eq!(a, b);
        assert!(table
            .symbol(a)
            .flags
            .contains(SymbolFlags::CLASS | SymbolFlags::INTERFACE));
    }

    #[test]
    fn test_declare_in_separate_scopes() {
        let mut table = SymbolTable::new();
        let inner = table.add_scope(ScopeKind::Block, GLOBAL_SCOPE, None);
        let a = table.declare(GLOBAL_SCOPE, "A", SymbolFlags::CLASS);
        let b = table.declare(inner, "A", SymbolFlags::CLASS);
        assert_ne!(a, b);
        assert_eq!(table.scope(inner).parent, Some(GLOBAL_SCOPE));
    }

    #[test]
    fn test_ambient_module_reopened() {
        let mut table = SymbolTable::new();
        let a = table.ambient_module("react", FileId::new(0), Span::new(0, 10));
        let b = table.ambient_module("react", FileId::new(1), Span::new(0, 10));
        assert_eq!(a, b);
        assert_eq!(table.symbol(a).declarations.len(), 2);
    }

    #[test]
    fn test_set_alias_keeps_first() {
        let mut table = SymbolTable::new();
        let s = table.declare(GLOBAL_SCOPE, "R", SymbolFlags::empty());
        table.set_alias(s, AliasTarget::OwnModule(FileId::new(0)));
        table.set_alias(s, AliasTarget::OwnModule(FileId::new(1)));
        assert_eq!(
            table.symbol(s).alias,
            Some(AliasTarget::OwnModule(FileId::new(0)))
        );
    }
}
