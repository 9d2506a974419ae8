//! Lexical scopes and class-like declaration records.

use oxc_span::Span;
use vernis_carton::{CompactString, FxHashMap};

use crate::symbol::{DeclId, EntityName, FileId, ScopeId, SymbolId};

/// The kind of a lexical scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Shared by every script file and `declare global` block
    Global,
    /// Top level of a file with imports or exports
    Module,
    /// `namespace X {}` or `declare module "x" {}` body
    Namespace,
    Function,
    Block,
}

/// A lexical scope
#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// Namespace or module symbol whose exported members are visible here
    pub owner: Option<SymbolId>,
    pub(crate) bindings: FxHashMap<CompactString, SymbolId>,
}

impl Scope {
    pub(crate) fn new(
        id: ScopeId,
        kind: ScopeKind,
        parent: Option<ScopeId>,
        owner: Option<SymbolId>,
    ) -> Self {
        Self {
            id,
            kind,
            parent,
            owner,
            bindings: FxHashMap::default(),
        }
    }

    /// Look up a binding declared directly in this scope.
    #[inline]
    pub fn binding(&self, name: &str) -> Option<SymbolId> {
        self.bindings.get(name).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassLikeKind {
    Class,
    Interface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeritageClause {
    Extends,
    Implements,
}

/// One `extends`/`implements` entry of a class-like declaration.
#[derive(Debug, Clone)]
pub struct HeritageRef {
    pub clause: HeritageClause,
    pub span: Span,
    /// Scope the name is resolved in (the scope declaring the class)
    pub scope: ScopeId,
    /// `None` when the heritage expression is not an entity name,
    /// e.g. `extends mixin(Base)`
    pub name: Option<EntityName>,
}

/// A class (declaration or expression) or interface declaration.
#[derive(Debug)]
pub struct ClassLike {
    pub id: DeclId,
    pub kind: ClassLikeKind,
    pub file: FileId,
    pub span: Span,
    pub name: Option<CompactString>,
    pub scope: ScopeId,
    pub heritage: Vec<HeritageRef>,
}

impl ClassLike {
    #[inline]
    pub fn is_class(&self) -> bool {
        self.kind == ClassLikeKind::Class
    }

    /// Name for messages; anonymous classes render as `<anonymous>`.
    #[inline]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}
