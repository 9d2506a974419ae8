//! Symbol table types.
//!
//! A symbol is the identity of a named entity across the whole program.
//! Declarations that TypeScript merges (a class and an interface of the same
//! name, re-opened namespaces) share one [`SymbolId`].

use oxc_span::Span;
use vernis_carton::{bitflags, CompactString, FxHashMap, SmallVec};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            #[inline]
            pub const fn as_u32(self) -> u32 {
                self.0
            }

            #[inline]
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id!(
    /// Unique identifier for a source unit
    FileId
);
define_id!(
    /// Unique identifier for a symbol
    SymbolId
);
define_id!(
    /// Unique identifier for a lexical scope
    ScopeId
);
define_id!(
    /// Unique identifier for a class or interface declaration
    DeclId
);

bitflags! {
    /// What kinds of declarations contributed to a symbol
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SymbolFlags: u16 {
        const CLASS = 1 << 0;
        const INTERFACE = 1 << 1;
        const NAMESPACE = 1 << 2;
        /// A source file or `declare module "name"` block
        const MODULE = 1 << 3;
        const FUNCTION = 1 << 4;
        const VARIABLE = 1 << 5;
        const ENUM = 1 << 6;
        const TYPE_ALIAS = 1 << 7;
        /// Import or re-export binding; see [`AliasTarget`]
        const ALIAS = 1 << 8;
    }
}

/// Dotted entity name such as `React.Component`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityName(SmallVec<[CompactString; 2]>);

impl EntityName {
    pub fn new(segments: SmallVec<[CompactString; 2]>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self(segments))
        }
    }

    pub fn from_dotted(name: &str) -> Option<Self> {
        Self::new(name.split('.').map(CompactString::from).collect())
    }

    #[inline]
    pub fn segments(&self) -> &[CompactString] {
        &self.0
    }

    #[inline]
    pub fn first(&self) -> &str {
        &self.0[0]
    }

    #[inline]
    pub fn rest(&self) -> &[CompactString] {
        &self.0[1..]
    }
}

impl std::fmt::Display for EntityName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

/// A module specifier as written in an import, remembered with the file it
/// appeared in so it can be resolved relative to that file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpecifier {
    pub from: FileId,
    pub specifier: CompactString,
}

/// What an alias symbol stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasTarget {
    /// `import * as x from "m"`, `import x = require("m")`,
    /// `export * as x from "m"`
    Namespace(ModuleSpecifier),
    /// `export as namespace x` inside the module itself
    OwnModule(FileId),
    /// `import x from "m"`
    Default(ModuleSpecifier),
    /// `import { name as x } from "m"`, `export { name as x } from "m"`
    Member(ModuleSpecifier, CompactString),
    /// `import x = A.B`, `const x = A.B`, `type x = A.B`,
    /// `export { a as x }`, `export default a`
    Entity { scope: ScopeId, name: EntityName },
}

/// Kind of a single declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Class(DeclId),
    Interface(DeclId),
    Namespace(ScopeId),
    Module,
    Function,
    Variable,
    Enum,
    TypeAlias,
    Import,
}

/// One declaration site contributing to a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub file: FileId,
    pub span: Span,
}

impl Declaration {
    /// The class or interface behind this declaration, if any.
    #[inline]
    pub fn class_like(&self) -> Option<DeclId> {
        match self.kind {
            DeclarationKind::Class(id) | DeclarationKind::Interface(id) => Some(id),
            _ => None,
        }
    }
}

/// A symbol in the program-wide table.
#[derive(Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: CompactString,
    pub flags: SymbolFlags,
    pub declarations: Vec<Declaration>,
    /// Exported members of a namespace or module
    pub(crate) members: FxHashMap<CompactString, SymbolId>,
    pub(crate) alias: Option<AliasTarget>,
    /// `export = <entity>` of a module symbol
    pub(crate) export_equals: Option<(ScopeId, EntityName)>,
    /// `export * from "m"` of a module symbol
    pub(crate) star_exports: Vec<ModuleSpecifier>,
}

impl Symbol {
    pub(crate) fn new(id: SymbolId, name: impl Into<CompactString>) -> Self {
        Self {
            id,
            name: name.into(),
            flags: SymbolFlags::empty(),
            declarations: Vec::new(),
            members: FxHashMap::default(),
            alias: None,
            export_equals: None,
            star_exports: Vec::new(),
        }
    }

    #[inline]
    pub fn is_alias(&self) -> bool {
        self.alias.is_some()
    }

    /// Exported member names, unordered.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(|k| k.as_str())
    }
}
