//! Transitive component-class resolution.
//!
//! A class-like declaration is a component when one of its heritage clauses
//! names the base component symbol, directly or through any number of
//! intermediate classes and interfaces. The comparison is by [`SymbolId`]
//! only: a local class that happens to be called `Component` is not the base.

use vernis_carton::{FxHashSet, SmallVec};
use vernis_croquis::{DeclId, Program, SymbolId};

/// Decides whether class-like declarations derive from the base component.
#[derive(Debug, Clone)]
pub struct ComponentResolver<'p, 'a> {
    program: &'p Program<'a>,
    base: SymbolId,
    /// Class-like declarations of the base symbol itself
    base_decls: SmallVec<[DeclId; 2]>,
}

impl<'p, 'a> ComponentResolver<'p, 'a> {
    pub fn new(program: &'p Program<'a>, base: SymbolId) -> Self {
        let base_decls = program
            .declarations_of(base)
            .iter()
            .filter_map(|decl| decl.class_like())
            .collect();
        Self {
            program,
            base,
            base_decls,
        }
    }

    #[inline]
    pub fn base(&self) -> SymbolId {
        self.base
    }

    /// Whether `decl` is the base or derives from it.
    #[inline]
    pub fn is_component(&self, decl: DeclId) -> bool {
        self.resolve(decl, &mut FxHashSet::default())
    }

    /// Whether `decl` is the base or derives from it, skipping declarations
    /// already in `visited`.
    ///
    /// Declarations in `visited` count as known non-components. A query that
    /// returns false leaves everything it explored in the set; one that
    /// returns true restores the set to what it was, so one set can be shared
    /// across several queries. The walk uses an explicit stack and terminates
    /// on cyclic heritage.
    pub fn resolve(&self, decl: DeclId, visited: &mut FxHashSet<DeclId>) -> bool {
        if self.base_decls.contains(&decl) {
            return true;
        }
        if !visited.insert(decl) {
            return false;
        }

        // Entries added by this query; only a false answer proves them
        let mut added = vec![decl];
        let mut stack = vec![decl];
        while let Some(current) = stack.pop() {
            let class_like = self.program.class_like(current);

            for heritage in &class_like.heritage {
                let Some(symbol) = self.program.resolve_type_of(heritage) else {
                    tracing::trace!(
                        "unresolved heritage of {} at {}..{}",
                        class_like.display_name(),
                        heritage.span.start,
                        heritage.span.end
                    );
                    continue;
                };

                if symbol == self.base {
                    for decl in &added {
                        visited.remove(decl);
                    }
                    return true;
                }

                for parent in self.program.declarations_of(symbol) {
                    if let Some(parent) = parent.class_like() {
                        if visited.insert(parent) {
                            added.push(parent);
                            stack.push(parent);
                        }
                    }
                }
            }
        }

        false
    }
}
