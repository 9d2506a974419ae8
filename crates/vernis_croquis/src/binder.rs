//! Binder: walks one source unit and fills the shared [`SymbolTable`].
//!
//! Binding only records what each file declares. Names that refer to other
//! files (imports, re-exports, `export =`) are stored as [`AliasTarget`]s and
//! resolved lazily by [`crate::Program`], so units can be bound in any order.

use oxc_ast::ast::{
    ArrowFunctionExpression, BlockStatement, Class, ClassType, Declaration as AstDeclaration,
    ExportAllDeclaration, ExportDefaultDeclaration, ExportDefaultDeclarationKind,
    ExportNamedDeclaration, Expression, Function, FunctionType, ImportDeclaration,
    ImportDeclarationSpecifier, ModuleExportName, TSEnumDeclaration, TSExportAssignment,
    TSImportEqualsDeclaration, TSInterfaceDeclaration, TSModuleDeclaration,
    TSModuleDeclarationBody, TSModuleDeclarationName, TSModuleReference,
    TSNamespaceExportDeclaration, TSQualifiedName, TSType, TSTypeAliasDeclaration, TSTypeName,
    VariableDeclarator,
};
use oxc_ast_visit::{walk, Visit};
use oxc_span::{GetSpan, Span};
use oxc_syntax::scope::ScopeFlags;
use vernis_carton::{CompactString, SmallVec};

use crate::scope::{ClassLike, ClassLikeKind, HeritageClause, HeritageRef, ScopeKind};
use crate::source::SourceUnit;
use crate::symbol::{
    AliasTarget, DeclId, Declaration, DeclarationKind, EntityName, FileId, ModuleSpecifier,
    ScopeId, SymbolFlags, SymbolId,
};
use crate::table::{SymbolTable, GLOBAL_SCOPE};

pub(crate) struct Binder<'t> {
    table: &'t mut SymbolTable,
    file: FileId,
    scopes: Vec<ScopeId>,
    /// Nesting depth of ambient contexts (`.d.ts`, `declare namespace`)
    ambient_depth: u32,
}

impl<'t> Binder<'t> {
    /// Bind `unit` into `table`.
    pub(crate) fn bind(table: &'t mut SymbolTable, unit: &SourceUnit<'_>) {
        let file = unit.id;
        let (top, module) = if unit.is_module() {
            let module = table.new_symbol(&unit.display_path(), SymbolFlags::MODULE);
            table.add_declaration(
                module,
                Declaration {
                    kind: DeclarationKind::Module,
                    file,
                    span: unit.ast.span,
                },
            );
            let scope = table.add_scope(ScopeKind::Module, GLOBAL_SCOPE, Some(module));
            (scope, Some(module))
        } else {
            (GLOBAL_SCOPE, None)
        };
        table.register_file(file, top, module);

        let mut binder = Binder {
            table,
            file,
            scopes: vec![top],
            ambient_depth: u32::from(unit.is_declaration()),
        };
        binder.visit_program(&unit.ast);
        tracing::trace!("bound {}", unit.path.display());
    }

    #[inline]
    fn current(&self) -> ScopeId {
        self.scopes.last().copied().unwrap_or(GLOBAL_SCOPE)
    }

    /// Module or namespace symbol receiving exports of the current scope.
    #[inline]
    fn container(&self) -> Option<SymbolId> {
        self.table.scope(self.current()).owner
    }

    fn with_scope(&mut self, scope: ScopeId, f: impl FnOnce(&mut Self)) {
        self.scopes.push(scope);
        f(self);
        self.scopes.pop();
    }

    fn enter_new_scope(&mut self, kind: ScopeKind, owner: Option<SymbolId>) -> ScopeId {
        let parent = self.current();
        self.table.add_scope(kind, parent, owner)
    }

    fn specifier(&self, specifier: &str) -> ModuleSpecifier {
        ModuleSpecifier {
            from: self.file,
            specifier: CompactString::from(specifier),
        }
    }

    fn declaration(&self, kind: DeclarationKind, span: Span) -> Declaration {
        Declaration {
            kind,
            file: self.file,
            span,
        }
    }

    /// Declare `name` in the current scope. Members of ambient namespaces are
    /// exported implicitly.
    fn declare(
        &mut self,
        name: &str,
        flags: SymbolFlags,
        kind: DeclarationKind,
        span: Span,
    ) -> SymbolId {
        let scope = self.current();
        let symbol = self.table.declare(scope, name, flags);
        let declaration = self.declaration(kind, span);
        self.table.add_declaration(symbol, declaration);
        self.export_if_ambient(name, symbol);
        symbol
    }

    fn declare_alias(&mut self, name: &str, target: AliasTarget, span: Span) -> SymbolId {
        let scope = self.current();
        let symbol = self.table.declare(scope, name, SymbolFlags::ALIAS);
        let declaration = self.declaration(DeclarationKind::Import, span);
        self.table.add_declaration(symbol, declaration);
        self.table.set_alias(symbol, target);
        self.export_if_ambient(name, symbol);
        symbol
    }

    /// An alias that only exists as an export, e.g. `export { a } from "m"`.
    fn unbound_alias(&mut self, name: &str, target: AliasTarget, span: Span) -> SymbolId {
        let symbol = self.table.new_symbol(name, SymbolFlags::ALIAS);
        let declaration = self.declaration(DeclarationKind::Import, span);
        self.table.add_declaration(symbol, declaration);
        self.table.set_alias(symbol, target);
        symbol
    }

    fn export_if_ambient(&mut self, name: &str, symbol: SymbolId) {
        let scope = self.table.scope(self.current());
        if self.ambient_depth > 0 && scope.kind == ScopeKind::Namespace {
            if let Some(owner) = scope.owner {
                self.table.export(owner, name, symbol);
            }
        }
    }

    fn export(&mut self, name: &str, symbol: SymbolId) {
        if let Some(container) = self.container() {
            self.table.export(container, name, symbol);
        }
    }

    fn binding(&self, name: &str) -> Option<SymbolId> {
        self.table.scope(self.current()).binding(name)
    }

    fn add_class_like(
        &mut self,
        kind: ClassLikeKind,
        span: Span,
        name: Option<&str>,
        heritage: Vec<HeritageRef>,
    ) -> DeclId {
        self.table.add_class_like(ClassLike {
            id: DeclId::new(0),
            kind,
            file: self.file,
            span,
            name: name.map(CompactString::from),
            scope: self.current(),
            heritage,
        })
    }

    fn heritage(&self, clause: HeritageClause, span: Span, name: Option<EntityName>) -> HeritageRef {
        HeritageRef {
            clause,
            span,
            scope: self.current(),
            name,
        }
    }
}

impl<'a> Visit<'a> for Binder<'_> {
    fn visit_class(&mut self, it: &Class<'a>) {
        let mut heritage = Vec::new();
        if let Some(super_class) = &it.super_class {
            heritage.push(self.heritage(
                HeritageClause::Extends,
                super_class.span(),
                entity_from_expression(super_class),
            ));
        }
        for implements in it.implements.iter() {
            heritage.push(self.heritage(
                HeritageClause::Implements,
                implements.span,
                entity_from_type_name(&implements.expression),
            ));
        }

        let name = it.id.as_ref().map(|id| id.name.as_str());
        let decl = self.add_class_like(ClassLikeKind::Class, it.span, name, heritage);

        if matches!(it.r#type, ClassType::ClassDeclaration) {
            if let Some(id) = &it.id {
                self.declare(
                    id.name.as_str(),
                    SymbolFlags::CLASS,
                    DeclarationKind::Class(decl),
                    it.span,
                );
            }
        }

        walk::walk_class(self, it);
    }

    fn visit_ts_interface_declaration(&mut self, it: &TSInterfaceDeclaration<'a>) {
        let heritage = it
            .extends
            .iter()
            .map(|extends| {
                self.heritage(
                    HeritageClause::Extends,
                    extends.span,
                    entity_from_expression(&extends.expression),
                )
            })
            .collect();

        let name = it.id.name.as_str();
        let decl = self.add_class_like(ClassLikeKind::Interface, it.span, Some(name), heritage);
        self.declare(
            name,
            SymbolFlags::INTERFACE,
            DeclarationKind::Interface(decl),
            it.span,
        );

        walk::walk_ts_interface_declaration(self, it);
    }

    fn visit_function(&mut self, it: &Function<'a>, flags: ScopeFlags) {
        if matches!(
            it.r#type,
            FunctionType::FunctionDeclaration | FunctionType::TSDeclareFunction
        ) {
            if let Some(id) = &it.id {
                self.declare(
                    id.name.as_str(),
                    SymbolFlags::FUNCTION,
                    DeclarationKind::Function,
                    it.span,
                );
            }
        }

        let scope = self.enter_new_scope(ScopeKind::Function, None);
        self.with_scope(scope, |binder| walk::walk_function(binder, it, flags));
    }

    fn visit_arrow_function_expression(&mut self, it: &ArrowFunctionExpression<'a>) {
        let scope = self.enter_new_scope(ScopeKind::Function, None);
        self.with_scope(scope, |binder| {
            walk::walk_arrow_function_expression(binder, it);
        });
    }

    fn visit_block_statement(&mut self, it: &BlockStatement<'a>) {
        let scope = self.enter_new_scope(ScopeKind::Block, None);
        self.with_scope(scope, |binder| walk::walk_block_statement(binder, it));
    }

    fn visit_variable_declarator(&mut self, it: &VariableDeclarator<'a>) {
        // Walk first so a class initializer is registered before it is bound.
        walk::walk_variable_declarator(self, it);

        let Some(id) = it.id.get_binding_identifier() else {
            return;
        };
        let name = id.name.as_str();
        let init = it.init.as_ref().map(Expression::get_inner_expression);

        match init {
            Some(Expression::ClassExpression(class)) => {
                match self.table.class_like_at(self.file, class.span) {
                    Some(decl) => {
                        self.declare(
                            name,
                            SymbolFlags::VARIABLE | SymbolFlags::CLASS,
                            DeclarationKind::Class(decl),
                            it.span,
                        );
                    }
                    None => {
                        self.declare(name, SymbolFlags::VARIABLE, DeclarationKind::Variable, it.span);
                    }
                }
            }
            Some(expr) => match entity_from_expression(expr) {
                Some(entity) => {
                    let scope = self.current();
                    let symbol = self.declare(
                        name,
                        SymbolFlags::VARIABLE,
                        DeclarationKind::Variable,
                        it.span,
                    );
                    self.table.set_alias(
                        symbol,
                        AliasTarget::Entity {
                            scope,
                            name: entity,
                        },
                    );
                }
                None => {
                    self.declare(name, SymbolFlags::VARIABLE, DeclarationKind::Variable, it.span);
                }
            },
            None => {
                self.declare(name, SymbolFlags::VARIABLE, DeclarationKind::Variable, it.span);
            }
        }
    }

    fn visit_ts_type_alias_declaration(&mut self, it: &TSTypeAliasDeclaration<'a>) {
        let scope = self.current();
        let symbol = self.declare(
            it.id.name.as_str(),
            SymbolFlags::TYPE_ALIAS,
            DeclarationKind::TypeAlias,
            it.span,
        );
        if let TSType::TSTypeReference(reference) = &it.type_annotation {
            if let Some(entity) = entity_from_type_name(&reference.type_name) {
                self.table.set_alias(
                    symbol,
                    AliasTarget::Entity {
                        scope,
                        name: entity,
                    },
                );
            }
        }
        walk::walk_ts_type_alias_declaration(self, it);
    }

    fn visit_ts_enum_declaration(&mut self, it: &TSEnumDeclaration<'a>) {
        self.declare(
            it.id.name.as_str(),
            SymbolFlags::ENUM,
            DeclarationKind::Enum,
            it.span,
        );
        walk::walk_ts_enum_declaration(self, it);
    }

    fn visit_ts_module_declaration(&mut self, it: &TSModuleDeclaration<'a>) {
        let ambient = it.declare;
        if ambient {
            self.ambient_depth += 1;
        }

        match &it.id {
            TSModuleDeclarationName::StringLiteral(literal) => {
                let module = self
                    .table
                    .ambient_module(literal.value.as_str(), self.file, it.span);
                let scope = self.enter_new_scope(ScopeKind::Namespace, Some(module));
                self.ambient_depth += 1;
                self.with_scope(scope, |binder| {
                    walk::walk_ts_module_declaration(binder, it);
                });
                self.ambient_depth -= 1;
            }
            TSModuleDeclarationName::Identifier(id) if ambient && id.name.as_str() == "global" => {
                self.with_scope(GLOBAL_SCOPE, |binder| {
                    walk::walk_ts_module_declaration(binder, it);
                });
            }
            TSModuleDeclarationName::Identifier(id) => {
                let name = id.name.as_str();
                let outer = self.current();
                let symbol = self.table.declare(outer, name, SymbolFlags::NAMESPACE);
                let scope = self.enter_new_scope(ScopeKind::Namespace, Some(symbol));
                let declaration = self.declaration(DeclarationKind::Namespace(scope), it.span);
                self.table.add_declaration(symbol, declaration);
                self.export_if_ambient(name, symbol);

                self.with_scope(scope, |binder| {
                    walk::walk_ts_module_declaration(binder, it);
                    // `namespace A.B {}` exports `B` from `A`
                    if let Some(TSModuleDeclarationBody::TSModuleDeclaration(inner)) = &it.body {
                        if let TSModuleDeclarationName::Identifier(inner_id) = &inner.id {
                            let inner_name = inner_id.name.as_str();
                            if let Some(inner_symbol) = binder.binding(inner_name) {
                                binder.table.export(symbol, inner_name, inner_symbol);
                            }
                        }
                    }
                });
            }
        }

        if ambient {
            self.ambient_depth -= 1;
        }
    }

    fn visit_import_declaration(&mut self, it: &ImportDeclaration<'a>) {
        let Some(specifiers) = &it.specifiers else {
            return;
        };
        let source = it.source.value.as_str();

        for specifier in specifiers.iter() {
            match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(s) => {
                    let target =
                        AliasTarget::Member(self.specifier(source), export_name(&s.imported));
                    self.declare_alias(s.local.name.as_str(), target, s.span);
                }
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                    let target = AliasTarget::Default(self.specifier(source));
                    self.declare_alias(s.local.name.as_str(), target, s.span);
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                    let target = AliasTarget::Namespace(self.specifier(source));
                    self.declare_alias(s.local.name.as_str(), target, s.span);
                }
            }
        }
    }

    fn visit_ts_import_equals_declaration(&mut self, it: &TSImportEqualsDeclaration<'a>) {
        let target = match &it.module_reference {
            TSModuleReference::ExternalModuleReference(external) => Some(AliasTarget::Namespace(
                self.specifier(external.expression.value.as_str()),
            )),
            TSModuleReference::IdentifierReference(id) => {
                EntityName::from_dotted(id.name.as_str()).map(|name| AliasTarget::Entity {
                    scope: self.current(),
                    name,
                })
            }
            TSModuleReference::QualifiedName(qualified) => {
                entity_from_qualified_name(qualified).map(|name| AliasTarget::Entity {
                    scope: self.current(),
                    name,
                })
            }
            #[allow(unreachable_patterns)]
            _ => None,
        };

        if let Some(target) = target {
            self.declare_alias(it.id.name.as_str(), target, it.span);
        }
    }

    fn visit_export_named_declaration(&mut self, it: &ExportNamedDeclaration<'a>) {
        walk::walk_export_named_declaration(self, it);

        if let Some(declaration) = &it.declaration {
            for name in declared_names(declaration) {
                if let Some(symbol) = self.binding(&name) {
                    self.export(&name, symbol);
                }
            }
        }

        for specifier in it.specifiers.iter() {
            let local = export_name(&specifier.local);
            let exported = export_name(&specifier.exported);
            let target = match &it.source {
                Some(source) => AliasTarget::Member(self.specifier(source.value.as_str()), local),
                None => match EntityName::from_dotted(&local) {
                    Some(name) => AliasTarget::Entity {
                        scope: self.current(),
                        name,
                    },
                    None => continue,
                },
            };
            let symbol = self.unbound_alias(&exported, target, specifier.span);
            self.export(&exported, symbol);
        }
    }

    fn visit_export_default_declaration(&mut self, it: &ExportDefaultDeclaration<'a>) {
        walk::walk_export_default_declaration(self, it);

        let symbol = match &it.declaration {
            ExportDefaultDeclarationKind::ClassDeclaration(class) => match &class.id {
                Some(id) => self.binding(id.name.as_str()),
                None => self.table.class_like_at(self.file, class.span).map(|decl| {
                    let symbol = self.table.new_symbol("default", SymbolFlags::CLASS);
                    let declaration = self.declaration(DeclarationKind::Class(decl), class.span);
                    self.table.add_declaration(symbol, declaration);
                    symbol
                }),
            },
            ExportDefaultDeclarationKind::FunctionDeclaration(function) => function
                .id
                .as_ref()
                .and_then(|id| self.binding(id.name.as_str())),
            ExportDefaultDeclarationKind::TSInterfaceDeclaration(interface) => {
                self.binding(interface.id.name.as_str())
            }
            other => other
                .as_expression()
                .and_then(|expr| match expr.get_inner_expression() {
                    Expression::ClassExpression(class) => {
                        self.table.class_like_at(self.file, class.span).map(|decl| {
                            let symbol = self.table.new_symbol("default", SymbolFlags::CLASS);
                            let declaration =
                                self.declaration(DeclarationKind::Class(decl), class.span);
                            self.table.add_declaration(symbol, declaration);
                            symbol
                        })
                    }
                    expr => entity_from_expression(expr).map(|name| {
                        let target = AliasTarget::Entity {
                            scope: self.current(),
                            name,
                        };
                        self.unbound_alias("default", target, it.span)
                    }),
                }),
        };

        if let Some(symbol) = symbol {
            self.export("default", symbol);
        }
    }

    fn visit_export_all_declaration(&mut self, it: &ExportAllDeclaration<'a>) {
        let specifier = self.specifier(it.source.value.as_str());
        match &it.exported {
            Some(exported) => {
                let name = export_name(exported);
                let symbol = self.unbound_alias(&name, AliasTarget::Namespace(specifier), it.span);
                self.export(&name, symbol);
            }
            None => {
                if let Some(container) = self.container() {
                    self.table.symbol_mut(container).star_exports.push(specifier);
                }
            }
        }
    }

    fn visit_ts_export_assignment(&mut self, it: &TSExportAssignment<'a>) {
        let Some(name) = entity_from_expression(&it.expression) else {
            tracing::debug!("ignoring non-entity `export =` in file {}", self.file.as_u32());
            return;
        };
        let scope = self.current();
        if let Some(container) = self.container() {
            self.table.symbol_mut(container).export_equals = Some((scope, name));
        }
    }

    fn visit_ts_namespace_export_declaration(&mut self, it: &TSNamespaceExportDeclaration<'a>) {
        if self.table.file_module(self.file).is_none() {
            return;
        }
        let symbol = self
            .table
            .declare(GLOBAL_SCOPE, it.id.name.as_str(), SymbolFlags::ALIAS);
        let declaration = self.declaration(DeclarationKind::Import, it.span);
        self.table.add_declaration(symbol, declaration);
        self.table
            .set_alias(symbol, AliasTarget::OwnModule(self.file));
    }
}

fn export_name(name: &ModuleExportName<'_>) -> CompactString {
    match name {
        ModuleExportName::IdentifierName(id) => CompactString::from(id.name.as_str()),
        ModuleExportName::IdentifierReference(id) => CompactString::from(id.name.as_str()),
        ModuleExportName::StringLiteral(literal) => CompactString::from(literal.value.as_str()),
    }
}

/// Names bound by an exported declaration.
fn declared_names(declaration: &AstDeclaration<'_>) -> SmallVec<[CompactString; 1]> {
    let mut names = SmallVec::new();
    match declaration {
        AstDeclaration::VariableDeclaration(decl) => {
            for declarator in decl.declarations.iter() {
                if let Some(id) = declarator.id.get_binding_identifier() {
                    names.push(CompactString::from(id.name.as_str()));
                }
            }
        }
        AstDeclaration::FunctionDeclaration(function) => {
            if let Some(id) = &function.id {
                names.push(CompactString::from(id.name.as_str()));
            }
        }
        AstDeclaration::ClassDeclaration(class) => {
            if let Some(id) = &class.id {
                names.push(CompactString::from(id.name.as_str()));
            }
        }
        AstDeclaration::TSTypeAliasDeclaration(alias) => {
            names.push(CompactString::from(alias.id.name.as_str()));
        }
        AstDeclaration::TSInterfaceDeclaration(interface) => {
            names.push(CompactString::from(interface.id.name.as_str()));
        }
        AstDeclaration::TSEnumDeclaration(decl) => {
            names.push(CompactString::from(decl.id.name.as_str()));
        }
        AstDeclaration::TSModuleDeclaration(module) => {
            if let TSModuleDeclarationName::Identifier(id) = &module.id {
                names.push(CompactString::from(id.name.as_str()));
            }
        }
        AstDeclaration::TSImportEqualsDeclaration(decl) => {
            names.push(CompactString::from(decl.id.name.as_str()));
        }
        #[allow(unreachable_patterns)]
        _ => {}
    }
    names
}

/// `A`, `A.B.C` (through parentheses and type assertions). Anything else,
/// such as `mixin(Base)`, is not an entity name.
pub(crate) fn entity_from_expression(expr: &Expression<'_>) -> Option<EntityName> {
    let mut segments = SmallVec::new();
    push_expression_segments(expr, &mut segments)?;
    EntityName::new(segments)
}

fn push_expression_segments(
    expr: &Expression<'_>,
    out: &mut SmallVec<[CompactString; 2]>,
) -> Option<()> {
    match expr.get_inner_expression() {
        Expression::Identifier(id) => {
            out.push(CompactString::from(id.name.as_str()));
            Some(())
        }
        Expression::StaticMemberExpression(member) if !member.optional => {
            push_expression_segments(&member.object, out)?;
            out.push(CompactString::from(member.property.name.as_str()));
            Some(())
        }
        _ => None,
    }
}

pub(crate) fn entity_from_type_name(name: &TSTypeName<'_>) -> Option<EntityName> {
    let mut segments = SmallVec::new();
    push_type_name_segments(name, &mut segments)?;
    EntityName::new(segments)
}

fn entity_from_qualified_name(name: &TSQualifiedName<'_>) -> Option<EntityName> {
    let mut segments = SmallVec::new();
    push_type_name_segments(&name.left, &mut segments)?;
    segments.push(CompactString::from(name.right.name.as_str()));
    EntityName::new(segments)
}

fn push_type_name_segments(
    name: &TSTypeName<'_>,
    out: &mut SmallVec<[CompactString; 2]>,
) -> Option<()> {
    match name {
        TSTypeName::IdentifierReference(id) => {
            out.push(CompactString::from(id.name.as_str()));
            Some(())
        }
        TSTypeName::QualifiedName(qualified) => {
            push_type_name_segments(&qualified.left, out)?;
            out.push(CompactString::from(qualified.right.name.as_str()));
            Some(())
        }
        #[allow(unreachable_patterns)]
        _ => None,
    }
}
