//! Symbol resolution tests.
//!
//! Every reference form that can name a base class must land on the same
//! symbol as the declaration itself.

use oxc_allocator::Allocator;
use vernis_croquis::{FileId, Program, ProgramBuilder, SymbolFlags, SymbolId};

const REACT_TYPES: &str = r#"
export = React;
export as namespace React;

declare namespace React {
    type ReactNode = any;
    interface ComponentLifecycle<P, S> {
        componentDidMount?(): void;
    }
    class Component<P, S> {
        constructor(props: P);
        props: P;
        state: S;
        render(): ReactNode;
    }
    interface Component<P = {}, S = {}> extends ComponentLifecycle<P, S> {}
    class PureComponent<P = {}, S = {}> extends Component<P, S> {}
}
"#;

const REACT_PATH: &str = "/project/node_modules/@types/react/index.d.ts";

/// Build a program from `(path, source)` pairs plus the React typings.
fn build<'a>(allocator: &'a Allocator, files: &[(&str, &str)]) -> (Program<'a>, Vec<FileId>) {
    let mut builder = ProgramBuilder::new(allocator);
    builder.add_source(REACT_PATH, REACT_TYPES);
    let ids = files
        .iter()
        .map(|(path, source)| builder.add_source(path, source))
        .collect();
    (builder.build(), ids)
}

fn component(program: &Program<'_>) -> SymbolId {
    program
        .find_package_export("react", "Component")
        .expect("React.Component should resolve")
}

// =============================================================================
// Base lookup
// =============================================================================

mod base_lookup {
    use super::*;

    #[test]
    fn finds_component_through_export_equals() {
        let allocator = Allocator::default();
        let (program, _) = build(&allocator, &[]);
        let symbol = program.symbol(component(&program));

        assert_eq!(symbol.name, "Component");
        assert!(symbol.flags.contains(SymbolFlags::CLASS | SymbolFlags::INTERFACE));
        assert_eq!(program.declarations_of(symbol.id).len(), 2);
    }

    #[test]
    fn missing_package() {
        let allocator = Allocator::default();
        let mut builder = ProgramBuilder::new(&allocator);
        builder.add_source("/project/src/App.tsx", "export class App {}");
        let program = builder.build();
        assert!(program.find_package_export("react", "Component").is_none());
    }

    #[test]
    fn ambient_module_declaration() {
        let allocator = Allocator::default();
        let mut builder = ProgramBuilder::new(&allocator);
        builder.add_source(
            "/project/typings/react.d.ts",
            r#"declare module "react" {
    export class Component<P, S> {}
}"#,
        );
        let app = builder.add_source(
            "/project/src/App.tsx",
            r#"import { Component } from "react";"#,
        );
        let program = builder.build();

        let base = program.find_package_export("react", "Component").unwrap();
        assert_eq!(program.resolve_name(app, "Component"), Some(base));
    }
}

// =============================================================================
// Reference forms
// =============================================================================

mod reference_forms {
    use super::*;

    fn resolves_to_component(source: &str, name: &str) {
        let allocator = Allocator::default();
        let (program, ids) = build(&allocator, &[("/project/src/App.tsx", source)]);
        assert_eq!(
            program.resolve_name(ids[0], name),
            Some(component(&program)),
            "`{name}` in:\n{source}"
        );
    }

    #[test]
    fn namespace_import() {
        resolves_to_component(r#"import * as React from "react";"#, "React.Component");
    }

    #[test]
    fn default_import() {
        resolves_to_component(r#"import React from "react";"#, "React.Component");
    }

    #[test]
    fn named_import_with_rename() {
        resolves_to_component(r#"import { Component as Base } from "react";"#, "Base");
    }

    #[test]
    fn import_equals_require() {
        resolves_to_component(r#"import React = require("react");"#, "React.Component");
    }

    #[test]
    fn umd_global_from_script() {
        resolves_to_component("class A {}", "React.Component");
    }

    #[test]
    fn umd_global_from_module() {
        resolves_to_component("export class A {}", "React.Component");
    }

    #[test]
    fn const_alias() {
        resolves_to_component(
            r#"import * as React from "react";
const Base = React.Component;"#,
            "Base",
        );
    }

    #[test]
    fn type_alias() {
        resolves_to_component(
            r#"import * as React from "react";
type Base = React.Component<{}, {}>;"#,
            "Base",
        );
    }

    #[test]
    fn import_equals_entity() {
        resolves_to_component(
            r#"import * as React from "react";
import Base = React.Component;"#,
            "Base",
        );
    }

    #[test]
    fn re_export_chain() {
        let allocator = Allocator::default();
        let (program, ids) = build(
            &allocator,
            &[
                (
                    "/project/src/base.ts",
                    r#"import * as React from "react";
export const Base = React.Component;"#,
                ),
                ("/project/src/index.ts", r#"export * from "./base";"#),
                (
                    "/project/src/App.tsx",
                    r#"import { Base as Renamed } from "./index";"#,
                ),
            ],
        );
        assert_eq!(
            program.resolve_name(ids[2], "Renamed"),
            Some(component(&program))
        );
    }

    #[test]
    fn js_extension_specifier() {
        let allocator = Allocator::default();
        let (program, ids) = build(
            &allocator,
            &[
                ("/project/src/Base.tsx", "export class Base {}"),
                (
                    "/project/src/App.tsx",
                    r#"import { Base } from "./Base.js";"#,
                ),
            ],
        );
        let base = program.resolve_name(ids[1], "Base").unwrap();
        assert_eq!(program.resolve_name(ids[0], "Base"), Some(base));
    }

    #[test]
    fn default_export_class() {
        let allocator = Allocator::default();
        let (program, ids) = build(
            &allocator,
            &[
                ("/project/src/Base.tsx", "export default class Base {}"),
                ("/project/src/App.tsx", r#"import B from "./Base";"#),
            ],
        );
        let base = program.resolve_name(ids[1], "B").unwrap();
        assert_eq!(program.symbol(base).name, "Base");
    }
}

// =============================================================================
// Degenerate graphs
// =============================================================================

mod degenerate {
    use super::*;

    #[test]
    fn cyclic_re_exports_terminate() {
        let allocator = Allocator::default();
        let (program, ids) = build(
            &allocator,
            &[
                ("/project/src/a.ts", r#"export * from "./b";"#),
                ("/project/src/b.ts", r#"export * from "./a";"#),
                ("/project/src/App.tsx", r#"import { Missing } from "./a";"#),
            ],
        );
        assert_eq!(program.resolve_name(ids[2], "Missing"), None);
    }

    #[test]
    fn cyclic_aliases_terminate() {
        let allocator = Allocator::default();
        let (program, ids) = build(
            &allocator,
            &[(
                "/project/src/App.tsx",
                "export {};\ntype A = B;\ntype B = A;",
            )],
        );
        assert_eq!(program.resolve_name(ids[0], "A"), None);
    }

    #[test]
    fn unknown_module() {
        let allocator = Allocator::default();
        let (program, ids) = build(
            &allocator,
            &[(
                "/project/src/App.tsx",
                r#"import { Thing } from "./nowhere";"#,
            )],
        );
        assert_eq!(program.resolve_name(ids[0], "Thing"), None);
        assert!(program.resolve_module(ids[0], "./nowhere").is_none());
    }
}

// =============================================================================
// Class-like records
// =============================================================================

mod class_likes {
    use super::*;
    use vernis_croquis::{ClassLikeKind, HeritageClause};

    #[test]
    fn records_heritage_in_source_order() {
        let allocator = Allocator::default();
        let source = "export class A extends B implements C, D.E {}";
        let (program, ids) = build(&allocator, &[("/project/src/A.tsx", source)]);

        let symbol = program.resolve_name(ids[0], "A").unwrap();
        let decl = program.declarations_of(symbol)[0].class_like().unwrap();
        let class = program.class_like(decl);

        assert_eq!(class.kind, ClassLikeKind::Class);
        assert_eq!(class.display_name(), "A");
        let clauses: Vec<_> = class
            .heritage
            .iter()
            .map(|h| (h.clause, h.name.as_ref().map(ToString::to_string)))
            .collect();
        assert_eq!(
            clauses,
            vec![
                (HeritageClause::Extends, Some("B".to_string())),
                (HeritageClause::Implements, Some("C".to_string())),
                (HeritageClause::Implements, Some("D.E".to_string())),
            ]
        );
        assert_eq!(program.class_like_at(ids[0], class.span), Some(decl));
    }

    #[test]
    fn class_expression_bound_to_const() {
        let allocator = Allocator::default();
        let source = "const Widget = class extends Base {};";
        let (program, ids) = build(&allocator, &[("/project/src/W.tsx", source)]);

        let symbol = program.resolve_name(ids[0], "Widget").unwrap();
        let decl = program.declarations_of(symbol)[0].class_like().unwrap();
        assert_eq!(program.class_like(decl).display_name(), "<anonymous>");
    }

    #[test]
    fn non_entity_heritage_has_no_name() {
        let allocator = Allocator::default();
        let source = "export class A extends mixin(B) {}";
        let (program, ids) = build(&allocator, &[("/project/src/A.tsx", source)]);

        let symbol = program.resolve_name(ids[0], "A").unwrap();
        let decl = program.declarations_of(symbol)[0].class_like().unwrap();
        let heritage = &program.class_like(decl).heritage[0];
        assert!(heritage.name.is_none());
        assert_eq!(program.resolve_type_of(heritage), None);
    }
}
