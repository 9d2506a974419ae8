//! Render method auditing.
//!
//! Two walks cooperate here. `ClassFinder` visits a whole unit and asks the
//! resolver about every class it meets. For each component it hands the body
//! of every `render` method to a `RenderScanner`, which classifies the value
//! of each JSX attribute. The scanner skips nested component classes, which
//! the finder reaches on its own and audits separately. Any other nested
//! class is part of the render body and is scanned.

use oxc_ast::ast::{
    Class, ClassElement, Expression, JSXAttribute, JSXAttributeValue, JSXOpeningElement,
    MethodDefinition, MethodDefinitionKind, PropertyKey,
};
use oxc_ast_visit::{walk, Visit};
use oxc_span::GetSpan;
use vernis_croquis::{Program, SourceUnit};

use crate::diagnostic::{FindingKind, LintDiagnostic};
use crate::framework::BaseComponent;
use crate::resolver::ComponentResolver;
use crate::sink::DiagnosticSink;

/// Everything an audit needs, passed explicitly.
#[derive(Debug, Clone)]
pub struct AuditContext<'p, 'a> {
    pub program: &'p Program<'a>,
    pub resolver: ComponentResolver<'p, 'a>,
    /// Name of the method whose JSX is checked
    pub render_method: &'static str,
}

impl<'p, 'a> AuditContext<'p, 'a> {
    pub fn new(program: &'p Program<'a>, base: &BaseComponent) -> Self {
        Self {
            program,
            resolver: ComponentResolver::new(program, base.symbol),
            render_method: base.framework.render_method,
        }
    }
}

/// Finds inline function and array props in component render methods.
#[derive(Debug, Clone)]
pub struct RenderAuditor<'p, 'a> {
    ctx: AuditContext<'p, 'a>,
}

impl<'p, 'a> RenderAuditor<'p, 'a> {
    pub fn new(ctx: AuditContext<'p, 'a>) -> Self {
        Self { ctx }
    }

    #[inline]
    pub fn context(&self) -> &AuditContext<'p, 'a> {
        &self.ctx
    }

    /// Report every finding in `unit`, in pre-order.
    pub fn audit(&self, unit: &SourceUnit<'a>, sink: &mut dyn DiagnosticSink) {
        let mut finder = ClassFinder {
            ctx: &self.ctx,
            unit,
            sink,
        };
        finder.visit_program(&unit.ast);
    }
}

/// Classify an attribute value.
///
/// Parentheses and TypeScript wrappers (`as`, `satisfies`, `!`, `<T>x`) are
/// looked through.
pub fn classify(expression: &Expression<'_>) -> Option<FindingKind> {
    match expression.get_inner_expression() {
        Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_) => {
            Some(FindingKind::InlineFunction)
        }
        Expression::ArrayExpression(_) => Some(FindingKind::InlineArray),
        _ => None,
    }
}

struct ClassFinder<'s, 'p, 'a, S: ?Sized> {
    ctx: &'s AuditContext<'p, 'a>,
    unit: &'s SourceUnit<'a>,
    sink: &'s mut S,
}

impl<'a, S: DiagnosticSink + ?Sized> ClassFinder<'_, '_, 'a, S> {
    fn is_render_method(&self, method: &MethodDefinition<'a>) -> bool {
        method.kind == MethodDefinitionKind::Method
            && !method.computed
            && matches!(
                &method.key,
                PropertyKey::StaticIdentifier(id) if id.name.as_str() == self.ctx.render_method
            )
    }

    fn audit_component(&mut self, class: &Class<'a>) {
        for element in &class.body.body {
            let ClassElement::MethodDefinition(method) = element else {
                continue;
            };
            if !self.is_render_method(method) {
                continue;
            }
            let Some(body) = &method.value.body else {
                continue;
            };

            let mut scanner = RenderScanner {
                ctx: self.ctx,
                unit: self.unit,
                tags: Vec::new(),
                findings: Vec::new(),
            };
            scanner.visit_function_body(body);
            for finding in scanner.findings {
                self.sink.report(finding);
            }
        }
    }
}

impl<'a, S: DiagnosticSink + ?Sized> Visit<'a> for ClassFinder<'_, '_, 'a, S> {
    fn visit_class(&mut self, class: &Class<'a>) {
        match self.ctx.program.class_like_at(self.unit.id, class.span) {
            Some(decl) => {
                if self.ctx.resolver.is_component(decl) {
                    self.audit_component(class);
                }
            }
            None => tracing::trace!(
                "class at {}..{} in {} was not bound",
                class.span.start,
                class.span.end,
                self.unit.display_path()
            ),
        }
        walk::walk_class(self, class);
    }
}

/// Walks one render body.
struct RenderScanner<'s, 'p, 'a> {
    ctx: &'s AuditContext<'p, 'a>,
    unit: &'s SourceUnit<'a>,
    /// Tag names of the enclosing opening elements
    tags: Vec<&'a str>,
    findings: Vec<LintDiagnostic>,
}

impl<'a> Visit<'a> for RenderScanner<'_, '_, 'a> {
    fn visit_class(&mut self, class: &Class<'a>) {
        let component = self
            .ctx
            .program
            .class_like_at(self.unit.id, class.span)
            .is_some_and(|decl| self.ctx.resolver.is_component(decl));
        if !component {
            walk::walk_class(self, class);
        }
    }

    fn visit_jsx_opening_element(&mut self, element: &JSXOpeningElement<'a>) {
        self.tags.push(self.unit.text_of(element.name.span()));
        walk::walk_jsx_opening_element(self, element);
        self.tags.pop();
    }

    fn visit_jsx_attribute(&mut self, attribute: &JSXAttribute<'a>) {
        if let Some(JSXAttributeValue::ExpressionContainer(container)) = &attribute.value {
            if let Some(kind) = container.expression.as_expression().and_then(classify) {
                let tag = self.tags.last().copied().unwrap_or_default();
                let name = self.unit.text_of(attribute.name.span());
                self.findings.push(LintDiagnostic::inline_prop(
                    self.unit.id,
                    kind,
                    tag,
                    name,
                    attribute.span,
                ));
            }
        }
        walk::walk_jsx_attribute(self, attribute);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::ComponentFramework;
    use oxc_allocator::Allocator;
    use vernis_croquis::ProgramBuilder;

    const REACT: &str = r#"
export = React;
export as namespace React;
declare namespace React {
    class Component<P, S> { render(): any; }
}
"#;

    /// Audit `source` as a `.tsx` unit and return the messages in order.
    fn audit(source: &str) -> Vec<String> {
        let allocator = Allocator::default();
        let mut builder = ProgramBuilder::new(&allocator);
        builder.add_source("/p/node_modules/@types/react/index.d.ts", REACT);
        let file = builder.add_source("/p/src/App.tsx", source);
        let program = builder.build();

        let base = BaseComponent::locate(&program, &ComponentFramework::REACT).unwrap();
        let auditor = RenderAuditor::new(AuditContext::new(&program, &base));
        let mut findings: Vec<LintDiagnostic> = Vec::new();
        auditor.audit(program.unit(file).unwrap(), &mut findings);
        findings.into_iter().map(|d| d.message.to_string()).collect()
    }

    #[test]
    fn test_classifies_in_source_order() {
        let messages = audit(
            r#"
import * as React from "react";
export class App extends React.Component<{}, {}> {
    render() {
        return (
            <div a={() => 1} b={[1, 2]} c={function () {}} d={this.handle} e="x" f={(() => 2)}>
                <Item g={[] as number[]} h={values!} {...rest} i />
            </div>
        );
    }
}
"#,
        );
        assert_eq!(
            messages,
            vec![
                "Anti-pattern <div a={() => {}}/>",
                "Anti-pattern <div b={[]}/>",
                "Anti-pattern <div c={() => {}}/>",
                "Anti-pattern <div f={() => {}}/>",
                "Anti-pattern <Item g={[]}/>",
            ]
        );
    }

    #[test]
    fn test_nested_attribute_values_keep_pre_order() {
        let messages = audit(
            r#"
import * as React from "react";
export class App extends React.Component {
    render() {
        return <Outer slot={<Inner items={[]} />} onDone={() => {}} />;
    }
}
"#,
        );
        assert_eq!(
            messages,
            vec![
                "Anti-pattern <Inner items={[]}/>",
                "Anti-pattern <Outer onDone={() => {}}/>",
            ]
        );
    }

    #[test]
    fn test_member_expression_tag() {
        let messages = audit(
            r#"
import * as React from "react";
export class App extends React.Component {
    render() {
        return <Foo.Bar onClick={() => {}} />;
    }
}
"#,
        );
        assert_eq!(messages, vec!["Anti-pattern <Foo.Bar onClick={() => {}}/>"]);
    }

    #[test]
    fn test_silent_outside_render() {
        let messages = audit(
            r#"
import * as React from "react";
export class App extends React.Component {
    renderItem() {
        return <Item onClick={() => {}} />;
    }
    get render2() {
        return <Item onClick={() => {}} />;
    }
}
export class NotAComponent {
    render() {
        return <Item onClick={() => {}} />;
    }
}
export function render() {
    return <Item onClick={() => {}} />;
}
"#,
        );
        assert!(messages.is_empty(), "{messages:?}");
    }

    #[test]
    fn test_getters_and_computed_keys_are_not_render_methods() {
        let messages = audit(
            r#"
import * as React from "react";
export class Getter extends React.Component {
    get render() {
        return <Item onClick={() => {}} />;
    }
}
export class Computed extends React.Component {
    ["render"]() {
        return <Item onClick={() => {}} />;
    }
}
"#,
        );
        assert!(messages.is_empty(), "{messages:?}");
    }

    #[test]
    fn test_nested_component_is_audited_once_after_outer() {
        let messages = audit(
            r#"
import * as React from "react";
export class Outer extends React.Component {
    render() {
        class Inner extends React.Component {
            render() {
                return <b inner={() => {}} />;
            }
        }
        return <a outer={[]} />;
    }
}
"#,
        );
        assert_eq!(
            messages,
            vec!["Anti-pattern <a outer={[]}/>", "Anti-pattern <b inner={() => {}}/>"]
        );
    }

    #[test]
    fn test_plain_class_inside_render_is_scanned() {
        let messages = audit(
            r#"
import * as React from "react";
export class App extends React.Component {
    render() {
        const Helper = class {
            make() {
                return <a onClick={() => {}} />;
            }
        };
        return <b items={[]} />;
    }
}
"#,
        );
        assert_eq!(
            messages,
            vec!["Anti-pattern <a onClick={() => {}}/>", "Anti-pattern <b items={[]}/>"]
        );
    }

    #[test]
    fn test_class_expression_component() {
        let messages = audit(
            r#"
import * as React from "react";
export const App = class extends React.Component {
    render() {
        return <a onClick={() => {}} />;
    }
};
"#,
        );
        assert_eq!(messages, vec!["Anti-pattern <a onClick={() => {}}/>"]);
    }

    #[test]
    fn test_callbacks_inside_render_are_scanned() {
        let messages = audit(
            r#"
import * as React from "react";
export class List extends React.Component<{ items: string[] }, {}> {
    render() {
        return <ul>{this.props.items.map(item => <li key={item} onClick={() => {}} />)}</ul>;
    }
}
"#,
        );
        assert_eq!(messages, vec!["Anti-pattern <li onClick={() => {}}/>"]);
    }

    #[test]
    fn test_classify() {
        let allocator = Allocator::default();
        let cases = [
            ("() => 1", Some(FindingKind::InlineFunction)),
            ("async function () {}", Some(FindingKind::InlineFunction)),
            ("([1])", Some(FindingKind::InlineArray)),
            ("[] satisfies unknown[]", Some(FindingKind::InlineArray)),
            ("handler", None),
            ("this.handler.bind(this)", None),
            ("{ a: 1 }", None),
            ("`template`", None),
        ];
        for (source, expected) in cases {
            let expression =
                oxc_parser::Parser::new(&allocator, source, oxc_span::SourceType::tsx())
                    .parse_expression()
                    .unwrap();
            assert_eq!(classify(&expression), expected, "{source}");
        }
    }
}
