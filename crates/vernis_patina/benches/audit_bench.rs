//! Benchmark for vernis_patina auditing.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use oxc_allocator::Allocator;
use vernis_croquis::{Program, ProgramBuilder};
use vernis_patina::{ComponentFramework, Linter};

const REACT_TYPES: &str = r#"
export = React;
export as namespace React;
declare namespace React {
    class Component<P, S> { render(): any; }
}
"#;

fn build<'a>(allocator: &'a Allocator, source: &str) -> Program<'a> {
    let mut builder = ProgramBuilder::new(allocator);
    builder.add_source("/bench/node_modules/@types/react/index.d.ts", REACT_TYPES);
    builder.add_source("/bench/src/App.tsx", source);
    builder.build()
}

fn bench_audit_components(c: &mut Criterion) {
    // Generate many components, each with a mix of safe and inline props
    let mut source = String::from("import * as React from \"react\";\n");
    for i in 0..200 {
        source.push_str(&format!(
            r#"export class Widget{i} extends React.Component {{
    handle{i} = () => {{}};
    render() {{
        return (
            <div className="w{i}" onClick={{this.handle{i}}}>
                <Item items={{[{i}]}} onSelect={{() => {i}}} />
            </div>
        );
    }}
}}
"#,
        ));
    }

    let allocator = Allocator::default();
    let program = build(&allocator, &source);
    let linter = Linter::new(&program, &ComponentFramework::REACT).unwrap();

    let mut group = c.benchmark_group("audit");
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("components_200", |b| {
        b.iter(|| black_box(linter.lint_program()))
    });

    group.finish();
}

fn bench_deep_heritage(c: &mut Criterion) {
    // A long inheritance chain exercises the resolver more than the walk
    let mut source =
        String::from("import * as React from \"react\";\nclass C0 extends React.Component {}\n");
    for i in 1..500 {
        source.push_str(&format!("class C{i} extends C{} {{}}\n", i - 1));
    }
    source.push_str("export class Leaf extends C499 { render() { return <a x={() => {}} />; } }\n");

    let allocator = Allocator::default();
    let program = build(&allocator, &source);
    let linter = Linter::new(&program, &ComponentFramework::REACT).unwrap();

    let mut group = c.benchmark_group("audit");
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("heritage_chain_500", |b| {
        b.iter(|| black_box(linter.lint_program()))
    });

    group.finish();
}

criterion_group!(benches, bench_audit_components, bench_deep_heritage);
criterion_main!(benches);
