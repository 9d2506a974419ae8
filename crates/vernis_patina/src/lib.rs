//! # vernis_patina
//!
//! Patina - The quality checker for Vernis.
//! Finds inline function and array props in React class component renders.
//!
//! ## Name Origin
//!
//! **Patina** (/ˈpætɪnə/) refers to the greenish layer that forms on copper,
//! bronze, and similar metals through oxidation over time. `vernis_patina`
//! looks for the slow buildup that a fresh closure or array on every render
//! leaves on a component tree: props that never compare equal, so children
//! that never skip re-rendering.
//!
//! ## Features
//!
//! - Component detection by symbol identity, through any mix of `extends`
//!   and `implements` across files, aliases and re-exports
//! - Rich diagnostic output with code snippets (like oxlint), compact
//!   `file (line,col): message` lines, and ESLint-style JSON
//!
//! ## Usage
//!
//! ```rust,ignore
//! use oxc_allocator::Allocator;
//! use vernis_croquis::{LoadOptions, ProjectLoader};
//! use vernis_patina::{format_results, ComponentFramework, Linter, OutputFormat};
//!
//! let allocator = Allocator::default();
//! let program = ProjectLoader::new(&allocator, LoadOptions::default()).load(&["src/App.tsx"])?;
//! let linter = Linter::new(&program, &ComponentFramework::REACT)?;
//! let (results, summary) = linter.lint_program();
//! println!("{}", format_results(&program, &results, OutputFormat::Compact));
//! ```
//!
//! ## Rule
//!
//! - `react/no-inline-props` (code 420000) - Disallow
//!   `<Tag prop={() => {}}/>` and `<Tag prop={[]}/>` inside `render()` of a
//!   class that derives from `React.Component`

pub mod auditor;
pub mod diagnostic;
pub mod framework;
pub mod linter;
pub mod output;
pub mod resolver;
pub mod rule;
pub mod sink;

pub use auditor::{classify, AuditContext, RenderAuditor};
pub use diagnostic::{FindingKind, LintDiagnostic, LintSummary, Severity};
pub use framework::{BaseComponent, ComponentFramework, SetupError};
pub use linter::{LintResult, Linter};
pub use output::{format_results, format_summary, OutputFormat};
pub use resolver::ComponentResolver;
pub use rule::{RULE_CODE, RULE_NAME, RULE_SOURCE};
pub use sink::{DiagnosticSink, LintCollector, ReportFn};
