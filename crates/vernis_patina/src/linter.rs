//! Linter facade.

use vernis_croquis::{FileId, Program, SourceUnit};

use crate::auditor::{AuditContext, RenderAuditor};
use crate::diagnostic::{LintDiagnostic, LintSummary};
use crate::framework::{BaseComponent, ComponentFramework, SetupError};
use crate::sink::LintCollector;

/// Lint result for a single file
#[derive(Debug, Clone)]
pub struct LintResult {
    /// Unit that was linted
    pub file: FileId,
    /// Filename that was linted
    pub filename: String,
    /// Collected diagnostics
    pub diagnostics: Vec<LintDiagnostic>,
    /// Number of warnings
    pub warning_count: usize,
}

impl LintResult {
    /// Check if there are any diagnostics
    #[inline]
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Main linter struct.
///
/// Holds no per-file state: each call to [`Linter::lint_unit`] is a function
/// of the unit and the resolved base component.
#[derive(Debug, Clone)]
pub struct Linter<'p, 'a> {
    program: &'p Program<'a>,
    auditor: RenderAuditor<'p, 'a>,
}

impl<'p, 'a> Linter<'p, 'a> {
    /// Locate the framework's base component and prepare the auditor.
    pub fn new(program: &'p Program<'a>, framework: &ComponentFramework) -> Result<Self, SetupError> {
        let base = BaseComponent::locate(program, framework)?;
        Ok(Self {
            program,
            auditor: RenderAuditor::new(AuditContext::new(program, &base)),
        })
    }

    #[inline]
    pub fn auditor(&self) -> &RenderAuditor<'p, 'a> {
        &self.auditor
    }

    /// Lint one unit.
    pub fn lint_unit(&self, unit: &SourceUnit<'a>) -> LintResult {
        let mut collector = LintCollector::new();
        self.auditor.audit(unit, &mut collector);

        let warning_count = collector.warning_count();
        LintResult {
            file: unit.id,
            filename: unit.display_path(),
            diagnostics: collector.into_diagnostics(),
            warning_count,
        }
    }

    /// Lint every `.tsx` unit of the program, in load order.
    pub fn lint_program(&self) -> (Vec<LintResult>, LintSummary) {
        let mut summary = LintSummary::default();
        let mut results = Vec::new();

        for unit in self.program.lint_targets() {
            let result = self.lint_unit(unit);
            tracing::debug!(
                "{}: {} warnings",
                result.filename,
                result.warning_count
            );
            for diagnostic in &result.diagnostics {
                summary.add(diagnostic);
            }
            summary.file_count += 1;
            if result.has_diagnostics() {
                summary.flagged_file_count += 1;
            }
            results.push(result);
        }

        (results, summary)
    }
}
