//! Destinations for findings.

use crate::diagnostic::{LintDiagnostic, LintSummary};

/// Receives findings in traversal order.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: LintDiagnostic);
}

impl DiagnosticSink for Vec<LintDiagnostic> {
    #[inline]
    fn report(&mut self, diagnostic: LintDiagnostic) {
        self.push(diagnostic);
    }
}

/// Collects findings and keeps running counts.
#[derive(Debug, Default)]
pub struct LintCollector {
    diagnostics: Vec<LintDiagnostic>,
    summary: LintSummary,
}

impl LintCollector {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn diagnostics(&self) -> &[LintDiagnostic] {
        &self.diagnostics
    }

    #[inline]
    pub fn summary(&self) -> &LintSummary {
        &self.summary
    }

    #[inline]
    pub fn warning_count(&self) -> usize {
        self.summary.warning_count
    }

    pub fn into_diagnostics(self) -> Vec<LintDiagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for LintCollector {
    fn report(&mut self, diagnostic: LintDiagnostic) {
        self.summary.add(&diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

/// Adapts a closure into a sink.
pub struct ReportFn<F>(pub F);

impl<F: FnMut(LintDiagnostic)> DiagnosticSink for ReportFn<F> {
    #[inline]
    fn report(&mut self, diagnostic: LintDiagnostic) {
        (self.0)(diagnostic);
    }
}
