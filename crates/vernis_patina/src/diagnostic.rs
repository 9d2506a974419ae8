//! Diagnostic types for vernis_patina.
//!
//! Uses `CompactString` for efficient small string storage.

use oxc_diagnostics::OxcDiagnostic;
use oxc_span::Span;
use serde::Serialize;
use vernis_carton::CompactString;
use vernis_croquis::FileId;

use crate::rule::{RULE_CODE, RULE_NAME, RULE_SOURCE};

/// Lint diagnostic severity. Findings never block on their own; failing a
/// run on warnings is up to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
}

impl Severity {
    /// ESLint-style numeric level
    #[inline]
    pub fn level(self) -> u8 {
        match self {
            Self::Warning => 1,
        }
    }
}

/// What was bound inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FindingKind {
    /// Arrow function or function expression
    InlineFunction,
    /// Array literal
    InlineArray,
}

impl FindingKind {
    /// Placeholder shown in place of the literal in messages.
    #[inline]
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::InlineFunction => "() => {}",
            Self::InlineArray => "[]",
        }
    }

    fn help(self) -> &'static str {
        match self {
            Self::InlineFunction => {
                "A new function is created on every render. Bind it once as a class property or method and pass the reference."
            }
            Self::InlineArray => {
                "A new array is created on every render. Hoist it to a constant or compute it outside render."
            }
        }
    }
}

/// A lint diagnostic with rich information for display.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// Unit the finding belongs to
    pub file: FileId,
    /// Rule that triggered this diagnostic
    pub rule_name: &'static str,
    /// Tool tag, shown as the error code scope
    pub source: &'static str,
    pub code: u32,
    pub kind: FindingKind,
    pub severity: Severity,
    /// Primary message (CompactString for efficiency)
    pub message: CompactString,
    /// Start byte offset in source
    pub start: u32,
    /// Length in bytes
    pub length: u32,
    /// Help message for fixing (optional, CompactString)
    pub help: Option<CompactString>,
}

impl LintDiagnostic {
    /// Create a warning for an inline prop on `<tag attribute=...>`.
    pub fn inline_prop(file: FileId, kind: FindingKind, tag: &str, attribute: &str, span: Span) -> Self {
        let message = format!("Anti-pattern <{tag} {attribute}={{{}}}/>", kind.placeholder());
        Self::warn(file, kind, message, span.start, span.size()).with_help(kind.help())
    }

    /// Create a new warning diagnostic
    #[inline]
    pub fn warn(
        file: FileId,
        kind: FindingKind,
        message: impl Into<CompactString>,
        start: u32,
        length: u32,
    ) -> Self {
        Self {
            file,
            rule_name: RULE_NAME,
            source: RULE_SOURCE,
            code: RULE_CODE,
            kind,
            severity: Severity::Warning,
            message: message.into(),
            start,
            length,
            help: None,
        }
    }

    /// Add a help message
    #[inline]
    pub fn with_help(mut self, help: impl Into<CompactString>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// End byte offset in source
    #[inline]
    pub fn end(&self) -> u32 {
        self.start + self.length
    }

    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end())
    }

    /// Convert to OxcDiagnostic for rich rendering
    pub fn into_oxc_diagnostic(self) -> OxcDiagnostic {
        let mut diag = match self.severity {
            Severity::Warning => OxcDiagnostic::warn(self.message.to_string()),
        }
        .with_error_code(self.source, self.code.to_string())
        .with_label(Span::new(self.start, self.start + self.length));

        if let Some(help) = self.help {
            diag = diag.with_help(help.to_string());
        }

        diag
    }
}

/// Summary of lint results
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintSummary {
    pub warning_count: usize,
    /// Files linted
    pub file_count: usize,
    /// Files with at least one finding
    pub flagged_file_count: usize,
}

impl LintSummary {
    #[inline]
    pub fn add(&mut self, diagnostic: &LintDiagnostic) {
        match diagnostic.severity {
            Severity::Warning => self.warning_count += 1,
        }
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.warning_count == 0
    }
}
