//! Terminal output using oxc_diagnostics.

use std::fmt::Write as _;
use std::sync::Arc;

use oxc_diagnostics::{GraphicalReportHandler, GraphicalTheme, NamedSource};
use vernis_croquis::Program;

use crate::diagnostic::LintSummary;
use crate::linter::LintResult;

/// Format lint results as rich terminal output
pub fn format_text(program: &Program<'_>, results: &[LintResult]) -> String {
    let mut output = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());

    for result in results {
        if result.diagnostics.is_empty() {
            continue;
        }

        let source = program
            .unit(result.file)
            .map(|unit| unit.source_text)
            .unwrap_or("");
        let named_source = Arc::new(NamedSource::new(&result.filename, source.to_string()));

        for diagnostic in &result.diagnostics {
            let oxc_diag = diagnostic.clone().into_oxc_diagnostic();
            let report = oxc_diag.with_source_code(Arc::clone(&named_source));

            let mut buf = String::new();
            if handler.render_report(&mut buf, report.as_ref()).is_ok() {
                output.push_str(&buf);
                output.push('\n');
            }
        }
    }

    output
}

/// Format lint results as `file (line,col): message` lines, 1-based.
pub fn format_compact(program: &Program<'_>, results: &[LintResult]) -> String {
    let mut output = String::new();

    for result in results {
        let line_index = program.unit(result.file).map(|unit| &unit.line_index);
        for diagnostic in &result.diagnostics {
            let (line, column) = line_index
                .map(|index| index.line_col(diagnostic.start))
                .unwrap_or((0, diagnostic.start));
            let _ = writeln!(
                output,
                "{} ({},{}): {}",
                result.filename,
                line + 1,
                column + 1,
                diagnostic.message
            );
        }
    }

    output
}

/// Format a summary line
pub fn format_summary(summary: &LintSummary) -> String {
    if summary.is_clean() {
        format!(
            "All clear! ({} file{})",
            summary.file_count,
            plural(summary.file_count)
        )
    } else {
        format!(
            "{} problem{} reported in {} file{}",
            summary.warning_count,
            plural(summary.warning_count),
            summary.flagged_file_count,
            plural(summary.flagged_file_count)
        )
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
