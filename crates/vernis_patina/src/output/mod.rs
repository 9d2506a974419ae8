//! Output formatters for lint diagnostics.

mod text;

pub use text::*;

use serde::Serialize;
use vernis_croquis::Program;

use crate::linter::LintResult;

/// Output format for lint results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Rich terminal output with code snippets
    #[default]
    Text,
    /// One `file (line,col): message` line per finding
    Compact,
    /// JSON output for tooling integration
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}', expected text, compact or json")),
        }
    }
}

/// Format lint results according to the specified format
///
/// Source text and line tables come from `program`, matched by
/// [`LintResult::file`]; `filename` is only used for display.
pub fn format_results(program: &Program<'_>, results: &[LintResult], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_text(program, results),
        OutputFormat::Compact => format_compact(program, results),
        OutputFormat::Json => format_json(program, results),
    }
}

/// JSON output structure for a single file
#[derive(Debug, Serialize)]
pub struct JsonFileResult {
    pub file: String,
    pub messages: Vec<JsonMessage>,
    #[serde(rename = "warningCount")]
    pub warning_count: usize,
}

/// JSON output structure for a single message
#[derive(Debug, Serialize)]
pub struct JsonMessage {
    #[serde(rename = "ruleId")]
    pub rule_id: &'static str,
    pub code: u32,
    pub severity: u8,
    pub message: String,
    /// 1-based
    pub line: u32,
    /// 1-based
    pub column: u32,
    #[serde(rename = "endLine")]
    pub end_line: u32,
    #[serde(rename = "endColumn")]
    pub end_column: u32,
}

/// Format results as JSON
fn format_json(program: &Program<'_>, results: &[LintResult]) -> String {
    let json_results: Vec<JsonFileResult> = results
        .iter()
        .map(|r| {
            let line_index = program.unit(r.file).map(|unit| &unit.line_index);
            JsonFileResult {
                file: r.filename.clone(),
                messages: r
                    .diagnostics
                    .iter()
                    .map(|d| {
                        let ((line, column), (end_line, end_column)) = match line_index {
                            Some(index) => (index.line_col(d.start), index.line_col(d.end())),
                            None => ((0, d.start), (0, d.end())),
                        };
                        JsonMessage {
                            rule_id: d.rule_name,
                            code: d.code,
                            severity: d.severity.level(),
                            message: d.message.to_string(),
                            line: line + 1,
                            column: column + 1,
                            end_line: end_line + 1,
                            end_column: end_column + 1,
                        }
                    })
                    .collect(),
                warning_count: r.warning_count,
            }
        })
        .collect();

    serde_json::to_string_pretty(&json_results).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::ComponentFramework;
    use crate::linter::Linter;
    use oxc_allocator::Allocator;
    use vernis_croquis::ProgramBuilder;

    const REACT: &str = r#"
export = React;
export as namespace React;
declare namespace React { class Component<P, S> {} }
"#;

    const APP: &str = "class App extends React.Component {
    render() {
        return <List items={[]} />;
    }
}
";

    #[test]
    fn test_parse_format() {
        assert_eq!("compact".parse::<OutputFormat>(), Ok(OutputFormat::Compact));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn test_format_json_positions() {
        let allocator = Allocator::default();
        let mut builder = ProgramBuilder::new(&allocator);
        builder.add_source("/p/node_modules/@types/react/index.d.ts", REACT);
        builder.add_source("/p/App.tsx", APP);
        let program = builder.build();

        let linter = Linter::new(&program, &ComponentFramework::REACT).unwrap();
        let (results, _) = linter.lint_program();
        let output = format_results(&program, &results, OutputFormat::Json);

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        let message = &json[0]["messages"][0];
        assert_eq!(json[0]["file"], "/p/App.tsx");
        assert_eq!(json[0]["warningCount"], 1);
        assert!(json[0].get("errorCount").is_none());
        assert_eq!(message["ruleId"], "react/no-inline-props");
        assert_eq!(message["code"], 420000);
        assert_eq!(message["severity"], 1);
        assert_eq!(message["line"], 3);
        assert_eq!(message["column"], 22);
        assert_eq!(message["endLine"], 3);
        assert_eq!(message["endColumn"], 32);
    }
}
