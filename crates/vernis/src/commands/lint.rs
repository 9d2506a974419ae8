//! Lint command - Find inline props in React class components

use clap::Args;
use glob::glob;
use ignore::Walk;
use oxc_allocator::Allocator;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use vernis_carton::{normalize_path, to_slash};
use vernis_croquis::{LoadError, LoadOptions, Program, ProjectLoader};
use vernis_patina::{
    format_results, format_summary, ComponentFramework, LintResult, Linter, OutputFormat,
    SetupError,
};

use crate::config::{self, ConfigError};

/// Exit code when the run finished within the warning budget.
const EXIT_OK: i32 = 0;
/// Exit code when there are more warnings than `--max-warnings`.
const EXIT_WARNINGS: i32 = 1;
/// Exit code for configuration, loading and setup failures.
const EXIT_FATAL: i32 = 2;

#[derive(Args)]
pub struct LintArgs {
    /// Entry files, directories or glob patterns (defaults to tsconfig `files`)
    pub entries: Vec<String>,

    /// Path to tsconfig.json (searched upward from the first entry otherwise)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Output format (text, compact, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Maximum number of warnings before failing
    #[arg(long, default_value_t = 0)]
    pub max_warnings: usize,

    /// Quiet mode - only show summary
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Error)]
enum LintError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("{0}")]
    Format(String),

    #[error("no .ts or .tsx files found matching: {0:?}")]
    NoFiles(Vec<String>),
}

pub fn run(args: LintArgs) {
    let code = match lint(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            EXIT_FATAL
        }
    };
    std::process::exit(code);
}

fn lint(args: &LintArgs) -> Result<i32, LintError> {
    let start = Instant::now();
    let format: OutputFormat = args.format.parse().map_err(LintError::Format)?;
    let cwd = std::env::current_dir().unwrap_or_default();

    let mut entries = collect_files(&args.entries, &cwd);
    if !args.entries.is_empty() && entries.is_empty() {
        return Err(LintError::NoFiles(args.entries.clone()));
    }

    let config_path = match &args.project {
        Some(path) => cwd.join(path),
        None => {
            let search_from = entries
                .first()
                .and_then(|entry| entry.parent())
                .unwrap_or(cwd.as_path());
            config::find_config(search_from).ok_or(ConfigError::NotFound)?
        }
    };
    let config = config::load_config(&config_path)?;
    if !args.quiet {
        eprintln!("Using config file at {}", display_path(&config.path, &cwd));
    }

    if entries.is_empty() {
        entries = config.files.clone();
    }
    if entries.is_empty() {
        return Err(LintError::NoFiles(vec![config.path.display().to_string()]));
    }

    if !args.quiet {
        eprintln!("Parsing project...");
    }
    let allocator = Allocator::default();
    let options = LoadOptions {
        base_url: config.base_url.clone(),
        root_dir: Some(config.dir().to_path_buf()),
        automatic_types: config.types.is_none(),
    };
    let program = ProjectLoader::new(&allocator, options).load(&entries)?;

    let linter = Linter::new(&program, &ComponentFramework::REACT)?;
    if !args.quiet {
        eprintln!("Linting {} TSX files...", program.lint_targets().count());
    }

    let (mut results, summary) = linter.lint_program();
    relativize(&mut results, &program, &cwd);

    if !args.quiet || summary.warning_count > 0 {
        let output = format_results(&program, &results, format);
        if !output.trim().is_empty() {
            print!("{}", output);
            if format == OutputFormat::Json {
                println!();
            }
        }
    }

    if format != OutputFormat::Json {
        println!("{}", format_summary(&summary));
        tracing::debug!("linted {} files in {:.4?}", summary.file_count, start.elapsed());
    }

    if summary.warning_count > args.max_warnings {
        if args.max_warnings > 0 {
            eprintln!(
                "Too many warnings ({} > max {})",
                summary.warning_count, args.max_warnings
            );
        }
        return Ok(EXIT_WARNINGS);
    }

    Ok(EXIT_OK)
}

/// Expand entries into TypeScript files, as absolute paths.
///
/// Patterns with glob characters go through `glob`, directories are walked
/// honoring `.gitignore`, anything else is taken as a file path.
fn collect_files(entries: &[String], cwd: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = entries
        .iter()
        .flat_map(|entry| {
            if entry.contains('*') || entry.contains('?') || entry.contains('[') {
                glob(entry)
                    .ok()
                    .into_iter()
                    .flatten()
                    .filter_map(|r| r.ok())
                    .filter(|p| {
                        is_typescript_file(p)
                            && !p.components().any(|c| c.as_os_str() == "node_modules")
                    })
                    .collect::<Vec<_>>()
            } else if cwd.join(entry).is_dir() {
                Walk::new(cwd.join(entry))
                    .filter_map(|e| e.ok())
                    .filter(|e| is_typescript_file(e.path()))
                    .map(|e| e.path().to_path_buf())
                    .collect::<Vec<_>>()
            } else {
                vec![PathBuf::from(entry)]
            }
        })
        .map(|path| normalize_path(&cwd.join(path)))
        .collect();

    files.sort();
    files.dedup();
    files
}

fn is_typescript_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "ts" || ext == "tsx")
}

/// Rewrite result filenames relative to `cwd` for display.
fn relativize(results: &mut [LintResult], program: &Program<'_>, cwd: &Path) {
    for result in results {
        if let Some(unit) = program.unit(result.file) {
            result.filename = display_path(&unit.path, cwd);
        }
    }
}

fn display_path(path: &Path, cwd: &Path) -> String {
    let cwd = normalize_path(cwd);
    to_slash(path.strip_prefix(&cwd).unwrap_or(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn relative(files: &[PathBuf], root: &Path) -> Vec<String> {
        files.iter().map(|f| display_path(f, root)).collect()
    }

    #[test]
    fn test_collect_directory_and_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/App.tsx", "");
        write(root, "src/util.ts", "");
        write(root, "src/style.css", "");
        write(root, "other/Main.tsx", "");

        let files = collect_files(&["src".to_string(), "other/Main.tsx".to_string()], root);
        assert_eq!(
            relative(&files, root),
            vec!["other/Main.tsx", "src/App.tsx", "src/util.ts"]
        );
    }

    #[test]
    fn test_collect_glob() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/a/One.tsx", "");
        write(root, "src/b/Two.tsx", "");
        write(root, "src/node_modules/x/Three.tsx", "");

        let pattern = format!("{}/src/**/*.tsx", to_slash(root));
        let files = collect_files(&[pattern], root);
        assert_eq!(relative(&files, root), vec!["src/a/One.tsx", "src/b/Two.tsx"]);
    }

    #[test]
    fn test_display_path_outside_cwd() {
        let path = Path::new("/elsewhere/App.tsx");
        assert_eq!(display_path(path, Path::new("/project")), "/elsewhere/App.tsx");
        assert_eq!(
            display_path(Path::new("/project/src/App.tsx"), Path::new("/project")),
            "src/App.tsx"
        );
    }
}
