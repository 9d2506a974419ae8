//! # vernis
//!
//! Vernis - Finds inline props in React class component renders.
//!
//! ## Name Origin
//!
//! **Vernis** (/vɛʁ.ni/) is French for varnish, the last coat a painter lays
//! over a finished canvas. It brings out what is already there, flaws
//! included. This crate provides the command-line interface.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "vernis")]
#[command(about = "Finds inline function and array props in React class components", long_about = None)]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long, action = clap::ArgAction::Version)]
    version: (),

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint a React TypeScript project
    #[command(visible_alias = "patina")]
    Lint(commands::lint::LintArgs),
}

fn init_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Lint(args) => commands::lint::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["vernis", "-V"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);

        let err = Cli::try_parse_from(["vernis", "--version"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_lowercase_v_is_not_version() {
        let err = Cli::try_parse_from(["vernis", "-v", "lint"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_verbose_after_subcommand() {
        let cli = Cli::try_parse_from(["vernis", "lint", "src", "--verbose"]).unwrap();
        assert!(cli.verbose);
        let Commands::Lint(args) = cli.command;
        assert_eq!(args.entries, vec!["src".to_string()]);
    }
}
