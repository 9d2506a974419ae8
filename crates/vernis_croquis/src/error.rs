//! Errors raised while loading a project from disk.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal loading failures. Problems with imported files are logged and
/// skipped instead.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no input files")]
    NoEntries,
}
