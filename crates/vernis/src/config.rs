//! `tsconfig.json` discovery and loading.
//!
//! Only the options that affect which files are loaded and how imports
//! resolve are read. `extends` is not followed.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use vernis_carton::normalize_path;

pub const CONFIG_FILE_NAME: &str = "tsconfig.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find a valid 'tsconfig.json'.")]
    NotFound,

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default)]
    compiler_options: RawCompilerOptions,
    files: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompilerOptions {
    base_url: Option<String>,
    types: Option<Vec<String>>,
}

/// A loaded `tsconfig.json`, with paths resolved against its directory.
#[derive(Debug, Clone)]
pub struct TsConfig {
    pub path: PathBuf,
    pub base_url: Option<PathBuf>,
    /// `compilerOptions.types`; `None` means every `@types` package is visible
    pub types: Option<Vec<String>>,
    pub files: Vec<PathBuf>,
}

impl TsConfig {
    /// Directory containing the config file.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Search `start` and its ancestors for a `tsconfig.json`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Read and parse the config at `path`.
pub fn load_config(path: &Path) -> Result<TsConfig, ConfigError> {
    let path = normalize_path(path);
    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let raw: RawConfig =
        serde_json::from_str(&strip_jsonc(&text)).map_err(|source| ConfigError::Json {
            path: path.clone(),
            source,
        })?;

    let dir = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
    Ok(TsConfig {
        base_url: raw
            .compiler_options
            .base_url
            .map(|base_url| normalize_path(&dir.join(base_url))),
        types: raw.compiler_options.types,
        files: raw
            .files
            .unwrap_or_default()
            .iter()
            .map(|file| normalize_path(&dir.join(file)))
            .collect(),
        path,
    })
}

/// Turn JSON with comments and trailing commas into plain JSON.
/// Comments become whitespace; line breaks inside them are kept.
fn strip_jsonc(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some((i, ch)) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '/' if bytes.get(i + 1) == Some(&b'/') => {
                while let Some((_, next)) = chars.peek() {
                    if *next == '\n' {
                        break;
                    }
                    chars.next();
                }
                out.push(' ');
            }
            '/' if bytes.get(i + 1) == Some(&b'*') => {
                chars.next();
                let mut previous = '\0';
                for (_, next) in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if previous == '*' && next == '/' {
                        break;
                    }
                    previous = next;
                }
                out.push(' ');
            }
            ',' => {
                let rest = input[i + 1..].trim_start();
                let closes = rest.starts_with('}') || rest.starts_with(']');
                // Comments between the comma and the bracket are not looked through
                if !closes {
                    out.push(ch);
                }
            }
            _ => out.push(ch),
        }
    }

    out
}
