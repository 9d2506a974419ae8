//! On-disk project loading.
//!
//! Starting from the entry files, every import that resolves to a TypeScript
//! source is read, parsed and queued, breadth first. Resolution mirrors the
//! parts of TypeScript's node resolution that matter for type lookup:
//! relative paths, `baseUrl`, and `node_modules` typings.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use oxc_allocator::Allocator;
use serde::Deserialize;
use vernis_carton::normalize_path;

use crate::builder::ProgramBuilder;
use crate::error::LoadError;
use crate::modules::{self, is_typescript_path};
use crate::program::Program;

/// Options for [`ProjectLoader`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// `compilerOptions.baseUrl`, for non-relative imports of project files
    pub base_url: Option<PathBuf>,
    /// Project root, where the search for `node_modules/@types` starts
    pub root_dir: Option<PathBuf>,
    /// Load every `node_modules/@types` package up front, like `tsc` does
    /// when `compilerOptions.types` is unset
    pub automatic_types: bool,
}

/// The fields of `package.json` that point at typings.
#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    types: Option<String>,
    typings: Option<String>,
}

/// Loads a [`Program`] from disk.
pub struct ProjectLoader<'a> {
    allocator: &'a Allocator,
    options: LoadOptions,
}

impl<'a> ProjectLoader<'a> {
    pub fn new(allocator: &'a Allocator, options: LoadOptions) -> Self {
        Self { allocator, options }
    }

    /// Load `entries` and everything they import.
    ///
    /// Unreadable entries are fatal. Unreadable imports are skipped with a
    /// warning.
    pub fn load<P: AsRef<Path>>(&self, entries: &[P]) -> Result<Program<'a>, LoadError> {
        if entries.is_empty() {
            return Err(LoadError::NoEntries);
        }

        let mut builder = ProgramBuilder::new(self.allocator);
        let mut queue = VecDeque::new();

        for entry in entries {
            let path = normalize_path(entry.as_ref());
            if builder.file_id(&path).is_some() {
                continue;
            }
            let text = fs::read_to_string(&path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            queue.push_back(builder.add_source(&path, &text));
        }

        if self.options.automatic_types {
            for path in self.automatic_type_entries() {
                if builder.file_id(&path).is_some() {
                    continue;
                }
                match fs::read_to_string(&path) {
                    Ok(text) => queue.push_back(builder.add_source(&path, &text)),
                    Err(err) => tracing::warn!("skipping {}: {err}", path.display()),
                }
            }
        }

        while let Some(file) = queue.pop_front() {
            let Some(from) = builder.unit(file).map(|unit| unit.path.clone()) else {
                continue;
            };

            for specifier in builder.import_specifiers(file) {
                let Some(resolved) = self.resolve(&from, &specifier) else {
                    tracing::debug!("cannot resolve '{specifier}' from {}", from.display());
                    continue;
                };
                builder.record_resolution(file, &specifier, &resolved);
                if builder.file_id(&resolved).is_some() {
                    continue;
                }

                match fs::read_to_string(&resolved) {
                    Ok(text) => queue.push_back(builder.add_source(&resolved, &text)),
                    Err(err) => tracing::warn!("skipping {}: {err}", resolved.display()),
                }
            }
        }

        tracing::debug!("loaded {} source files", builder.len());
        Ok(builder.build())
    }

    /// Resolve `specifier` imported from the file at `from` to a path on disk.
    pub fn resolve(&self, from: &Path, specifier: &str) -> Option<PathBuf> {
        let dir = from.parent().unwrap_or_else(|| Path::new(""));

        if modules::is_relative(specifier) {
            return first_file(&normalize_path(&dir.join(specifier)));
        }

        if let Some(base_url) = &self.options.base_url {
            if let Some(found) = first_file(&normalize_path(&base_url.join(specifier))) {
                return Some(found);
            }
        }

        let package = modules::package_name(specifier);
        let subpath = specifier[package.len()..].trim_start_matches('/');
        let types_name = modules::types_package_name(package);

        for ancestor in dir.ancestors() {
            let node_modules = ancestor.join("node_modules");
            if !node_modules.is_dir() {
                continue;
            }

            let types_dir = node_modules.join("@types").join(&types_name);
            let package_dir = node_modules.join(package);

            let found = if subpath.is_empty() {
                package_entry(&types_dir)
                    .or_else(|| package_entry(&package_dir))
                    .or_else(|| existing(node_modules.join(format!("{package}.d.ts"))))
            } else {
                first_file(&types_dir.join(subpath)).or_else(|| first_file(&package_dir.join(subpath)))
            };

            if let Some(found) = found {
                return Some(normalize_path(&found));
            }
        }

        None
    }

    /// Entry points of every package under the nearest `node_modules/@types`.
    fn automatic_type_entries(&self) -> Vec<PathBuf> {
        let Some(root) = &self.options.root_dir else {
            return Vec::new();
        };

        for ancestor in root.ancestors() {
            let types_root = ancestor.join("node_modules").join("@types");
            let Ok(read_dir) = fs::read_dir(&types_root) else {
                continue;
            };

            let mut packages: Vec<PathBuf> = read_dir
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_dir())
                .collect();
            packages.sort();

            return packages
                .iter()
                .filter_map(|dir| package_entry(dir))
                .map(|path| normalize_path(&path))
                .collect();
        }

        Vec::new()
    }
}

/// Typings entry of an installed package directory.
fn package_entry(dir: &Path) -> Option<PathBuf> {
    if !dir.is_dir() {
        return None;
    }

    if let Ok(text) = fs::read_to_string(dir.join("package.json")) {
        match serde_json::from_str::<PackageJson>(&text) {
            Ok(manifest) => {
                if let Some(types) = manifest.types.or(manifest.typings) {
                    if let Some(found) = first_file(&dir.join(types)) {
                        return Some(found);
                    }
                }
            }
            Err(err) => {
                tracing::debug!("ignoring malformed {}: {err}", dir.join("package.json").display());
            }
        }
    }

    existing(dir.join("index.d.ts"))
}

/// First existing TypeScript file among the probe candidates for `base`.
fn first_file(base: &Path) -> Option<PathBuf> {
    modules::candidate_paths(base)
        .into_iter()
        .find(|path| path.is_file())
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    (path.is_file() && is_typescript_path(&path)).then_some(path)
}
