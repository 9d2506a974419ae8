//! Module specifier helpers shared by in-memory resolution and the loader.

use std::path::{Path, PathBuf};

use regex::Regex;

/// Extensions probed for a relative specifier, in priority order.
pub const PROBE_EXTENSIONS: [&str; 3] = ["tsx", "ts", "d.ts"];

/// `./x`, `../x` and absolute paths; everything else is a package.
pub fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
}

/// Whether `path` names a TypeScript source the program can load.
pub fn is_typescript_path(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".ts") || name.ends_with(".tsx") || name.ends_with(".mts") || name.ends_with(".cts")
}

/// Paths to try for a relative import of `base`, in priority order.
///
/// A `.js`/`.jsx` suffix stands for the TypeScript sibling, as in ESM-style
/// TypeScript imports.
pub fn candidate_paths(base: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(8);

    if is_typescript_path(base) {
        candidates.push(base.to_path_buf());
    }

    let stem = match base.extension().and_then(|e| e.to_str()) {
        Some("js" | "jsx" | "mjs" | "cjs") => base.with_extension(""),
        _ => base.to_path_buf(),
    };
    for ext in PROBE_EXTENSIONS {
        candidates.push(append_extension(&stem, ext));
    }
    for ext in PROBE_EXTENSIONS {
        candidates.push(stem.join(format!("index.{ext}")));
    }
    candidates
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}

/// Package part of a bare specifier: `react/jsx-runtime` is `react`,
/// `@scope/pkg/sub` is `@scope/pkg`.
pub fn package_name(specifier: &str) -> &str {
    let mut parts = specifier.splitn(3, '/');
    let first = parts.next().unwrap_or_default();
    if first.starts_with('@') {
        match parts.next() {
            Some(second) => &specifier[..first.len() + 1 + second.len()],
            None => specifier,
        }
    } else {
        first
    }
}

/// Directory name under `@types` for a package: `@scope/pkg` is `scope__pkg`.
pub fn types_package_name(package: &str) -> String {
    match package.strip_prefix('@') {
        Some(scoped) => scoped.replacen('/', "__", 1),
        None => package.to_string(),
    }
}

/// `declare module "*.svg"` style pattern with at most one `*`.
pub fn matches_ambient_pattern(pattern: &str, specifier: &str) -> bool {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            specifier.len() >= prefix.len() + suffix.len()
                && specifier.starts_with(prefix)
                && specifier.ends_with(suffix)
        }
        None => pattern == specifier,
    }
}

/// Recognizes the type entry points of one package among loaded paths.
#[derive(Debug)]
pub struct PackagePattern {
    patterns: [Regex; 3],
}

impl PackagePattern {
    pub fn new(package: &str) -> Result<Self, regex::Error> {
        let escaped = regex::escape(package);
        let types = regex::escape(&types_package_name(package));
        Ok(Self {
            patterns: [
                Regex::new(&format!(r"(?:^|/)node_modules/@types/{types}/index\.d\.ts$"))?,
                Regex::new(&format!(r"(?:^|/)node_modules/{escaped}/(?:[^/]+/)*index\.d\.ts$"))?,
                Regex::new(&format!(r"(?:^|/)node_modules/{escaped}\.d\.ts$"))?,
            ],
        })
    }

    /// Priority of `path` as an entry point, lower is better.
    pub fn rank(&self, path: &str) -> Option<usize> {
        self.patterns.iter().position(|re| re.is_match(path))
    }
}
