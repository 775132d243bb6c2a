//! Benchmark Discovery
//!
//! Resolves which files are candidates and which exports of a loaded module
//! run.
//!
//! File selection:
//! - Explicit `--file` paths, resolved against the working directory
//! - Otherwise the configured include globs, resolved against the config directory
//!
//! Only files whose name ends in `bench` before its first `.` are loaded.
//! Exports are then selected by mode prefix and an optional exact-name
//! allow-list. Both filters preserve enumeration order.

use quickbench_core::{Export, Module};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File-name suffix that marks a benchmark file
pub const BENCH_FILE_SUFFIX: &str = "bench";

/// Errors from file discovery
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// An include pattern is not a valid glob
    #[error("invalid include pattern '{pattern}': {source}")]
    Pattern {
        /// Pattern as written in the configuration
        pattern: String,
        /// Underlying glob error
        #[source]
        source: glob::PatternError,
    },
}

/// What a run measures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Time every `bench*` export
    #[default]
    Bench,
    /// Rank the members of every `compare*` export
    Compare,
}

impl RunMode {
    /// Export-name prefix selected by this mode
    pub fn prefix(self) -> &'static str {
        match self {
            RunMode::Bench => "bench",
            RunMode::Compare => "compare",
        }
    }
}

/// Whether `path` names a benchmark file.
///
/// The name up to its first `.` must end in `bench`: `parser_bench.rs` and
/// `mainbench.test.rs` qualify, `utils.rs` does not.
pub fn is_benchmark_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.split_once('.').map_or(name, |(stem, _)| stem))
        .is_some_and(|stem| stem.ends_with(BENCH_FILE_SUFFIX))
}

/// Resolve explicit file arguments against `cwd`, dropping duplicates
pub fn explicit_files(files: &[PathBuf], cwd: &Path) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    files
        .iter()
        .map(|file| cwd.join(file))
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

/// Expand include globs relative to `root`.
///
/// Matches of each pattern come back in path order; a file matched by more
/// than one pattern is listed once, at its first position.
pub fn glob_files(patterns: &[String], root: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        let full = root.join(pattern);
        let full = full.to_string_lossy();
        let paths = glob::glob(&full).map_err(|source| DiscoveryError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;

        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => {
                    if seen.insert(path.clone()) {
                        files.push(path);
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("skipping unreadable path: {}", e),
            }
        }
    }

    tracing::debug!(count = files.len(), "candidate files");
    Ok(files)
}

/// Select the exports of `module` that run in `mode`.
///
/// An export qualifies when its name starts with the mode prefix and, if an
/// allow-list is given, appears in it verbatim.
pub fn select_exports<'m>(
    module: &'m Module,
    mode: RunMode,
    allow_list: Option<&[String]>,
) -> Vec<&'m Export> {
    module
        .exports()
        .iter()
        .filter(|export| export.name().starts_with(mode.prefix()))
        .filter(|export| {
            allow_list.is_none_or(|names| names.iter().any(|name| name == export.name()))
        })
        .collect()
}
