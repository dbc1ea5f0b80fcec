// src/watch/patterns.rs

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Compiled watch/exclude glob patterns for a single binding.
///
/// Patterns are relative to the project root; [`CompiledGlobs::matches`]
/// takes relative paths with forward slashes (e.g. `"src/css/style.css"`).
#[derive(Clone)]
pub struct CompiledGlobs {
    watch_set: GlobSet,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for CompiledGlobs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledGlobs").finish_non_exhaustive()
    }
}

impl CompiledGlobs {
    /// Compile watch and exclude pattern lists.
    pub fn compile(watch: &[String], exclude: &[String]) -> Result<Self> {
        let watch_set = build_globset(watch).context("building watch globset")?;
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude).context("building exclude globset")?)
        };

        Ok(Self {
            watch_set,
            exclude_set,
        })
    }

    /// Whether a changed path (relative to the project root) is relevant.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.watch_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob =
            Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Falls back to canonicalizing both sides when the event path uses a
/// different absolute prefix for the same directory (symlinks,
/// `/private/var/...` on macOS). Returns `None` if the path cannot be
/// related to `root` at all.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(rel.to_string_lossy().replace('\\', "/"));
    }

    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize())
    {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(rel.to_string_lossy().replace('\\', "/"));
        }
    }

    None
}
