// src/transforms/mod.rs

//! Leaf transform tasks.
//!
//! Each transform is an opaque unit of work with a declared input set, a
//! declared output, and a failure mode; the pipelines in `pipelines`
//! compose them. The actual file processing is deliberately trivial, the
//! contract (and the env-dependent branches) is what matters to the
//! orchestration layer.
//!
//! Source tree layout (relative to the project root):
//! - `src/`: the documented source tree, also the watch root
//! - `vendor/`: third-party files copied in by dedicated tasks
//! - `dist/`: the documented output tree
//! - `.tmp/`: scratch space removed by `clean`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod assets;
pub mod scripts;
pub mod styles;

pub use assets::{clean, copy, template};
pub use scripts::{jquery, lint, modernizr, uglify};
pub use styles::{css_bundle, normalize, sass};

/// Recursively collect regular files under `dir`. Missing directories
/// yield an empty list rather than an error.
fn walk_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];

    while let Some(current) = stack.pop() {
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
            Err(err) => {
                return Err(err).with_context(|| format!("reading {current:?}"))
            }
        };

        for entry in entries {
            let path = entry.with_context(|| format!("reading {current:?}"))?.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Write `contents`, creating parent directories as needed.
fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {parent:?}"))?;
    }
    fs::write(path, contents).with_context(|| format!("writing {path:?}"))
}

/// Read a UTF-8 input file; a missing input is a transform failure.
fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading input {path:?}"))
}

/// Concatenate the given input files in order.
fn concat_inputs(paths: &[PathBuf]) -> Result<String> {
    let mut out = String::new();
    for path in paths {
        out.push_str(&read_input(path)?);
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }
    Ok(out)
}

/// Crude whitespace-stripping pass used by the production-only
/// compression branches.
fn compress(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        out.push_str(trimmed);
        out.push('\n');
    }
    out
}
