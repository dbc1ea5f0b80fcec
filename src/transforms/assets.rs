// src/transforms/assets.rs

//! Asset and housekeeping transforms: `clean`, `copy`, `template`.

use std::fs;
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};

use crate::environment::DEVELOPMENT;
use crate::task::TaskFn;
use crate::transforms::{read_input, walk_files, write_file};
use crate::watch::CompiledGlobs;

/// Static asset globs copied verbatim from `src/` to `dist/`.
const COPY_PATTERNS: &[&str] = &[
    "src/*.php",
    "src/*.png",
    "src/*.css",
    "src/modules/*.php",
    "src/img/**/*.{jpg,png,svg,gif,webp,ico}",
    "src/fonts/*.{woff,woff2,ttf,otf,eot,svg}",
    "src/languages/*.{po,mo,pot}",
];

/// Remove the `.tmp/` and `dist/` output trees. Missing targets are fine.
pub fn clean() -> TaskFn {
    Arc::new(|ctx| {
        Box::pin(async move {
            for target in [".tmp", "dist"] {
                let path = ctx.path(target);
                match fs::remove_dir_all(&path) {
                    Ok(()) => debug!(?path, "removed"),
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                    Err(err) => {
                        return Err(err).with_context(|| format!("removing {path:?}"))
                    }
                }
            }
            Ok(())
        })
    })
}

/// Copy static assets matching [`COPY_PATTERNS`] from `src/` to `dist/`,
/// preserving relative paths.
pub fn copy() -> TaskFn {
    Arc::new(|ctx| {
        Box::pin(async move {
            let patterns: Vec<String> =
                COPY_PATTERNS.iter().map(|s| s.to_string()).collect();
            let globs = CompiledGlobs::compile(&patterns, &[])?;

            let src_root = ctx.path("src");
            let mut copied = 0usize;

            for path in walk_files(&src_root)? {
                let rel = match path.strip_prefix(ctx.root()) {
                    Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
                    Err(_) => continue,
                };
                if !globs.matches(&rel) {
                    continue;
                }

                let Ok(under_src) = path.strip_prefix(&src_root) else {
                    continue;
                };
                let dest = ctx.path("dist").join(under_src);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating {parent:?}"))?;
                }
                fs::copy(&path, &dest)
                    .with_context(|| format!("copying {path:?} to {dest:?}"))?;
                copied += 1;
            }

            info!(copied, "static assets copied to dist");
            Ok(())
        })
    })
}

/// Render `src/dev-templates/is-debug.php` into `src/modules/is-debug.php`,
/// substituting the debug placeholder from the environment at run time
/// (`development` renders `true`, anything else `false`).
pub fn template() -> TaskFn {
    Arc::new(|ctx| {
        Box::pin(async move {
            let env = ctx.env().get();
            let is_debug = if env == DEVELOPMENT { "true" } else { "false" };
            info!(env = %env, is_debug, "rendering debug template");

            let source = read_input(&ctx.path("src/dev-templates/is-debug.php"))?;
            let rendered = source.replace("<%= is_debug %>", is_debug);
            write_file(&ctx.path("src/modules/is-debug.php"), &rendered)?;
            Ok(())
        })
    })
}
