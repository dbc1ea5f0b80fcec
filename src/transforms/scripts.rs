// src/transforms/scripts.rs

//! Script transforms: `lint`, `modernizr`, `uglify`, `jquery`.

use std::sync::Arc;

use anyhow::bail;

use crate::task::{TaskContext, TaskFn};
use crate::transforms::{compress, concat_inputs, read_input, walk_files, write_file};

/// Script inputs for the minified bundle, in concatenation order.
///
/// The conditionizr build ships pre-minified in the source tree; no task
/// regenerates it.
fn script_inputs(ctx: &TaskContext) -> Vec<std::path::PathBuf> {
    vec![
        ctx.path("src/js/lib/modernizr.js"),
        ctx.path("src/js/lib/conditionizr-4.3.0.min.js"),
        ctx.path("src/js/lib/jquery.js"),
        ctx.path("src/js/scripts.js"),
    ]
}

/// Check first-party scripts under `src/js/`, skipping `src/js/lib/`.
///
/// Fails when any checked file still contains a `debugger` statement.
pub fn lint() -> TaskFn {
    Arc::new(|ctx| {
        Box::pin(async move {
            let lib_dir = ctx.path("src/js/lib");

            for path in walk_files(&ctx.path("src/js"))? {
                if path.starts_with(&lib_dir) {
                    continue;
                }
                if path.extension().and_then(|e| e.to_str()) != Some("js") {
                    continue;
                }

                let source = read_input(&path)?;
                if source.contains("debugger") {
                    bail!("debugger statement left in {path:?}");
                }
            }

            Ok(())
        })
    })
}

/// Generate the feature-detection shim at `src/js/lib/modernizr.js`.
pub fn modernizr() -> TaskFn {
    Arc::new(|ctx| {
        Box::pin(async move {
            let shim = "/* generated feature-detection build */\n\
                        window.Modernizr = window.Modernizr || {};\n";
            write_file(&ctx.path("src/js/lib/modernizr.js"), shim)?;
            Ok(())
        })
    })
}

/// Concatenate and minify the script bundle into `dist/js/scripts.min.js`.
///
/// Any missing input in the fixed script list is a failure.
pub fn uglify() -> TaskFn {
    Arc::new(|ctx| {
        Box::pin(async move {
            let bundled = concat_inputs(&script_inputs(&ctx))?;
            write_file(&ctx.path("dist/js/scripts.min.js"), &compress(&bundled))?;
            Ok(())
        })
    })
}

/// Copy `vendor/jquery/jquery.js` into `src/js/lib/`.
pub fn jquery() -> TaskFn {
    Arc::new(|ctx| {
        Box::pin(async move {
            let contents = read_input(&ctx.path("vendor/jquery/jquery.js"))?;
            write_file(&ctx.path("src/js/lib/jquery.js"), &contents)?;
            Ok(())
        })
    })
}
