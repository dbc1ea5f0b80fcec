// src/transforms/styles.rs

//! Stylesheet transforms: `sass`, `css-bundle`, `normalize`.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::task::{TaskContext, TaskFn};
use crate::transforms::{compress, concat_inputs, read_input, write_file};

/// Stylesheet input sets per environment, in bundle order.
fn css_inputs(ctx: &TaskContext, env: &str) -> Vec<PathBuf> {
    let mut inputs = vec![ctx.path("src/css/banner.css")];
    if env == crate::environment::PRODUCTION {
        inputs.push(ctx.path("vendor/normalize/normalize.css"));
    }
    inputs.push(ctx.path("src/css/style.css"));
    inputs
}

/// Compile `src/css/sass/style.scss` into `src/css/style.css`.
///
/// A missing stylesheet source is a failure.
pub fn sass() -> TaskFn {
    Arc::new(|ctx| {
        Box::pin(async move {
            let source = read_input(&ctx.path("src/css/sass/style.scss"))?;
            write_file(&ctx.path("src/css/style.css"), &source)?;
            Ok(())
        })
    })
}

/// Concatenate the environment-selected stylesheet set into `src/style.css`.
///
/// Consults the environment at the moment it runs: the production set
/// additionally pulls in the vendored normalize stylesheet and the result
/// goes through an extra compression pass.
pub fn css_bundle() -> TaskFn {
    Arc::new(|ctx| {
        Box::pin(async move {
            let env = ctx.env().get();
            info!(env = %env, "bundling stylesheets");

            let inputs = css_inputs(&ctx, &env);
            let mut bundled = concat_inputs(&inputs)?;

            if env == crate::environment::PRODUCTION {
                bundled = compress(&bundled);
            }

            write_file(&ctx.path("src/style.css"), &bundled)?;
            Ok(())
        })
    })
}

/// Copy `vendor/normalize/normalize.css` into `src/css/lib/`.
pub fn normalize() -> TaskFn {
    Arc::new(|ctx| {
        Box::pin(async move {
            let contents = read_input(&ctx.path("vendor/normalize/normalize.css"))?;
            write_file(&ctx.path("src/css/lib/normalize.css"), &contents)?;
            Ok(())
        })
    })
}
