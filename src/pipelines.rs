// src/pipelines.rs

//! Fixed, named pipeline definitions.
//!
//! This is the hand-written wiring between leaf transforms, the series
//! composer, and the watch trigger:
//!
//! - `styles`  = series(sass, css-bundle)
//! - `build`   = series(env-production, clean, template, styles,
//!               modernizr, lint, copy, uglify)
//! - `watch`   = series(template, styles, lint, modernizr, jquery,
//!               normalize), then the watch session
//! - `default` = `watch`
//!
//! The `build` pipeline never starts the watch trigger; the `watch`
//! pipeline always ends with it.

use std::sync::Arc;

use tracing::info;

use crate::environment::PRODUCTION;
use crate::errors::{Result, TaskpipeError};
use crate::task::{TaskHandle, TaskRegistry};
use crate::watch::WatchTrigger;

/// Path globs bound to a task for the watch session.
#[derive(Debug)]
pub struct BindingSpec {
    pub watch: Vec<String>,
    pub exclude: Vec<String>,
    pub task: TaskHandle,
}

/// The named top-level pipelines, built once at startup.
#[derive(Debug)]
pub struct Pipelines {
    pub build: TaskHandle,
    pub watch_setup: TaskHandle,
    pub bindings: Vec<BindingSpec>,
}

/// What the invocation selected.
#[derive(Debug)]
pub enum Selection<'a> {
    /// Run the composite and exit with its outcome.
    Build(&'a TaskHandle),
    /// Run the setup composite, then hand control to the watch trigger.
    Watch(&'a TaskHandle),
}

impl Pipelines {
    /// Resolve a pipeline selector from the invocation surface.
    pub fn select(&self, name: &str) -> Result<Selection<'_>> {
        match name {
            "build" => Ok(Selection::Build(&self.build)),
            "watch" | "default" => Ok(Selection::Watch(&self.watch_setup)),
            other => Err(TaskpipeError::UnknownTask(other.to_string())),
        }
    }

    /// Build the watch trigger from this pipeline's bindings.
    ///
    /// Bindings are fixed for the life of the session.
    pub fn watch_trigger(&self) -> Result<WatchTrigger> {
        let mut trigger = WatchTrigger::new();
        for spec in &self.bindings {
            trigger.bind(&spec.watch, &spec.exclude, spec.task.clone())?;
        }
        Ok(trigger)
    }
}

/// Populate the registry with every leaf and composite task and wire the
/// named pipelines together.
pub fn register_all(registry: &mut TaskRegistry) -> Result<Pipelines> {
    use crate::transforms;

    let clean = registry.register_leaf("clean", transforms::clean())?;
    let copy = registry.register_leaf("copy", transforms::copy())?;
    let sass = registry.register_leaf("sass", transforms::sass())?;
    let css_bundle = registry.register_leaf("css-bundle", transforms::css_bundle())?;
    let lint = registry.register_leaf("lint", transforms::lint())?;
    let template = registry.register_leaf("template", transforms::template())?;
    let modernizr = registry.register_leaf("modernizr", transforms::modernizr())?;
    let uglify = registry.register_leaf("uglify", transforms::uglify())?;
    let jquery = registry.register_leaf("jquery", transforms::jquery())?;
    let normalize = registry.register_leaf("normalize", transforms::normalize())?;

    // Force-environment task: overwrites the context's environment and
    // always succeeds.
    let env_production = registry.register_leaf(
        "env-production",
        Arc::new(|ctx| {
            Box::pin(async move {
                info!("forcing production environment");
                ctx.env().set(PRODUCTION);
                Ok(())
            })
        }),
    )?;

    let styles =
        registry.register_series("styles", vec![sass.clone(), css_bundle.clone()])?;

    let build = registry.register_series(
        "build",
        vec![
            env_production,
            clean,
            template.clone(),
            styles.clone(),
            modernizr.clone(),
            lint.clone(),
            copy,
            uglify,
        ],
    )?;

    let watch_setup = registry.register_series(
        "watch-setup",
        vec![template, styles.clone(), lint.clone(), modernizr, jquery, normalize],
    )?;

    let bindings = vec![
        BindingSpec {
            watch: strings(&["src/css/*.css", "src/css/sass/**/*.scss"]),
            exclude: Vec::new(),
            task: styles,
        },
        BindingSpec {
            watch: strings(&["src/js/**/*.js"]),
            exclude: strings(&["src/js/lib/**"]),
            task: lint,
        },
    ];

    Ok(Pipelines {
        build,
        watch_setup,
        bindings,
    })
}

fn strings(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|s| s.to_string()).collect()
}
