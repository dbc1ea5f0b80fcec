// src/lib.rs

pub mod cli;
pub mod environment;
pub mod errors;
pub mod logging;
pub mod pipelines;
pub mod task;
pub mod transforms;
pub mod watch;

use tokio::sync::oneshot;
use tracing::info;

use crate::cli::CliArgs;
use crate::environment::Environment;
use crate::errors::Result;
use crate::pipelines::{Pipelines, Selection};
use crate::task::{series, TaskContext, TaskRegistry};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - environment resolution (runs first, fixes the active environment)
/// - registry population and pipeline wiring
/// - series execution of the selected pipeline
/// - (watch mode) the resident watch session and Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    // The resolver owns the `[A-Za-z]+` rule, so the value from the
    // parsed flag goes through it as well.
    let resolved = match args.env.as_deref() {
        Some(value) => environment::resolve([format!("--env={value}")]),
        None => environment::resolve(std::env::args().skip(1)),
    };
    info!(env = %resolved, "active environment");

    let ctx = TaskContext::new(&args.root, Environment::new(resolved));

    let mut registry = TaskRegistry::new();
    let pipes = pipelines::register_all(&mut registry)?;

    if args.list {
        print_tasks(&registry, &pipes);
        return Ok(());
    }

    match pipes.select(&args.pipeline)? {
        Selection::Build(build) => {
            series::run(build, ctx).await?;
            info!("build complete");
            Ok(())
        }
        Selection::Watch(setup) => {
            // The session is entered only after the whole setup series
            // succeeded.
            series::run(setup, ctx.clone()).await?;

            let trigger = pipes.watch_trigger()?;
            let shutdown_rx = spawn_ctrl_c_handler();

            let root = ctx.root().to_path_buf();
            trigger.start(&root, ctx, shutdown_rx).await
        }
    }
}

/// Ctrl-C → graceful session shutdown.
fn spawn_ctrl_c_handler() -> oneshot::Receiver<()> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = tx.send(());
    });
    rx
}

/// `--list` output: registered tasks plus pipeline composition.
fn print_tasks(registry: &TaskRegistry, pipes: &Pipelines) {
    println!("taskpipe tasks:");
    for name in registry.task_names() {
        match registry.resolve(name).ok().and_then(|h| {
            h.task()
                .members()
                .map(|m| m.iter().map(|t| t.name().to_string()).collect::<Vec<_>>())
        }) {
            Some(members) => println!("  - {name} (series: {})", members.join(" -> ")),
            None => println!("  - {name}"),
        }
    }

    println!();
    println!("watch bindings:");
    for spec in &pipes.bindings {
        println!(
            "  - {:?} (exclude {:?}) -> {}",
            spec.watch,
            spec.exclude,
            spec.task.name()
        );
    }
}
