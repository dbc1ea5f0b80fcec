// src/task/series.rs

//! Strictly-sequential task execution.
//!
//! [`run`] drives a task to completion. For a series, members execute in
//! sequence order; the first failure stops the series and is attributed
//! to the member that failed. Effects of already-completed members are
//! not rolled back.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, info, warn};

use crate::errors::{Result, TaskpipeError};
use crate::task::{TaskContext, TaskHandle, TaskUnit};

/// Execute a task (leaf or series) to completion.
///
/// Each member of a series is awaited fully, including any asynchronous
/// work it performs internally, before the next member starts. An empty
/// series trivially succeeds. Nested series recurse with the same rules.
pub async fn run(handle: &TaskHandle, ctx: TaskContext) -> Result<()> {
    run_boxed(handle.clone(), ctx).await
}

// Recursion through nested series needs an explicitly boxed future.
fn run_boxed(
    handle: TaskHandle,
    ctx: TaskContext,
) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
    Box::pin(async move {
        match &handle.task().unit {
            TaskUnit::Leaf(body) => run_leaf(handle.name(), body(ctx)).await,
            TaskUnit::Series(members) => {
                debug!(
                    task = %handle.name(),
                    members = members.len(),
                    "series started"
                );

                for member in members.clone() {
                    run_boxed(member, ctx.clone()).await?;
                }

                debug!(task = %handle.name(), "series finished");
                Ok(())
            }
        }
    })
}

async fn run_leaf(
    name: &str,
    body: impl Future<Output = anyhow::Result<()>>,
) -> Result<()> {
    info!(task = %name, "task started");

    match body.await {
        Ok(()) => {
            info!(task = %name, "task succeeded");
            Ok(())
        }
        Err(err) => {
            warn!(task = %name, error = %err, "task failed");
            Err(TaskpipeError::transform(name, err))
        }
    }
}
