// src/task/mod.rs

//! Task model and execution.
//!
//! - [`registry`] owns every task definition for the process lifetime and
//!   hands out capability handles at registration time.
//! - [`series`] executes a task (leaf or series) strictly sequentially.
//!
//! A task is either a *leaf* (one opaque unit of work) or a *series* (an
//! ordered list of previously-registered tasks). Both are invoked with a
//! [`TaskContext`], the explicit context value that replaces any global
//! mutable state.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use crate::environment::Environment;

pub mod registry;
pub mod series;

pub use registry::{TaskHandle, TaskRegistry};

/// Canonical task name type.
pub type TaskName = String;

/// Boxed future returned by a leaf task body.
pub type TaskFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// A leaf task body: an async closure over the task context.
pub type TaskFn = Arc<dyn Fn(TaskContext) -> TaskFuture + Send + Sync>;

/// Context value passed to every task invocation.
///
/// Carries the project root and the shared environment cell. Cloning is
/// cheap and clones observe the same environment, so an override performed
/// by an earlier series member is visible to later members.
#[derive(Debug, Clone)]
pub struct TaskContext {
    root: Arc<PathBuf>,
    env: Environment,
}

impl TaskContext {
    pub fn new(root: impl Into<PathBuf>, env: Environment) -> Self {
        Self {
            root: Arc::new(root.into()),
            env,
        }
    }

    /// Project root containing the `src/` tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a path relative to the project root.
    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }

    /// The shared environment cell.
    pub fn env(&self) -> &Environment {
        &self.env
    }
}

/// The unit of work behind a task.
pub(crate) enum TaskUnit {
    Leaf(TaskFn),
    Series(Vec<TaskHandle>),
}

/// A named, immutable task definition.
///
/// Tasks are created only through [`TaskRegistry`] and never renamed or
/// removed afterwards.
pub struct Task {
    name: TaskName,
    pub(crate) unit: TaskUnit,
}

impl Task {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn new_leaf(name: TaskName, body: TaskFn) -> Self {
        Self {
            name,
            unit: TaskUnit::Leaf(body),
        }
    }

    pub(crate) fn new_series(name: TaskName, members: Vec<TaskHandle>) -> Self {
        Self {
            name,
            unit: TaskUnit::Series(members),
        }
    }

    /// Members of a series task, or `None` for a leaf.
    pub fn members(&self) -> Option<&[TaskHandle]> {
        match &self.unit {
            TaskUnit::Leaf(_) => None,
            TaskUnit::Series(members) => Some(members),
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.unit {
            TaskUnit::Leaf(_) => "leaf",
            TaskUnit::Series(_) => "series",
        };
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}
