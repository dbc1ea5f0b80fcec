// src/task/registry.rs

//! Append-only task registry.
//!
//! Registration returns a [`TaskHandle`], and series composition consumes
//! handles rather than names, so a reference to a task that was never
//! registered is caught when the pipeline is wired up, not when it runs.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::errors::{Result, TaskpipeError};
use crate::task::{Task, TaskFn, TaskName};

/// Cheap, clonable handle to a registered task.
///
/// Holding a handle is proof the task exists; the registry never removes
/// or renames tasks, so a handle stays valid for the process lifetime.
#[derive(Clone)]
pub struct TaskHandle(Arc<Task>);

impl TaskHandle {
    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn task(&self) -> &Task {
        &self.0
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TaskHandle").field(&self.name()).finish()
    }
}

/// Owns every task definition for the process lifetime.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: BTreeMap<TaskName, TaskHandle>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a leaf task.
    ///
    /// Fails with [`TaskpipeError::DuplicateName`] if the name is taken.
    pub fn register_leaf(&mut self, name: &str, body: TaskFn) -> Result<TaskHandle> {
        self.insert(Task::new_leaf(name.to_string(), body))
    }

    /// Register a series task composed of previously-registered members.
    ///
    /// Fails with [`TaskpipeError::DuplicateName`] if the name is taken.
    pub fn register_series(
        &mut self,
        name: &str,
        members: Vec<TaskHandle>,
    ) -> Result<TaskHandle> {
        self.insert(Task::new_series(name.to_string(), members))
    }

    /// Look up a task by name.
    ///
    /// Fails with [`TaskpipeError::UnknownTask`] if absent.
    pub fn resolve(&self, name: &str) -> Result<TaskHandle> {
        self.tasks
            .get(name)
            .cloned()
            .ok_or_else(|| TaskpipeError::UnknownTask(name.to_string()))
    }

    /// All registered task names, in sorted order.
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(|s| s.as_str())
    }

    fn insert(&mut self, task: Task) -> Result<TaskHandle> {
        let name = task.name().to_string();
        if self.tasks.contains_key(&name) {
            return Err(TaskpipeError::DuplicateName(name));
        }

        debug!(task = %name, "registered task");
        let handle = TaskHandle(Arc::new(task));
        self.tasks.insert(name, handle.clone());
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn noop() -> TaskFn {
        Arc::new(|_ctx| Box::pin(async { Ok(()) }))
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = TaskRegistry::new();
        registry.register_leaf("clean", noop()).unwrap();

        let err = registry.register_leaf("clean", noop()).unwrap_err();
        assert!(matches!(err, TaskpipeError::DuplicateName(name) if name == "clean"));
    }

    #[test]
    fn unknown_task_is_rejected_at_resolution() {
        let registry = TaskRegistry::new();
        let err = registry.resolve("nope").unwrap_err();
        assert!(matches!(err, TaskpipeError::UnknownTask(name) if name == "nope"));
    }

    #[test]
    fn series_name_collides_with_leaf_name() {
        let mut registry = TaskRegistry::new();
        let leaf = registry.register_leaf("styles", noop()).unwrap();

        let err = registry
            .register_series("styles", vec![leaf])
            .unwrap_err();
        assert!(matches!(err, TaskpipeError::DuplicateName(_)));
    }
}
