// src/errors.rs

//! Crate-wide error type and `Result` alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskpipeError {
    #[error("task '{0}' is already registered")]
    DuplicateName(String),

    #[error("unknown task: {0}")]
    UnknownTask(String),

    #[error("task '{task}' failed: {source}")]
    Transform {
        task: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("file watch subsystem error: {0}")]
    Observation(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskpipeError {
    /// Wrap a leaf task's underlying failure, attributing it to the task.
    pub fn transform(task: impl Into<String>, source: anyhow::Error) -> Self {
        TaskpipeError::Transform {
            task: task.into(),
            source,
        }
    }

    /// Name of the task a `Transform` failure is attributed to, if any.
    pub fn failed_task(&self) -> Option<&str> {
        match self {
            TaskpipeError::Transform { task, .. } => Some(task),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskpipeError>;
