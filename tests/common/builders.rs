#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::anyhow;

use taskpipe::environment::Environment;
use taskpipe::task::{TaskContext, TaskFn};

/// A context rooted in the current directory with the default environment.
pub fn test_context() -> TaskContext {
    TaskContext::new(".", Environment::default())
}

/// A context rooted at `root` with the given environment value.
pub fn context_at(root: &std::path::Path, env: &str) -> TaskContext {
    TaskContext::new(root, Environment::new(env))
}

/// Records the order in which instrumented tasks executed.
#[derive(Clone, Default)]
pub struct Recorder {
    log: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the tasks that ran, in execution order.
    pub fn executed(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// A leaf task that records its name and succeeds.
    pub fn ok_task(&self, name: &str) -> TaskFn {
        let log = Arc::clone(&self.log);
        let name = name.to_string();
        Arc::new(move |_ctx| {
            let log = Arc::clone(&log);
            let name = name.clone();
            Box::pin(async move {
                log.lock().unwrap().push(name);
                Ok(())
            })
        })
    }

    /// A leaf task that records its name, then fails with `reason`.
    pub fn failing_task(&self, name: &str, reason: &str) -> TaskFn {
        let log = Arc::clone(&self.log);
        let name = name.to_string();
        let reason = reason.to_string();
        Arc::new(move |_ctx| {
            let log = Arc::clone(&log);
            let name = name.clone();
            let reason = reason.clone();
            Box::pin(async move {
                log.lock().unwrap().push(name);
                Err(anyhow!(reason))
            })
        })
    }

    /// A leaf task that records its name along with the environment value
    /// it observed at the moment it ran.
    pub fn env_probe(&self, name: &str) -> TaskFn {
        let log = Arc::clone(&self.log);
        let name = name.to_string();
        Arc::new(move |ctx| {
            let log = Arc::clone(&log);
            let name = name.clone();
            Box::pin(async move {
                let env = ctx.env().get();
                log.lock().unwrap().push(format!("{name}:{env}"));
                Ok(())
            })
        })
    }
}
