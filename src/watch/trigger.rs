// src/watch/trigger.rs

//! The watch session: bindings, dispatch, and the scheduling loop.

use std::path::{Path, PathBuf};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::task::{series, TaskContext, TaskHandle, TaskName};
use crate::watch::coordinator::{RunCoordinator, RunRequest};
use crate::watch::patterns::{relative_str, CompiledGlobs};
use crate::watch::watcher::{spawn_fs_watcher, FsEvent};

/// A relation from a set of path globs to the task they re-trigger.
#[derive(Debug)]
struct Binding {
    globs: CompiledGlobs,
    task: TaskHandle,
}

/// Binds path globs to tasks and, once started, stays resident turning
/// change events into task re-runs.
///
/// Bindings are established before the session starts and persist for its
/// whole life. A failure of a triggered task is reported but never ends
/// the session; only an error from the watch subsystem itself does.
#[derive(Debug, Default)]
pub struct WatchTrigger {
    bindings: Vec<Binding>,
}

impl WatchTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a watch binding. Invalid glob patterns error here, before
    /// the session starts.
    pub fn bind(
        &mut self,
        watch: &[String],
        exclude: &[String],
        task: TaskHandle,
    ) -> Result<()> {
        let globs = CompiledGlobs::compile(watch, exclude)?;
        debug!(task = %task.name(), ?watch, ?exclude, "watch binding registered");
        self.bindings.push(Binding { globs, task });
        Ok(())
    }

    /// Begin observing the filesystem and run the session loop until the
    /// shutdown signal fires.
    ///
    /// Observation resources are released only after any in-flight runs
    /// have finished naturally.
    pub async fn start(
        self,
        root: &Path,
        ctx: TaskContext,
        shutdown: oneshot::Receiver<()>,
    ) -> Result<()> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let (watcher_handle, fs_rx) = spawn_fs_watcher(&root)?;

        let result = self.observe(root, ctx, fs_rx, shutdown).await;

        // In-flight runs are already finished by the time observe returns.
        drop(watcher_handle);
        result
    }

    /// Session loop over an explicit event stream.
    ///
    /// Split out from [`WatchTrigger::start`] so the scheduling and
    /// coalescing behavior can be driven without a real filesystem
    /// watcher.
    pub async fn observe(
        self,
        root: PathBuf,
        ctx: TaskContext,
        mut fs_rx: mpsc::UnboundedReceiver<FsEvent>,
        mut shutdown: oneshot::Receiver<()>,
    ) -> Result<()> {
        info!(bindings = self.bindings.len(), "watch session observing");

        let mut coordinator = RunCoordinator::new();
        let (done_tx, mut done_rx) = mpsc::channel::<TaskName>(32);

        let fatal = loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested; letting in-flight runs finish");
                    break None;
                }

                event = fs_rx.recv() => match event {
                    Some(FsEvent::Changed(path)) => {
                        self.dispatch(&root, &path, &ctx, &mut coordinator, &done_tx);
                    }
                    Some(FsEvent::Error(err)) => {
                        error!(error = %err, "watch subsystem failed; ending session");
                        break Some(err);
                    }
                    None => {
                        debug!("event stream closed; ending session");
                        break None;
                    }
                },

                done = done_rx.recv() => {
                    if let Some(name) = done {
                        if let Some(follow_up) = coordinator.finish(&name) {
                            debug!(task = %name, "starting coalesced follow-up run");
                            start_run(
                                RunRequest::new(follow_up),
                                &mut coordinator,
                                &ctx,
                                &done_tx,
                            );
                        }
                    }
                }
            }
        };

        // Graceful wind-down: wait for in-flight runs, drop anything that
        // was coalesced but never started.
        while !coordinator.is_idle() {
            match done_rx.recv().await {
                Some(name) => {
                    if coordinator.finish(&name).is_some() {
                        debug!(task = %name, "dropping coalesced trigger at session end");
                    }
                }
                None => break,
            }
        }

        info!("watch session ended");
        match fatal {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Match a changed path against every binding; each match enqueues
    /// exactly one run request.
    fn dispatch(
        &self,
        root: &Path,
        path: &Path,
        ctx: &TaskContext,
        coordinator: &mut RunCoordinator,
        done_tx: &mpsc::Sender<TaskName>,
    ) {
        let rel = match relative_str(root, path) {
            Some(rel) => rel,
            None => {
                warn!(?path, ?root, "could not relativize changed path; ignoring");
                return;
            }
        };

        let mut matched = 0usize;
        for binding in self.bindings.iter().filter(|b| b.globs.matches(&rel)) {
            matched += 1;
            debug!(task = %binding.task.name(), path = %rel, "watch match");
            start_run(
                RunRequest::new(binding.task.clone()),
                coordinator,
                ctx,
                done_tx,
            );
        }

        if matched == 0 {
            debug!(path = %rel, "change observed; no binding matched");
        }
    }
}

/// Hand a request to the coordinator and spawn the run if it should start
/// now. Coalesced requests are absorbed by the coordinator.
fn start_run(
    request: RunRequest,
    coordinator: &mut RunCoordinator,
    ctx: &TaskContext,
    done_tx: &mpsc::Sender<TaskName>,
) {
    let Some(task) = coordinator.request(request) else {
        return;
    };

    let ctx = ctx.clone();
    let done_tx = done_tx.clone();
    tokio::spawn(async move {
        let name = task.name().to_string();
        if let Err(err) = series::run(&task, ctx).await {
            warn!(
                task = %name,
                error = %err,
                "triggered task failed; watch session continues"
            );
        }
        let _ = done_tx.send(name).await;
    });
}
