// src/watch/coordinator.rs

//! Pure run-request coordination.
//!
//! The coordinator decides, without performing any IO, whether a run
//! request should start a run now or be coalesced behind one already in
//! progress. Rules:
//!
//! - Requests for *different* tasks may run concurrently; their output
//!   paths are disjoint by construction.
//! - A request for a task that is already running occupies a single
//!   pending slot. However many triggers arrive mid-run, exactly one
//!   follow-up run starts after the current one finishes.

use std::collections::HashMap;

use tracing::debug;

use crate::task::{TaskHandle, TaskName};

/// A queued intent to execute a task, produced by glob matching.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub task: TaskHandle,
}

impl RunRequest {
    pub fn new(task: TaskHandle) -> Self {
        Self { task }
    }
}

#[derive(Debug, Default)]
struct Slot {
    running: bool,
    pending: Option<TaskHandle>,
}

/// Tracks which tasks are mid-run and which have a coalesced follow-up.
#[derive(Debug, Default)]
pub struct RunCoordinator {
    slots: HashMap<TaskName, Slot>,
}

impl RunCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a run request.
    ///
    /// Returns the handle if the caller should start a run now; `None` if
    /// the request was coalesced behind an in-progress run of the same
    /// task.
    pub fn request(&mut self, request: RunRequest) -> Option<TaskHandle> {
        let name = request.task.name().to_string();
        let slot = self.slots.entry(name.clone()).or_default();

        if slot.running {
            let replaced = slot.pending.replace(request.task).is_some();
            debug!(task = %name, replaced, "run in progress; coalescing trigger");
            return None;
        }

        slot.running = true;
        Some(request.task)
    }

    /// Record that a run of `task` finished (success or failure).
    ///
    /// Returns the coalesced follow-up handle, if any, *without* starting
    /// it; the caller feeds it back through [`RunCoordinator::request`]
    /// when it actually wants the follow-up run.
    pub fn finish(&mut self, task: &str) -> Option<TaskHandle> {
        let slot = self.slots.get_mut(task)?;
        slot.running = false;
        slot.pending.take()
    }

    /// Number of runs currently in progress.
    pub fn in_flight(&self) -> usize {
        self.slots.values().filter(|s| s.running).count()
    }

    /// True when no run is in progress.
    pub fn is_idle(&self) -> bool {
        self.in_flight() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::task::TaskRegistry;

    fn handle(registry: &mut TaskRegistry, name: &str) -> TaskHandle {
        registry
            .register_leaf(name, Arc::new(|_ctx| Box::pin(async { Ok(()) })))
            .unwrap()
    }

    #[test]
    fn first_request_starts_a_run() {
        let mut registry = TaskRegistry::new();
        let styles = handle(&mut registry, "styles");

        let mut coord = RunCoordinator::new();
        assert!(coord.request(RunRequest::new(styles)).is_some());
        assert_eq!(coord.in_flight(), 1);
    }

    #[test]
    fn overlapping_requests_coalesce_to_one_follow_up() {
        let mut registry = TaskRegistry::new();
        let styles = handle(&mut registry, "styles");

        let mut coord = RunCoordinator::new();
        assert!(coord.request(RunRequest::new(styles.clone())).is_some());

        // Two triggers land while the run is still in progress.
        assert!(coord.request(RunRequest::new(styles.clone())).is_none());
        assert!(coord.request(RunRequest::new(styles.clone())).is_none());

        // One follow-up, not two.
        let follow_up = coord.finish("styles").expect("coalesced follow-up");
        assert_eq!(follow_up.name(), "styles");
        assert!(coord.request(RunRequest::new(follow_up)).is_some());
        assert!(coord.finish("styles").is_none());
    }

    #[test]
    fn different_tasks_run_concurrently() {
        let mut registry = TaskRegistry::new();
        let styles = handle(&mut registry, "styles");
        let lint = handle(&mut registry, "lint");

        let mut coord = RunCoordinator::new();
        assert!(coord.request(RunRequest::new(styles)).is_some());
        assert!(coord.request(RunRequest::new(lint)).is_some());
        assert_eq!(coord.in_flight(), 2);

        coord.finish("styles");
        assert_eq!(coord.in_flight(), 1);
        coord.finish("lint");
        assert!(coord.is_idle());
    }

    #[test]
    fn finish_without_pending_returns_none() {
        let mut registry = TaskRegistry::new();
        let styles = handle(&mut registry, "styles");

        let mut coord = RunCoordinator::new();
        coord.request(RunRequest::new(styles)).unwrap();
        assert!(coord.finish("styles").is_none());
        assert!(coord.is_idle());
    }
}
