// src/watch/mod.rs

//! Watch-driven re-execution.
//!
//! This module is responsible for:
//! - Compiling watch/exclude glob patterns per binding.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Turning change events into run requests and scheduling them with
//!   per-task serialization and coalescing.
//!
//! The coalescing policy lives in the pure [`coordinator`] so it can be
//! tested without Tokio, channels, or a real filesystem; the async session
//! loop in [`trigger`] is a thin IO shell around it.

pub mod coordinator;
pub mod patterns;
pub mod trigger;
pub mod watcher;

pub use coordinator::{RunCoordinator, RunRequest};
pub use patterns::CompiledGlobs;
pub use trigger::WatchTrigger;
pub use watcher::{spawn_fs_watcher, FsEvent, WatcherHandle};
