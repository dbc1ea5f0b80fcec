// src/watch/watcher.rs

use std::fmt;
use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::info;

use crate::errors::Result;

/// A filesystem observation event forwarded into the session loop.
#[derive(Debug)]
pub enum FsEvent {
    /// A watched path changed (created, written, removed, renamed).
    Changed(PathBuf),
    /// The watch subsystem itself reported an error. Fatal to the session.
    Error(notify::Error),
}

/// Handle keeping the underlying `notify` watcher alive.
///
/// Dropping this handle releases the filesystem observation resources.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Start observing `root` recursively.
///
/// Returns the keep-alive handle plus the receiving end of the event
/// stream. The `notify` callback runs on a foreign thread, so events are
/// forwarded over an unbounded channel into the async world.
pub fn spawn_fs_watcher(
    root: &Path,
) -> Result<(WatcherHandle, mpsc::UnboundedReceiver<FsEvent>)> {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<FsEvent>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            let forwarded = match res {
                Ok(event) => event
                    .paths
                    .into_iter()
                    .try_for_each(|path| event_tx.send(FsEvent::Changed(path))),
                Err(err) => event_tx.send(FsEvent::Error(err)),
            };
            if forwarded.is_err() {
                // Session loop is gone; nothing left to notify.
                eprintln!("taskpipe: watch event arrived after session ended");
            }
        },
        Config::default(),
    )?;

    watcher.watch(root, RecursiveMode::Recursive)?;

    info!(root = ?root, "file watcher started");

    Ok((WatcherHandle { _inner: watcher }, event_rx))
}
