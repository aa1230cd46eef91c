// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use globset::GlobSet;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::{ChangeAction, ChangeEvent, RuntimeEvent};

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher that observes the given `root` directory
/// recursively and sends `RuntimeEvent::FileChanged` for paths that match
/// the folder glob set (the entry page always passes the filter).
///
/// Event paths are relativized against `root` before matching, so the glob
/// patterns see the same shape of path they were built from. The mpsc
/// channel into the runtime serializes events; nothing here runs a task.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    watch_set: GlobSet,
    entry_page: String,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    // Canonicalize once so we have a stable base path.
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        {
            let event_tx = event_tx.clone();
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Err(err) = event_tx.send(event) {
                        // We can't log via tracing here easily, so fallback to stderr.
                        eprintln!("frontwatch: failed to forward notify event: {err}");
                    }
                }
                Err(err) => {
                    eprintln!("frontwatch: file watch error: {err}");
                }
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    // Async task that consumes notify events and forwards qualifying change
    // events into the runtime.
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");

            let Some(action) = change_action(&event.kind) else {
                continue;
            };

            for path in event.paths {
                let Some(rel) = relative_str(&root, &path) else {
                    warn!(
                        "could not relativize path {:?} against root {:?}",
                        path, root
                    );
                    continue;
                };

                if !watch_set.is_match(&rel) && rel != entry_page {
                    continue;
                }

                debug!(rel = %rel, ?action, "watch match -> forwarding change event");

                let change = ChangeEvent {
                    path: PathBuf::from(rel),
                    action,
                };
                if runtime_tx
                    .send(RuntimeEvent::FileChanged(change))
                    .await
                    .is_err()
                {
                    // Runtime channel closed; no point keeping the loop alive.
                    debug!("runtime channel closed; stopping watcher loop");
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Map a notify event kind onto a change action, dropping pure access events.
fn change_action(kind: &EventKind) -> Option<ChangeAction> {
    match kind {
        EventKind::Create(_) => Some(ChangeAction::Added),
        EventKind::Modify(_) => Some(ChangeAction::Changed),
        EventKind::Remove(_) => Some(ChangeAction::Deleted),
        EventKind::Access(_) => None,
        _ => Some(ChangeAction::Changed),
    }
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Falls back to canonicalizing both sides when a direct strip fails, which
/// helps on platforms where the watcher reports a different absolute prefix
/// for the same directory (e.g. `/private/var` on macOS).
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(rel.to_string_lossy().replace('\\', "/"));
    }

    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(rel.to_string_lossy().replace('\\', "/"));
        }
    }

    None
}
