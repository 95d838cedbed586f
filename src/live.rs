// src/live.rs

//! Live file-event source backed by `notify`.
//!
//! The tracker itself is synchronous and single-context; this module turns
//! the OS watcher's background callbacks into [`LiveEvent`]s on a channel,
//! so the owner of the [`crate::track::FileTracker`] can consume them
//! serially alongside reloads. Nothing here touches tracker state.

use std::path::{Path, PathBuf};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::track::paths::relative_str;

/// A single path-level event, already relativized against the project root.
#[derive(Debug, Clone)]
pub enum LiveEvent {
    PathChanged(String),
    PathRemoved(String),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

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

/// Spawn a filesystem watcher observing `root` recursively.
///
/// Every path in every event is relativized against `root` and forwarded
/// as a [`LiveEvent`] on `live_tx`. Access-only events are dropped here;
/// everything else maps to changed/removed.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    live_tx: mpsc::Sender<LiveEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or_else(|_| root.clone()); // best-effort

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("sitewatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("sitewatch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    // Async task that relativizes notify events and forwards them.
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!("received notify event: {:?}", event);

            if matches!(event.kind, EventKind::Access(_)) {
                continue;
            }
            let removed = matches!(event.kind, EventKind::Remove(_));

            for path in &event.paths {
                let Some(live) = to_live_event(&root, path, removed) else {
                    warn!(
                        "could not relativize path {:?} against root {:?}",
                        path, root
                    );
                    continue;
                };
                if live_tx.send(live).await.is_err() {
                    // Receiver gone; no point keeping the watcher loop alive.
                    return;
                }
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}

fn to_live_event(root: &Path, path: &Path, removed: bool) -> Option<LiveEvent> {
    let rel = relative_str(root, path)?;
    Some(if removed {
        LiveEvent::PathRemoved(rel)
    } else {
        LiveEvent::PathChanged(rel)
    })
}
