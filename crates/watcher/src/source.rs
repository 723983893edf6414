//! Notification source backed by `notify`
//!
//! Adapts the platform watcher (inotify, FSEvents, ReadDirectoryChangesW)
//! into two streams consumed by the event loop: change notifications and
//! raw watcher errors.

use crate::error::{Result, WatchError};
use crate::{ChangeKind, ChangeNotification};
use notify::event::ModifyKind;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher as _};
use std::path::Path;
use tokio::sync::mpsc;

/// Anything locations can be subscribed to
///
/// The registrar only needs this one operation, which keeps traversal
/// testable without a real platform watcher.
pub trait NotificationSource {
    /// Subscribe a single location (non-recursive)
    fn subscribe(&mut self, path: &Path) -> notify::Result<()>;
}

/// Receiving halves of the source
pub struct NotificationStreams {
    /// Change notifications, in delivery order
    pub events: mpsc::UnboundedReceiver<ChangeNotification>,

    /// Errors reported by the platform watcher
    pub errors: mpsc::UnboundedReceiver<notify::Error>,
}

impl NotificationStreams {
    /// Create a stream pair plus the sending halves feeding it
    pub fn channel() -> (NotificationSenders, Self) {
        let (event_tx, events) = mpsc::unbounded_channel();
        let (error_tx, errors) = mpsc::unbounded_channel();
        (
            NotificationSenders { event_tx, error_tx },
            Self { events, errors },
        )
    }
}

/// Sending halves of the source
///
/// Dropping these closes both streams.
#[derive(Clone)]
pub struct NotificationSenders {
    pub event_tx: mpsc::UnboundedSender<ChangeNotification>,
    pub error_tx: mpsc::UnboundedSender<notify::Error>,
}

impl NotificationSenders {
    /// Forward one raw watcher result
    ///
    /// A raw event may carry several paths; each becomes its own
    /// notification. Send failures mean the loop is gone and are ignored.
    fn forward(&self, res: notify::Result<Event>) {
        match res {
            Ok(event) => {
                let Some(kind) = classify(&event.kind) else {
                    return;
                };
                for path in event.paths {
                    let _ = self.event_tx.send(ChangeNotification { path, kind });
                }
            }
            Err(e) => {
                let _ = self.error_tx.send(e);
            }
        }
    }
}

/// Map a raw event kind to a change kind
///
/// Access events (open, read, close) are not changes. Everything else is
/// forwarded, metadata-only changes included, so that `touch` triggers.
fn classify(kind: &notify::EventKind) -> Option<ChangeKind> {
    use notify::EventKind;

    match kind {
        EventKind::Access(_) => None,
        EventKind::Create(_) => Some(ChangeKind::Create),
        EventKind::Remove(_) => Some(ChangeKind::Remove),
        EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeKind::Rename),
        EventKind::Modify(ModifyKind::Metadata(_)) => Some(ChangeKind::Metadata),
        EventKind::Modify(_) => Some(ChangeKind::Write),
        EventKind::Any | EventKind::Other => Some(ChangeKind::Other),
    }
}

/// Platform notification source
pub struct NotifySource {
    watcher: RecommendedWatcher,
}

impl NotifySource {
    /// Create the platform watcher and its streams
    pub fn new() -> Result<(Self, NotificationStreams)> {
        let (senders, streams) = NotificationStreams::channel();

        let watcher =
            notify::recommended_watcher(move |res: notify::Result<Event>| senders.forward(res))
                .map_err(WatchError::Source)?;

        Ok((Self { watcher }, streams))
    }

    /// Tear down all subscriptions
    ///
    /// The platform watcher owns the senders, so both streams close once it
    /// is dropped.
    pub fn close(self) {
        drop(self.watcher);
    }
}

impl NotificationSource for NotifySource {
    fn subscribe(&mut self, path: &Path) -> notify::Result<()> {
        self.watcher.watch(path, RecursiveMode::NonRecursive)
    }
}
