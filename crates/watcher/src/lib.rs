//! File system watching for igotifier
//!
//! This crate provides:
//! - Watch target registration (file, or directory tree minus hidden dirs)
//! - A `notify`-backed notification source
//! - Single-slot debouncing (fixed 100ms quiet period)
//! - Shell command dispatch with combined output capture

pub mod debounce;
pub mod dispatch;
pub mod error;
pub mod event_loop;
pub mod registrar;
pub mod source;

pub use debounce::{Debouncer, DEBOUNCE_DELAY};
pub use dispatch::{CommandDispatcher, DispatchOutcome, DispatchReport};
pub use error::{Result, WatchError};
pub use event_loop::{run_event_loop, LoopExit};
pub use registrar::{register_targets, watch_candidates, TargetKind, WatchTarget};
pub use source::{NotificationSource, NotificationStreams, NotifySource};

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Startup configuration, immutable once built
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// File or directory to watch
    pub path: PathBuf,
    /// Shell command run after each quiet period
    pub command: String,
    pub verbose: bool,
}

/// File system watcher
///
/// Owns the notification source and its registered targets. Construction
/// does all fallible setup; [`Watcher::run`] never fails.
pub struct Watcher {
    config: WatchConfig,
    source: NotifySource,
    streams: NotificationStreams,
    targets: Vec<WatchTarget>,
}

impl Watcher {
    /// Validate the path, create the source and subscribe every target
    pub fn new(config: WatchConfig) -> Result<Self> {
        std::fs::metadata(&config.path).map_err(|e| WatchError::path(&config.path, e))?;

        let (mut source, streams) = NotifySource::new()?;
        let targets = register_targets(&config.path, &mut source)?;

        info!("Watching {:?} for changes...", config.path);
        if config.verbose {
            info!("Will execute: {}", config.command);
        }

        Ok(Self {
            config,
            source,
            streams,
            targets,
        })
    }

    /// Registered watch targets
    pub fn targets(&self) -> &[WatchTarget] {
        &self.targets
    }

    /// Run until `shutdown` resolves or the source closes
    ///
    /// Commands still running when this returns are not waited for, and a
    /// pending trigger is abandoned.
    pub async fn run<F>(mut self, shutdown: F) -> LoopExit
    where
        F: Future<Output = String>,
    {
        let dispatcher = Arc::new(CommandDispatcher::new(
            self.config.command.clone(),
            self.config.verbose,
        ));
        let debouncer = Debouncer::new(DEBOUNCE_DELAY, Arc::new(move || dispatcher.dispatch()));

        let exit = run_event_loop(&mut self.streams, &debouncer, self.config.verbose, shutdown).await;

        self.source.close();
        exit
    }
}

/// A single change reported by the notification source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotification {
    /// Path that changed
    pub path: PathBuf,
    /// Type of change
    pub kind: ChangeKind,
}

/// Type of change
///
/// Informational only; every kind re-arms the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File or directory created
    Create,
    /// Content modified
    Write,
    /// File or directory deleted
    Remove,
    /// File or directory renamed
    Rename,
    /// Permissions or timestamps changed
    Metadata,
    /// Anything the platform could not classify
    Other,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeKind::Create => "CREATE",
            ChangeKind::Write => "WRITE",
            ChangeKind::Remove => "REMOVE",
            ChangeKind::Rename => "RENAME",
            ChangeKind::Metadata => "CHMOD",
            ChangeKind::Other => "OTHER",
        };
        f.write_str(name)
    }
}
