//! Setup errors for the watcher

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort startup.
///
/// Messages leave the cause to the source chain; print with `{:#}`
/// through anyhow to see it. Anything that goes wrong after setup is
/// logged instead of returned.
#[derive(Error, Debug)]
pub enum WatchError {
    /// Watch path does not exist, is inaccessible, or could not be traversed
    #[error("invalid path {path:?}")]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The notification source could not be created
    #[error("failed to create watcher")]
    Source(#[source] notify::Error),

    /// A single location could not be subscribed
    #[error("failed to watch {path:?}")]
    Subscription {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

impl WatchError {
    pub(crate) fn path(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Path {
            path: path.into(),
            source,
        }
    }
}

/// Result type for watcher setup
pub type Result<T> = std::result::Result<T, WatchError>;
