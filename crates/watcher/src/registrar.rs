//! Watch target registration
//!
//! Traversal and subscription are kept apart: [`watch_candidates`] lazily
//! yields the locations worth watching, [`register_targets`] consumes them
//! and subscribes each one, stopping at the first failure.

use crate::error::{Result, WatchError};
use crate::source::NotificationSource;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// A location under observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    /// Absolute path
    pub path: PathBuf,
    pub kind: TargetKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
}

/// Enumerate the locations to watch under `root`
///
/// A file yields itself. A directory yields itself and every subdirectory,
/// recursively, except hidden ones (name starting with `.`), whose whole
/// subtree is skipped. The root is never treated as hidden.
pub fn watch_candidates(root: &Path) -> Result<Box<dyn Iterator<Item = Result<WatchTarget>>>> {
    let metadata = fs::metadata(root).map_err(|e| WatchError::path(root, e))?;
    let root = std::path::absolute(root).map_err(|e| WatchError::path(root, e))?;

    if !metadata.is_dir() {
        let target = WatchTarget {
            path: root,
            kind: TargetKind::File,
        };
        return Ok(Box::new(std::iter::once(Ok(target))));
    }

    let walk = WalkDir::new(&root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => Some(Ok(WatchTarget {
                path: entry.into_path(),
                kind: TargetKind::Directory,
            })),
            Ok(_) => None,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                Some(Err(WatchError::path(path, e.into())))
            }
        });

    Ok(Box::new(walk))
}

/// Subscribe every candidate under `root` to `source`
///
/// Fails fast: the first traversal or subscription error aborts the whole
/// registration.
pub fn register_targets<S>(root: &Path, source: &mut S) -> Result<Vec<WatchTarget>>
where
    S: NotificationSource + ?Sized,
{
    let mut targets = Vec::new();

    for candidate in watch_candidates(root)? {
        let target = candidate?;
        source
            .subscribe(&target.path)
            .map_err(|e| WatchError::Subscription {
                path: target.path.clone(),
                source: e,
            })?;
        debug!("Subscribed {}", target.path.display());
        targets.push(target);
    }

    Ok(targets)
}

/// Checked on the raw name so non-UTF-8 names are classified too
fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().as_encoded_bytes().starts_with(b".")
}
