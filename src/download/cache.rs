//! Filesystem cache of completed downloads.
//!
//! The cache is the downloads directory itself: a track maps to
//! `{root}/{id}.{ext}` and the existence of that file is the validity
//! signal. There is no metadata record and no expiry; the surrounding
//! system prunes old files on its own schedule.
//!
//! Two extra guarantees close the races a bare directory would have:
//! - a per-path async lock single-flights concurrent requests for the
//!   same identifier, so the loser reuses the winner's file;
//! - writers stream into a `.part` staging path and the final name is
//!   only ever produced by an atomic rename, so a reader never observes
//!   a truncated file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::core::types::MediaKind;
use crate::core::utils::escape_filename;

/// Deterministic mapping from (track id, media kind) to local files,
/// plus the per-path single-flight locks.
pub struct DownloadCache {
    root: PathBuf,
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl DownloadCache {
    /// Create a cache rooted at the given directory.
    ///
    /// The directory is created lazily by `ensure_root`, not here, so
    /// constructing a cache is infallible.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: DashMap::new(),
        }
    }

    /// Cache rooted at the configured downloads folder.
    pub fn from_config() -> Self {
        Self::new(crate::core::config::DOWNLOAD_FOLDER.as_str())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Final path for a track: `{root}/{id}.{ext}`.
    pub fn path_for(&self, id: &str, kind: MediaKind) -> PathBuf {
        self.root
            .join(format!("{}.{}", escape_filename(id), kind.extension()))
    }

    /// Staging path a transfer writes into before the final rename.
    pub fn staging_for(&self, path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".part");
        PathBuf::from(name)
    }

    /// Existence check. A present file is assumed complete and valid.
    pub async fn lookup(&self, id: &str, kind: MediaKind) -> Option<PathBuf> {
        let path = self.path_for(id, kind);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Some(path),
            _ => None,
        }
    }

    /// Create the downloads directory if it does not exist yet.
    pub async fn ensure_root(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Acquire the single-flight lock for a cache path.
    ///
    /// Holders must re-check `lookup` after acquiring: the previous
    /// holder may have completed the same download while we waited.
    pub async fn lock_path(&self, path: &Path) -> OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry(path.to_path_buf())
            .or_default()
            .clone();
        mutex.lock_owned().await
    }
}
