//! On-disk cache of fetched raw comments for the orchestrated flow.
//! Entries are keyed by `{video_id}-{max_comments}` and expire after a TTL measured from
//! the file's modification time.

use crate::export::{load_raw, save_raw};
use crate::model::CommentRecord;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct RawCache {
    dir: PathBuf,
    ttl: Duration,
}

impl RawCache {
    pub fn new(dir: impl AsRef<Path>, ttl: Duration) -> Self {
        Self { dir: dir.as_ref().to_path_buf(), ttl }
    }

    pub fn key(video_id: &str, max_comments: usize) -> String {
        let safe: String = video_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("{}-{}", safe, max_comments)
    }

    pub fn path_for(&self, video_id: &str, max_comments: usize) -> PathBuf {
        self.dir.join(format!("{}.json", Self::key(video_id, max_comments)))
    }

    /// Cached records if a fresh entry exists. Stale or unreadable entries are misses.
    pub fn get(&self, video_id: &str, max_comments: usize) -> Option<Vec<CommentRecord>> {
        let path = self.path_for(video_id, max_comments);
        let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
        let age = modified.elapsed().unwrap_or_default();
        if age > self.ttl {
            tracing::debug!("cache entry {} expired ({:?} old)", path.display(), age);
            return None;
        }
        match load_raw(&path) {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::warn!("ignoring unreadable cache entry {}: {:#}", path.display(), e);
                None
            }
        }
    }

    pub fn put(&self, video_id: &str, max_comments: usize, records: &[CommentRecord]) -> Result<PathBuf> {
        let path = self.path_for(video_id, max_comments);
        save_raw(records, &path)?;
        Ok(path)
    }
}
