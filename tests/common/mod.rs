#![allow(dead_code)]

use serde_json::json;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use yt_sentiment::{Batch, CommentPage, CommentRecord, CommentSource, PipelineError, PlaylistPage, VideoRef};

/// Scripted in-memory platform.
///
/// Each video has a list of comment pages; tokens are `p1`, `p2`, ... so page `n` is requested
/// with token `pn`. Failures can be injected per (video, page). Channels map to an uploads list.
#[derive(Default)]
pub struct FakeSource {
    pages: HashMap<String, Vec<Vec<CommentRecord>>>,
    failures: HashSet<(String, usize)>,
    channels: HashMap<String, Vec<VideoRef>>,
    /// Comment requests that fail with a transport error before the script applies.
    failing_first: Cell<usize>,
    /// Every comment_threads call as (video_id, page index).
    pub calls: RefCell<Vec<(String, usize)>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn video(mut self, video_id: &str, pages: Vec<Vec<CommentRecord>>) -> Self {
        self.pages.insert(video_id.to_string(), pages);
        self
    }

    pub fn failing_page(mut self, video_id: &str, page: usize) -> Self {
        self.failures.insert((video_id.to_string(), page));
        self
    }

    pub fn channel(mut self, channel_id: &str, video_ids: &[&str]) -> Self {
        let videos = video_ids
            .iter()
            .map(|id| VideoRef { video_id: id.to_string(), title: format!("Video {id}"), published_at: String::new() })
            .collect();
        self.channels.insert(channel_id.to_string(), videos);
        self
    }

    pub fn failing_first(self, n: usize) -> Self {
        self.failing_first.set(n);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

fn page_index(token: Option<&str>) -> usize {
    token.and_then(|t| t.strip_prefix('p')).and_then(|n| n.parse().ok()).unwrap_or(0)
}

impl CommentSource for FakeSource {
    fn comment_threads(&self, video_id: &str, page_token: Option<&str>, _page_size: u32) -> Result<CommentPage, PipelineError> {
        let idx = page_index(page_token);
        self.calls.borrow_mut().push((video_id.to_string(), idx));

        if self.failing_first.get() > 0 {
            self.failing_first.set(self.failing_first.get() - 1);
            return Err(PipelineError::Transport("connection refused".to_string()));
        }
        if self.failures.contains(&(video_id.to_string(), idx)) {
            return Err(PipelineError::Transport(format!("connection reset on {video_id} page {idx}")));
        }
        let pages = self.pages.get(video_id).map(Vec::as_slice).unwrap_or(&[]);
        let comments = pages.get(idx).cloned().unwrap_or_default();
        let next_page_token = if idx + 1 < pages.len() { Some(format!("p{}", idx + 1)) } else { None };
        Ok(CommentPage { comments, next_page_token })
    }

    fn uploads_playlist(&self, channel_id: &str) -> Result<Option<String>, PipelineError> {
        Ok(self.channels.contains_key(channel_id).then(|| format!("UU-{channel_id}")))
    }

    fn playlist_items(&self, playlist_id: &str, page_token: Option<&str>, page_size: u32) -> Result<PlaylistPage, PipelineError> {
        let channel = playlist_id.trim_start_matches("UU-");
        let all = self.channels.get(channel).map(Vec::as_slice).unwrap_or(&[]);
        let size = page_size.max(1) as usize;
        let idx = page_index(page_token);
        let videos: Vec<VideoRef> = all.iter().skip(idx * size).take(size).cloned().collect();
        let next_page_token = if (idx + 1) * size < all.len() { Some(format!("p{}", idx + 1)) } else { None };
        Ok(PlaylistPage { videos, next_page_token })
    }
}

pub fn comment(video_id: &str, author: &str, text: &str) -> CommentRecord {
    CommentRecord {
        author: author.to_string(),
        text: Some(text.to_string()),
        like_count: 0,
        published_at: "2024-05-01T12:00:00Z".to_string(),
        video_id: video_id.to_string(),
    }
}

/// `n` distinct comments for `video_id`, numbered from `start`.
pub fn comments(video_id: &str, start: usize, n: usize) -> Vec<CommentRecord> {
    (start..start + n).map(|i| comment(video_id, &format!("user{i}"), &format!("Comment number {i}"))).collect()
}

/// Raw tabular batch as the fetcher stage would hand it over.
pub fn raw_batch(texts: &[Option<&str>]) -> Batch {
    Batch::from_values(
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| json!({"author": format!("user{i}"), "text": t, "like_count": i, "published_at": "", "video_id": "vid"}))
            .collect(),
    )
}
