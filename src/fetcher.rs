//! Comment retrieval: bounded pagination over a [`CommentSource`] with per-page and
//! per-video failure isolation. Nothing here retries; see [`crate::retry`].

use crate::config::PipelineOptions;
use crate::error::PipelineError;
use crate::model::{CommentRecord, VideoRef};
use crate::progress::make_count_progress;
use crate::youtube::{CommentSource, YouTubeApi};
use tracing::{info, warn};

pub struct Fetcher<S> {
    source: S,
    comment_page_size: u32,
    playlist_page_size: u32,
    progress: bool,
}

impl Fetcher<YouTubeApi> {
    /// HTTP-backed fetcher. Fails immediately when no API key is configured.
    pub fn from_options(opts: &PipelineOptions) -> Result<Self, PipelineError> {
        let api = YouTubeApi::new(opts)?;
        Ok(Fetcher::new(api).with_options(opts))
    }
}

impl<S: CommentSource> Fetcher<S> {
    pub fn new(source: S) -> Self {
        let defaults = PipelineOptions::default();
        Self {
            source,
            comment_page_size: defaults.comment_page_size,
            playlist_page_size: defaults.playlist_page_size,
            progress: false,
        }
    }

    /// Take page sizes and the progress toggle from `opts`.
    pub fn with_options(mut self, opts: &PipelineOptions) -> Self {
        self.comment_page_size = opts.comment_page_size.max(1);
        self.playlist_page_size = opts.playlist_page_size.max(1);
        self.progress = opts.progress;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Up to `max_comments` top-level comments of one video, in retrieval order.
    ///
    /// Follows continuation tokens until the count is reached or the listing ends.
    /// A failed page is logged and ends the walk; whatever was gathered so far is returned.
    pub fn fetch_video_comments(&self, video_id: &str, max_comments: usize) -> Vec<CommentRecord> {
        self.walk_comments(video_id, max_comments).0
    }

    /// Same walk, but a failure before any comment arrived is returned instead of an empty list.
    /// Used at the orchestration boundary, where such a failure may be worth retrying.
    pub fn try_fetch_video_comments(&self, video_id: &str, max_comments: usize) -> Result<Vec<CommentRecord>, PipelineError> {
        match self.walk_comments(video_id, max_comments) {
            (comments, Some(e)) if comments.is_empty() => Err(e),
            (comments, _) => Ok(comments),
        }
    }

    fn walk_comments(&self, video_id: &str, max_comments: usize) -> (Vec<CommentRecord>, Option<PipelineError>) {
        let mut comments: Vec<CommentRecord> = Vec::new();
        let mut token: Option<String> = None;
        let mut failure = None;

        while comments.len() < max_comments {
            let page = match self.source.comment_threads(video_id, token.as_deref(), self.comment_page_size) {
                Ok(p) => p,
                Err(e) => {
                    warn!("Error fetching comments for video {}: {} (keeping {} comments)", video_id, e, comments.len());
                    failure = Some(e);
                    break;
                }
            };
            comments.extend(page.comments);

            match page.next_page_token {
                Some(next) if token.as_deref() == Some(next.as_str()) => {
                    warn!("video {}: continuation token repeated, stopping", video_id);
                    break;
                }
                Some(next) => token = Some(next),
                None => break,
            }
        }

        comments.truncate(max_comments);
        tracing::debug!("video {}: {} comments", video_id, comments.len());
        (comments, failure)
    }

    /// Uploaded videos of a channel, newest first as the platform lists them.
    ///
    /// An unresolvable channel yields an empty list. With `limit`, paging stops once that
    /// many videos are known. A failed page ends paging with the videos gathered so far.
    pub fn fetch_channel_videos(&self, channel_id: &str, limit: Option<usize>) -> Vec<VideoRef> {
        let playlist = match self.source.uploads_playlist(channel_id) {
            Ok(Some(p)) => p,
            Ok(None) => {
                info!("channel {} not found or has no uploads playlist", channel_id);
                return Vec::new();
            }
            Err(e) => {
                warn!("Error resolving channel {}: {}", channel_id, e);
                return Vec::new();
            }
        };

        let mut videos: Vec<VideoRef> = Vec::new();
        let mut token: Option<String> = None;
        loop {
            if let Some(n) = limit {
                if videos.len() >= n {
                    break;
                }
            }
            let page = match self.source.playlist_items(&playlist, token.as_deref(), self.playlist_page_size) {
                Ok(p) => p,
                Err(e) => {
                    warn!("Error listing uploads of channel {}: {} (keeping {} videos)", channel_id, e, videos.len());
                    break;
                }
            };
            videos.extend(page.videos);

            match page.next_page_token {
                Some(next) if token.as_deref() == Some(next.as_str()) => break,
                Some(next) => token = Some(next),
                None => break,
            }
        }

        if let Some(n) = limit {
            videos.truncate(n);
        }
        videos
    }

    /// Comments of the first `max_videos` uploads, concatenated in video order.
    /// A video whose fetch fails contributes what it got (possibly nothing); later videos still run.
    pub fn fetch_channel_comments(&self, channel_id: &str, max_videos: usize, comments_per_video: usize) -> Vec<CommentRecord> {
        info!("Looking up videos for channel {}...", channel_id);
        if max_videos == 0 {
            return Vec::new();
        }
        let videos = self.fetch_channel_videos(channel_id, Some(max_videos));
        info!("Found {} videos. Processing up to {}...", videos.len(), max_videos);

        let pb = if self.progress { Some(make_count_progress(videos.len() as u64, "Scraping videos")) } else { None };

        let mut all: Vec<CommentRecord> = Vec::new();
        for v in &videos {
            info!("  Fetching comments of: {}...", v.title);
            let got = self.fetch_video_comments(&v.video_id, comments_per_video);
            all.extend(got);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
        if let Some(pb) = pb {
            pb.finish_with_message("Scraping done");
        }

        info!("channel {}: {} comments from {} videos", channel_id, all.len(), videos.len());
        all
    }
}
