use crate::retry::RetryPolicy;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Environment variable holding the platform API key.
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone)]
pub struct PipelineOptions {
    pub api_key: Option<String>,
    pub api_base: String,
    pub comment_page_size: u32,      // commentThreads maxResults, platform cap is 100
    pub playlist_page_size: u32,     // playlistItems maxResults, platform cap is 50
    pub request_timeout: Duration,
    pub data_dir: PathBuf,           // artifacts land in data_dir/raw and data_dir/processed
    pub cache_dir: Option<PathBuf>,  // raw fetch cache for the orchestrated flow; None disables
    pub cache_ttl: Duration,
    pub retry: RetryPolicy,          // whole-task retry at the orchestration boundary
    pub progress: bool,              // per-video progress bar for channel scrapes
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            comment_page_size: 100,
            playlist_page_size: 50,
            request_timeout: Duration::from_secs(30),
            data_dir: PathBuf::from("./data"),
            cache_dir: None,
            cache_ttl: Duration::from_secs(24 * 60 * 60),
            retry: RetryPolicy::default(),
            progress: false,
        }
    }
}

// Keep the key out of logs.
impl fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("comment_page_size", &self.comment_page_size)
            .field("playlist_page_size", &self.playlist_page_size)
            .field("request_timeout", &self.request_timeout)
            .field("data_dir", &self.data_dir)
            .field("cache_dir", &self.cache_dir)
            .field("cache_ttl", &self.cache_ttl)
            .field("retry", &self.retry)
            .field("progress", &self.progress)
            .finish()
    }
}

impl PipelineOptions {
    /// Defaults overlaid with the process environment:
    /// - YOUTUBE_API_KEY: API credential
    /// - YT_SENTIMENT_DATA_DIR: artifact root
    /// - YT_SENTIMENT_API_BASE: alternate API endpoint (e.g. a local mock)
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                opts.api_key = Some(key);
            }
        }
        if let Ok(dir) = std::env::var("YT_SENTIMENT_DATA_DIR") {
            if !dir.trim().is_empty() {
                opts = opts.with_data_dir(dir.trim());
            }
        }
        if let Ok(base) = std::env::var("YT_SENTIMENT_API_BASE") {
            if !base.trim().is_empty() {
                opts = opts.with_api_base(base.trim());
            }
        }
        opts
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }
    pub fn with_comment_page_size(mut self, n: u32) -> Self {
        self.comment_page_size = n.clamp(1, 100);
        self
    }
    pub fn with_playlist_page_size(mut self, n: u32) -> Self {
        self.playlist_page_size = n.clamp(1, 50);
        self
    }
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_cache_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cache_dir = Some(dir.as_ref().to_path_buf());
        self
    }
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }
    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }
    pub fn reports_dir(&self) -> PathBuf {
        self.data_dir.join("reports")
    }
}
