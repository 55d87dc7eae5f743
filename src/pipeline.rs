use crate::batch::Batch;
use crate::classifier::{summarize, Classifier, Summary};
use crate::config::PipelineOptions;
use crate::error::PipelineError;
use crate::fetcher::Fetcher;
use crate::model::{ClassifiedRecord, CommentRecord, NormalizedRecord};
use crate::normalizer::{TextNormalizer, CLEAN_TEXT_COLUMN};
use crate::retry::RetryPolicy;
use crate::util::init_tracing_once;
use crate::youtube::{CommentSource, YouTubeApi};
use std::path::Path;
use std::time::Duration;

/// The single fetch -> clean -> classify entry point shared by every front-end.
#[derive(Clone, Debug, Default)]
pub struct CommentPipeline {
    pub(crate) opts: PipelineOptions,
}

/// What to scrape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Video { video_id: String, max_comments: usize },
    Channel { channel_id: String, max_videos: usize, comments_per_video: usize },
}

impl Target {
    pub fn video(video_id: impl Into<String>, max_comments: usize) -> Self {
        Target::Video { video_id: video_id.into(), max_comments }
    }
    pub fn channel(channel_id: impl Into<String>, max_videos: usize, comments_per_video: usize) -> Self {
        Target::Channel { channel_id: channel_id.into(), max_videos, comments_per_video }
    }
}

/// Every stage's output of one run.
#[derive(Clone, Debug, Default)]
pub struct PipelineRun {
    pub raw: Vec<CommentRecord>,
    pub normalized: Vec<NormalizedRecord>,
    pub records: Vec<ClassifiedRecord>,
    pub summary: Summary,
}

impl PipelineRun {
    /// Zero surviving rows: report "no results", not a failure.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CommentPipeline {
    pub fn new() -> Self {
        Self { opts: PipelineOptions::default() }
    }

    /// Options resolved from the environment (see [`PipelineOptions::from_env`]).
    pub fn from_env() -> Self {
        Self { opts: PipelineOptions::from_env() }
    }

    pub fn with_options(opts: PipelineOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.opts
    }

    // -------- Builder methods --------
    pub fn api_key(mut self, key: impl Into<String>) -> Self { self.opts = self.opts.with_api_key(key); self }
    pub fn api_base(mut self, base: impl Into<String>) -> Self { self.opts = self.opts.with_api_base(base); self }
    pub fn data_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_data_dir(dir); self }
    pub fn cache_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_cache_dir(dir); self }
    pub fn cache_ttl(mut self, ttl: Duration) -> Self { self.opts = self.opts.with_cache_ttl(ttl); self }
    pub fn retry(mut self, retry: RetryPolicy) -> Self { self.opts = self.opts.with_retry(retry); self }
    pub fn comment_page_size(mut self, n: u32) -> Self { self.opts = self.opts.with_comment_page_size(n); self }
    pub fn request_timeout(mut self, t: Duration) -> Self { self.opts = self.opts.with_request_timeout(t); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }

    /// HTTP-backed fetcher for these options; fails without an API key.
    pub fn fetcher(&self) -> Result<Fetcher<YouTubeApi>, PipelineError> {
        Fetcher::from_options(&self.opts)
    }

    /// Fetcher over any source, configured with these options.
    pub fn fetcher_with<S: CommentSource>(&self, source: S) -> Fetcher<S> {
        Fetcher::new(source).with_options(&self.opts)
    }

    /// Tabular clean + classify on `clean_text`.
    pub fn process_batch(&self, raw: Batch) -> Result<Batch, PipelineError> {
        let cleaned = TextNormalizer::new().clean_batch(raw)?;
        Classifier::new().classify_batch(cleaned, CLEAN_TEXT_COLUMN)
    }

    /// Clean and classify already-fetched records.
    pub fn process(&self, raw: Vec<CommentRecord>) -> Result<PipelineRun, PipelineError> {
        let n_raw = raw.len();
        let normalized: Vec<NormalizedRecord> = TextNormalizer::new().clean_batch(Batch::from_comments(&raw))?.to_typed()?;
        tracing::info!("Clean comments: {} of {}", normalized.len(), n_raw);

        let records = Classifier::new().classify_records(normalized.clone());
        let summary = summarize(&records);
        Ok(PipelineRun { raw, normalized, records, summary })
    }

    /// Fetch `target` through `fetcher`, then clean and classify.
    pub fn run_with<S: CommentSource>(&self, fetcher: &Fetcher<S>, target: &Target) -> Result<PipelineRun, PipelineError> {
        init_tracing_once();
        let raw = match target {
            Target::Video { video_id, max_comments } => {
                tracing::info!("Fetching comments of video {}...", video_id);
                fetcher.fetch_video_comments(video_id, *max_comments)
            }
            Target::Channel { channel_id, max_videos, comments_per_video } => {
                fetcher.fetch_channel_comments(channel_id, *max_videos, *comments_per_video)
            }
        };
        tracing::info!("Fetched {} comments", raw.len());
        self.process(raw)
    }

    /// Fetch over HTTP, then clean and classify.
    pub fn run(&self, target: &Target) -> Result<PipelineRun, PipelineError> {
        let fetcher = self.fetcher()?;
        self.run_with(&fetcher, target)
    }
}
