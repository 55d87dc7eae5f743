//! Orchestrated single-video flow: scrape (cached, retried) -> clean -> analyze -> report -> save.
//!
//! This is the only place a whole fetch is retried. Inside the fetcher a failed page just
//! ends pagination; here a transport or throttling failure before any comment arrived is
//! retried under the configured policy. An empty result is not retried: with the default
//! policy that would cost 3 x 30 s before reporting a video that simply has no comments.

use crate::cache::RawCache;
use crate::classifier::Summary;
use crate::error::PipelineError;
use crate::export::save_sentiment_csv;
use crate::fetcher::Fetcher;
use crate::model::CommentRecord;
use crate::pipeline::{CommentPipeline, PipelineRun};
use crate::report::write_report;
use crate::util::init_tracing_once;
use crate::youtube::CommentSource;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{error, info, warn};

pub const FLOW_NAME: &str = "YouTube Comments Analysis";
/// Final CSV of the flow, under the processed dir.
pub const ANALYZED_FILE: &str = "comments_analyzed.csv";

#[derive(Clone, Debug)]
pub struct FlowOutcome {
    pub run: PipelineRun,
    pub from_cache: bool,
    pub report: PathBuf,
    pub output: PathBuf,
}

/// Run the flow for one video. On failure the notification hook fires before the error is returned.
///
/// Fails with [`PipelineError::NoComments`] when nothing was fetched or cleaning removed
/// every comment; no report or CSV is written in that case.
pub fn run_video_flow<S: CommentSource>(
    pipeline: &CommentPipeline,
    fetcher: &Fetcher<S>,
    video_id: &str,
    max_comments: usize,
) -> Result<FlowOutcome> {
    init_tracing_once();
    info!("Starting flow '{}' for video {} (max {} comments)", FLOW_NAME, video_id, max_comments);
    let res = flow_steps(pipeline, fetcher, video_id, max_comments);
    if let Err(e) = &res {
        notify_on_failure(FLOW_NAME, e);
    }
    res
}

fn flow_steps<S: CommentSource>(
    pipeline: &CommentPipeline,
    fetcher: &Fetcher<S>,
    video_id: &str,
    max_comments: usize,
) -> Result<FlowOutcome> {
    let (raw, from_cache) = scrape_comments(pipeline, fetcher, video_id, max_comments)?;

    info!("Cleaning {} comments...", raw.len());
    let run = pipeline.process(raw)?;
    if run.is_empty() {
        return Err(PipelineError::NoComments { video_id: video_id.to_string() }.into());
    }

    info!("Analyzing sentiment...");
    log_summary(&run.summary);

    let report = write_report(pipeline.options(), video_id, &run.records, &run.summary)?;

    let output = pipeline.options().processed_dir().join(ANALYZED_FILE);
    save_sentiment_csv(&run.records, &output)?;

    info!("Flow '{}' complete: {}", FLOW_NAME, output.display());
    Ok(FlowOutcome { run, from_cache, report, output })
}

/// Cache lookup, then a fetch under the configured retry policy. Fresh non-empty results are cached.
fn scrape_comments<S: CommentSource>(
    pipeline: &CommentPipeline,
    fetcher: &Fetcher<S>,
    video_id: &str,
    max_comments: usize,
) -> Result<(Vec<CommentRecord>, bool), PipelineError> {
    if max_comments == 0 {
        return Err(PipelineError::NoComments { video_id: video_id.to_string() });
    }
    let opts = pipeline.options();
    let cache = opts.cache_dir.as_ref().map(|d| RawCache::new(d, opts.cache_ttl));
    if let Some(hit) = cache.as_ref().and_then(|c| c.get(video_id, max_comments)) {
        info!("Using {} cached comments for {}", hit.len(), RawCache::key(video_id, max_comments));
        return Ok((hit, true));
    }

    let comments = opts.retry.run("scrape_comments", PipelineError::is_retryable, |attempt| {
        info!("Fetching comments of video {} (attempt {})", video_id, attempt);
        fetcher.try_fetch_video_comments(video_id, max_comments)
    })?;
    info!("Fetched {} comments", comments.len());
    if comments.is_empty() {
        return Err(PipelineError::NoComments { video_id: video_id.to_string() });
    }

    if let Some(c) = &cache {
        if let Err(e) = c.put(video_id, max_comments, &comments) {
            warn!("could not cache comments of {}: {:#}", video_id, e);
        }
    }
    Ok((comments, false))
}

fn log_summary(summary: &Summary) {
    for s in &summary.labels {
        info!("   {}: {} ({:.1}%)", s.label, s.count, s.percentage);
    }
}

fn notify_on_failure(flow: &str, err: &anyhow::Error) {
    error!("Flow '{}' failed: {:#}", flow, err);
}
